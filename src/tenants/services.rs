use std::collections::BTreeMap;

use axum::http::StatusCode;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{self, Restaurant, TenantBranding};
use super::theme;

/// Closed failure taxonomy for a slug resolution attempt. Each variant is
/// terminal: there is no automatic retry and no fallback content for
/// inactive restaurants.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Restaurante não encontrado")]
    NotFound,
    #[error("Este restaurante não está disponível no momento")]
    Inactive,
    #[error("Não foi possível carregar o restaurante. Tente novamente.")]
    Backend(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::NotFound => StatusCode::NOT_FOUND,
            ResolveError::Inactive => StatusCode::FORBIDDEN,
            ResolveError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A settled resolution: the restaurant, its effective branding (explicit
/// row or the defaults) and the derived theme variables.
#[derive(Debug, Clone)]
pub struct ResolvedTenant {
    pub restaurant: Restaurant,
    pub branding: TenantBranding,
    pub theme: BTreeMap<String, String>,
}

pub async fn resolve_by_slug(db: &PgPool, slug: &str) -> Result<ResolvedTenant, ResolveError> {
    let restaurant = classify(repo::find_by_slug(db, slug).await?)?;
    let branding = repo::find_branding(db, restaurant.id)
        .await?
        .unwrap_or_else(|| default_branding(restaurant.id));
    let theme = theme::resolve(&branding);
    Ok(ResolvedTenant {
        restaurant,
        branding,
        theme,
    })
}

/// Inactive restaurants are never handed to the rendering layer; the
/// error variant carries no restaurant data.
fn classify(found: Option<Restaurant>) -> Result<Restaurant, ResolveError> {
    match found {
        None => Err(ResolveError::NotFound),
        Some(r) if !r.is_active => Err(ResolveError::Inactive),
        Some(r) => Ok(r),
    }
}

/// Branding used when no row exists for the restaurant yet.
pub fn default_branding(restaurant_id: Uuid) -> TenantBranding {
    TenantBranding {
        restaurant_id,
        primary_color: Some("#0891b2".into()),
        secondary_color: Some("#f59e0b".into()),
        background_color: Some("#ffffff".into()),
        text_color: Some("#1f2937".into()),
        header_image_url: None,
        header_title: None,
        header_subtitle: None,
        logo_url: None,
        favicon_url: None,
        updated_at: OffsetDateTime::now_utc(),
    }
}

#[cfg(test)]
mod resolver_tests {
    use super::*;
    use rust_decimal::Decimal;

    fn restaurant(is_active: bool) -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            slug: "kampeki-sushi".into(),
            name: "Kampeki Sushi".into(),
            description: None,
            logo_url: None,
            cover_url: None,
            is_open: true,
            is_active,
            delivery_enabled: true,
            pickup_enabled: true,
            minimum_order: Decimal::ZERO,
            latitude: None,
            longitude: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn missing_slug_is_not_found() {
        let err = classify(None).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn inactive_restaurant_exposes_no_data() {
        let err = classify(Some(restaurant(false))).unwrap_err();
        assert!(matches!(err, ResolveError::Inactive));
        assert_eq!(err.to_string(), "Este restaurante não está disponível no momento");
    }

    #[test]
    fn active_restaurant_resolves() {
        let r = classify(Some(restaurant(true))).expect("should resolve");
        assert_eq!(r.slug, "kampeki-sushi");
    }

    #[test]
    fn default_branding_produces_a_full_theme() {
        let branding = default_branding(Uuid::new_v4());
        let theme = theme::resolve(&branding);
        assert_eq!(theme.len(), 4);
        assert!(theme.contains_key("--primary"));
        assert!(theme.contains_key("--secondary"));
        assert!(theme.contains_key("--background"));
        assert!(theme.contains_key("--foreground"));
    }
}
