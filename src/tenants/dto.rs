use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::{Restaurant, TenantBranding};
use crate::hours::HoursStatus;

/// Public view of a restaurant. Internal fields (owner, activation flag)
/// never leave the service through storefront responses.
#[derive(Debug, Serialize)]
pub struct RestaurantView {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub is_open: bool,
    pub delivery_enabled: bool,
    pub pickup_enabled: bool,
    pub minimum_order: Decimal,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Restaurant> for RestaurantView {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            slug: r.slug,
            name: r.name,
            description: r.description,
            logo_url: r.logo_url,
            cover_url: r.cover_url,
            is_open: r.is_open,
            delivery_enabled: r.delivery_enabled,
            pickup_enabled: r.pickup_enabled,
            minimum_order: r.minimum_order,
            latitude: r.latitude,
            longitude: r.longitude,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BrandingView {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub header_image_url: Option<String>,
    pub header_title: Option<String>,
    pub header_subtitle: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
}

impl From<TenantBranding> for BrandingView {
    fn from(b: TenantBranding) -> Self {
        Self {
            primary_color: b.primary_color,
            secondary_color: b.secondary_color,
            background_color: b.background_color,
            text_color: b.text_color,
            header_image_url: b.header_image_url,
            header_title: b.header_title,
            header_subtitle: b.header_subtitle,
            logo_url: b.logo_url,
            favicon_url: b.favicon_url,
        }
    }
}

/// Everything a storefront needs to render its shell in one round trip.
#[derive(Debug, Serialize)]
pub struct StorefrontResponse {
    pub restaurant: RestaurantView,
    pub branding: BrandingView,
    pub theme: BTreeMap<String, String>,
    pub hours: HoursStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
    pub is_open: Option<bool>,
    pub delivery_enabled: Option<bool>,
    pub pickup_enabled: Option<bool>,
    pub minimum_order: Option<Decimal>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertBrandingRequest {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub header_image_url: Option<String>,
    pub header_title: Option<String>,
    pub header_subtitle: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
}

impl UpsertBrandingRequest {
    /// Colors are validated at the boundary so malformed rows never reach
    /// the theme resolver. Returns the offending value on failure.
    pub fn invalid_color(&self) -> Option<&str> {
        [
            self.primary_color.as_deref(),
            self.secondary_color.as_deref(),
            self.background_color.as_deref(),
            self.text_color.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|c| !super::theme::is_valid_hex(c))
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod dto_tests {
    use super::*;

    #[test]
    fn branding_request_flags_first_invalid_color() {
        let req = UpsertBrandingRequest {
            primary_color: Some("#0891b2".into()),
            secondary_color: Some("oops".into()),
            background_color: None,
            text_color: None,
            header_image_url: None,
            header_title: None,
            header_subtitle: None,
            logo_url: None,
            favicon_url: None,
        };
        assert_eq!(req.invalid_color(), Some("oops"));
    }

    #[test]
    fn branding_request_accepts_valid_colors() {
        let req = UpsertBrandingRequest {
            primary_color: Some("#0891b2".into()),
            secondary_color: None,
            background_color: Some("#FFFFFF".into()),
            text_color: None,
            header_image_url: None,
            header_title: None,
            header_subtitle: None,
            logo_url: None,
            favicon_url: None,
        };
        assert_eq!(req.invalid_color(), None);
    }
}
