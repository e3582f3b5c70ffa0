use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{self, Role, SessionUser},
    state::AppState,
    storage,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/uploads", post(upload_image).delete(delete_upload))
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024)) // validated limit is 5MB; leave multipart headroom
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    /// Key prefix, e.g. "products" or "branding".
    #[serde(default = "default_scope")]
    scope: String,
}

fn default_scope() -> String {
    "uploads".into()
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    key: String,
    url: String,
}

/// POST /uploads (multipart, field `file`). MIME type and size are
/// checked before the storage call so rejected files never hit the
/// bucket.
#[instrument(skip(state, mp))]
async fn upload_image(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(query): Query<UploadQuery>,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Lojista).await?;

    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let data = field.bytes().await.map_err(|e| {
            warn!(error = %e, "failed reading multipart field");
            (StatusCode::BAD_REQUEST, "Falha ao ler o arquivo".to_string())
        })?;

        if let Err(msg) = storage::validate_image(&content_type, data.len()) {
            return Err((StatusCode::BAD_REQUEST, msg));
        }
        // validate_image only passes types ext_from_mime knows.
        let ext = storage::ext_from_mime(&content_type).unwrap_or("bin");

        let key = format!("{}/{}.{}", query.scope.trim_matches('/'), Uuid::new_v4(), ext);
        state
            .storage
            .put_object(&key, data, &content_type)
            .await
            .map_err(|e| {
                error!(error = %e, key, "upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Falha ao enviar a imagem".to_string(),
                )
            })?;

        let url = state.storage.public_url(&key);
        info!(%user_id, key, "image uploaded");
        return Ok((StatusCode::CREATED, Json(UploadResponse { key, url })));
    }

    Err((StatusCode::BAD_REQUEST, "Campo 'file' é obrigatório".to_string()))
}

#[derive(Debug, Deserialize)]
struct DeleteQuery {
    key: String,
}

#[instrument(skip(state))]
async fn delete_upload(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    auth::require_role(&state, user_id, Role::Lojista).await?;
    state.storage.delete_object(&query.key).await.map_err(|e| {
        error!(error = %e, key = %query.key, "delete failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Falha ao remover a imagem".to_string(),
        )
    })?;
    info!(%user_id, key = %query.key, "image deleted");
    Ok(StatusCode::NO_CONTENT)
}
