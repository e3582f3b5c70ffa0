use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use uuid::Uuid;

/// Identity established by the auth collaborator upstream; this service
/// only trusts the session header it forwards.
pub struct SessionUser(pub Uuid);

const SESSION_HEADER: &str = "x-user-id";

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Sessão ausente".to_string()))?;

        let user_id = raw
            .parse::<Uuid>()
            .map_err(|_| (StatusCode::UNAUTHORIZED, "Sessão inválida".to_string()))?;

        Ok(SessionUser(user_id))
    }
}
