use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::User;
use crate::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The directory entry for the caller, resolved once per request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

fn caller_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

/// Identifies the caller from `X-User-Id`. There are no credentials; an
/// absent, malformed or unknown id is rejected as unauthorized.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let id = caller_id(req.headers()).ok_or(AppError::Unauthorized)?;
    let user = state.users.get_user(id).await.ok_or_else(|| {
        tracing::debug!(user_id = %id, "Request from unknown user");
        AppError::Unauthorized
    })?;

    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_caller_id_parses_trimmed_uuid() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&format!(" {id} ")).unwrap(),
        );
        assert_eq!(caller_id(&headers), Some(id));
    }

    #[test]
    fn test_caller_id_rejects_missing_or_malformed() {
        let mut headers = HeaderMap::new();
        assert_eq!(caller_id(&headers), None);
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert_eq!(caller_id(&headers), None);
    }
}
