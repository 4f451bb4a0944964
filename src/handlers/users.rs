use axum::{extract::State, Extension, Json};

use crate::auth::middleware::AuthUser;
use crate::models::user::User;
use crate::AppState;

/// Public: the login screen picks an identity from this list.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.users.list_users().await)
}

pub async fn me(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<User> {
    Json(user)
}
