use axum::response::IntoResponse;

// Undocumented banner route, handy for smoke checks behind load balancers.
pub async fn root() -> impl IntoResponse {
    crate::APP_USER_AGENT
}
