use axum::response::Html;

/// The admin panel: a single static page that drives the admin API.
const ADMIN_PAGE: &str = include_str!("../../assets/admin.html");

/// GET /admin
pub async fn panel() -> Html<&'static str> {
    Html(ADMIN_PAGE)
}
