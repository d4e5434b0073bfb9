use actix_web::{web, HttpResponse};

use crate::startup::AppState;

/// GET /
///
/// Renders a small service information page.
pub async fn home(state: web::Data<AppState>) -> HttpResponse {
    let app = &state.application;
    let body = format!(
        "<html>\
         <head><title>{name} Service</title></head>\
         <body><dl>\
         {}{}{}\
         </dl></body>\
         </html>",
        render("name", &app.name),
        render("version", env!("CARGO_PKG_VERSION")),
        render("server", &app.address()),
        name = app.name,
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn render(label: &str, data: &str) -> String {
    format!("<dt><b>{}</b></dt><dd>{}</dd>", label, data)
}
