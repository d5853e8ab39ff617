use std::fmt::Debug;
use std::fmt::Display;

use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use actix_web_flash_messages::Level;
use htmlescape::encode_minimal;

/// Convert arbitrary error types to `actix_web::Error` with HTTP 500
pub fn error_500<T>(e: T) -> actix_web::Error
where
    T: Debug + Display + 'static,
{
    actix_web::error::ErrorInternalServerError(e)
}

/// 303 See Other
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

/// One `<p>` per notice, with the level as css class
pub fn notice_html(
    level: Level,
    content: &str,
) -> String {
    let class = match level {
        Level::Error => "error",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    };
    format!(
        "<p class=\"notice {class}\"><i>{}</i></p>\n",
        encode_minimal(content)
    )
}

/// Render all flash messages attached to the request
pub fn flash_html(flash_messages: &IncomingFlashMessages) -> String {
    flash_messages
        .iter()
        .map(|m| notice_html(m.level(), m.content()))
        .collect()
}
