use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;

use crate::domain::PRODUCT_NAME;
use crate::utils::flash_html;

/// `GET /login`
///
/// Failed attempts come back here with the error as a flash message.
// GET login -> enter creds -> POST login --> ok -> /admin/dashboard
// ^------------------ not ok -/
pub async fn login_form(flash_messages: IncomingFlashMessages) -> HttpResponse {
    let notices = flash_html(&flash_messages);
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>{PRODUCT_NAME} admin login</title>
  </head>
  <body>
    {notices}
    <form action="/login" method="post">
      <label>
        Username
        <input type="text" placeholder="Enter Username" name="username" />
      </label>

      <label>
        Password
        <input type="password" placeholder="Enter Password" name="password" />
      </label>

      <button type="submit">Login</button>
    </form>
  </body>
</html>"#
        ))
}
