use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use htmlescape::encode_attribute;

use crate::domain::PRODUCT_NAME;
use crate::utils::flash_html;

/// What the visitor typed, echoed back into the form when a submission has to
/// be retried. Empty by default (fresh page, or after a successful signup).
#[derive(Default)]
pub struct SignupFormValues<'a> {
    pub first_name: &'a str,
    pub email: &'a str,
    pub notify: bool,
}

/// Fill in `home.html`. `notices` is trusted html (see `utils::notice_html`);
/// form values are escaped here.
pub fn landing_page(
    values: &SignupFormValues,
    notices: &str,
) -> String {
    // path relative to this file (checked at compile time!)
    include_str!("./home.html")
        .replace("{{product_upper}}", &PRODUCT_NAME.to_uppercase())
        .replace("{{product}}", PRODUCT_NAME)
        .replace("{{first_name}}", &encode_attribute(values.first_name))
        .replace("{{email}}", &encode_attribute(values.email))
        .replace(
            "{{notify_checked}}",
            match values.notify {
                true => "checked",
                false => "",
            },
        )
        .replace("{{notices}}", notices)
}

/// `GET /`
///
/// Landing page with the waitlist form. Outcomes of the last submission arrive
/// as flash messages.
pub async fn home(flash_messages: IncomingFlashMessages) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(landing_page(
            &SignupFormValues::default(),
            &flash_html(&flash_messages),
        ))
}
