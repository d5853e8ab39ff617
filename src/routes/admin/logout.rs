use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;

use crate::session_state::TypedSession;
use crate::utils::redirect;

/// `POST /admin/logout`
///
/// Only reachable through `reject_anonymous_users`, so there is always a
/// session to drop.
pub async fn logout(session: TypedSession) -> HttpResponse {
    session.logout();
    FlashMessage::info("You have successfully logged out.").send();
    redirect("/login")
}
