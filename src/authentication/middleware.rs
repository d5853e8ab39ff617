use std::ops::Deref;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::error::InternalError;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web_lab::middleware::Next;
use uuid::Uuid;

use crate::session_state::TypedSession;
use crate::utils::error_500;
use crate::utils::redirect;

/// Id of the logged-in admin, inserted into request extensions by
/// `reject_anonymous_users`. Extract with `web::ReqData<UserId>`.
#[derive(Clone, Copy, Debug)]
pub struct UserId(Uuid);

impl Deref for UserId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl std::fmt::Display for UserId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Guards the whole `/admin` scope: anonymous requests are redirected to
/// `/login`, logged-in requests carry a `UserId` downstream.
///
/// See `actix_web_lab::middleware::from_fn`.
pub async fn reject_anonymous_users(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let session = {
        let (raw_req, payload) = req.parts_mut();
        TypedSession::from_request(raw_req, payload).await?
    };

    match session.get_user_id().map_err(error_500)? {
        Some(user_id) => {
            req.extensions_mut().insert(UserId(user_id));
            next.call(req).await
        }
        None => {
            let resp = redirect("/login");
            let err = anyhow::anyhow!("You must be logged in to access this resource.");
            Err(InternalError::from_response(err, resp).into())
        }
    }
}
