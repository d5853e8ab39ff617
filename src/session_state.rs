use std::future::ready;
use std::future::Ready;

use actix_session::Session;
use actix_session::SessionExt;
use actix_session::SessionGetError;
use actix_session::SessionInsertError;
use actix_web::dev::Payload;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use uuid::Uuid;

/// Wrapper around `actix_session::Session` so the admin's id is read and
/// written through typed methods instead of string keys.
pub struct TypedSession(Session);

impl TypedSession {
    const USER_ID_KEY: &'static str = "user_id";

    /// Rotate the session key; called on login to prevent session fixation
    pub fn renew(&self) { self.0.renew(); }

    pub fn insert_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<(), SessionInsertError> {
        self.0.insert(Self::USER_ID_KEY, user_id)
    }

    pub fn get_user_id(&self) -> Result<Option<Uuid>, SessionGetError> { self.0.get(Self::USER_ID_KEY) }

    /// Drop the session both server side (redis) and client side (cookie)
    pub fn logout(self) { self.0.purge() }
}

impl FromRequest for TypedSession {
    // reuse the error type of `Session`'s own `FromRequest` impl
    type Error = <Session as FromRequest>::Error;

    // no I/O is needed to build the session, so the future is ready on first
    // poll
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(
        req: &HttpRequest,
        _payload: &mut Payload,
    ) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
