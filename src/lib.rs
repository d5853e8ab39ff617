//! "Coming soon" landing page with an email waitlist, plus an admin dashboard
//! for broadcasting updates and the launch announcement to everyone on the
//! list.
//!
//! Endpoints are declared in `startup::run`.

pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod telemetry;
pub mod utils;
