mod admin;
mod health_check;
mod home;
mod login;
mod subscriptions;

pub use admin::*;
pub use health_check::*;
pub use home::*;
pub use login::*;
pub use subscriptions::*;

/// Walk the whole `source` chain, one cause per line. Used by the `Debug`
/// impls of route-level errors, so that logs show what actually went wrong.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}
