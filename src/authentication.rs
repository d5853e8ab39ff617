// the only authenticated client is a human admin in a browser, so we use
// session-based authentication behind a login form

mod middleware;

use anyhow::Context;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::Version;
pub use middleware::reject_anonymous_users;
pub use middleware::UserId;
use secrecy::ExposeSecret;
use secrecy::Secret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::configuration::AdminSettings;
use crate::telemetry::spawn_blocking_with_tracing;

pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials(#[source] anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Used when the username is unknown, so that a failed lookup costs as much
/// as a failed password check. Same params as `compute_password_hash`.
const FALLBACK_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1\
    $gZiV/M1gPc22ElAH/Jh1Hw\
    $CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[tracing::instrument(name = "Getting stored credentials", skip(username, pool))]
async fn get_stored_credentials(
    username: &str,
    pool: &PgPool,
) -> Result<Option<(Uuid, Secret<String>)>, anyhow::Error> {
    let row: Option<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT user_id, password_hash
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .context("Failed to query users table")?;
    Ok(row.map(|(user_id, hash)| (user_id, Secret::new(hash))))
}

/// CPU-bound (up to ~0.5 s); run it with `spawn_blocking_with_tracing`
#[tracing::instrument(name = "Verifying password hash", skip_all)]
fn verify_password(
    supplied_password: Secret<String>,
    stored_password: Secret<String>,
) -> Result<(), AuthError> {
    let stored_password = PasswordHash::new(stored_password.expose_secret())
        .context("Failed to read stored PHC string")?;
    Argon2::default()
        .verify_password(
            supplied_password.expose_secret().as_bytes(),
            &stored_password,
        )
        .context("Invalid password")
        .map_err(AuthError::InvalidCredentials)
}

/// Check supplied credentials against the `users` table, returning the user's
/// id on success.
#[tracing::instrument(name = "Validating credentials", skip(creds, pool))]
pub async fn validate_credentials(
    creds: Credentials,
    pool: &PgPool,
) -> Result<Uuid, AuthError> {
    let mut user_id = None;
    let mut stored_password = Secret::new(FALLBACK_PASSWORD_HASH.to_string());

    if let Some((id, hash)) = get_stored_credentials(&creds.username, pool).await? {
        user_id = Some(id);
        stored_password = hash;
    }

    spawn_blocking_with_tracing(move || verify_password(creds.password, stored_password))
        .await
        .context("Failed to spawn blocking thread")??;

    // only reachable with an unknown username if someone guessed the fallback
    // hash's password
    user_id
        .ok_or_else(|| anyhow::anyhow!("Unknown username"))
        .map_err(AuthError::InvalidCredentials)
}

/// PHC string (algorithm, version, params, salt and hash in one field)
fn compute_password_hash(password: Secret<String>) -> Result<Secret<String>, anyhow::Error> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(19456, 2, 1, None).map_err(|e| anyhow::anyhow!("{e}"))?,
    )
    .hash_password(password.expose_secret().as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("{e}"))?
    .to_string();
    Ok(Secret::new(hash))
}

/// Create the configured admin account, unless a user with that name already
/// exists.
#[tracing::instrument(name = "Seeding admin user", skip(admin, pool), fields(username = %admin.username))]
pub async fn seed_admin(
    admin: &AdminSettings,
    pool: &PgPool,
) -> Result<(), anyhow::Error> {
    let password = admin.password.clone();
    let password_hash = spawn_blocking_with_tracing(move || compute_password_hash(password))
        .await
        .context("Failed to spawn blocking thread")??;

    sqlx::query(
        r#"
        INSERT INTO users (user_id, username, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&admin.username)
    .bind(password_hash.expose_secret())
    .execute(pool)
    .await
    .context("Failed to insert admin user")?;
    Ok(())
}
