use std::net::TcpListener;

use actix_session::storage::RedisSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_lab::middleware::from_fn;
use secrecy::ExposeSecret;
use secrecy::Secret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;

use crate::authentication::reject_anonymous_users;
use crate::authentication::seed_admin;
use crate::configuration::DatabaseSettings;
use crate::configuration::Settings;
use crate::email_client::EmailClient;
use crate::routes::admin_dashboard;
use crate::routes::health_check;
use crate::routes::home;
use crate::routes::login;
use crate::routes::login_form;
use crate::routes::logout;
use crate::routes::send_launch_notification;
use crate::routes::send_update;
use crate::routes::stats_json;
use crate::routes::subscribe;
use crate::routes::subscribers_json;

/// Wrapper for actix's `Server` with access to the bound port. Not to be
/// confused with actix's `App`!
pub struct Application {
    /// Use `port()` to access; with `application.port = 0` the OS picks it
    port: u16,
    server: Server,
}

impl Application {
    /// Bind the listener, build the db pool and email client, seed the admin
    /// account, and assemble the `Server` (which is not yet running).
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;
        let port = listener.local_addr()?.port();

        let pool = get_connection_pool(&cfg.database);
        seed_admin(&cfg.admin, &pool).await?;

        let email_client = cfg.email_client.client()?;

        let server = run(
            listener,
            pool,
            email_client,
            cfg.application.base_url,
            cfg.application.hmac_secret,
            cfg.redis_uri,
        )
        .await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 { self.port }

    /// Consumes `self`; should be the final call (or passed to
    /// `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// Connects lazily: the first query opens the first connection.
pub fn get_connection_pool(db_cfg: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(db_cfg.connection())
}

/// Wrapper for the public `base_url` (raw `String`s would collide with one
/// another when extracted from `Data`)
pub struct AppBaseUrl(pub String);

/// Declares all endpoints. Requires a running Redis instance for admin
/// sessions.
pub async fn run(
    listener: TcpListener,
    pool: PgPool,
    email_client: EmailClient,
    base_url: String,
    hmac_secret: Secret<String>,
    redis_uri: Secret<String>,
) -> Result<Server, anyhow::Error> {
    let secret_key = Key::from(hmac_secret.expose_secret().as_bytes());

    // flash messages live in signed client side cookies
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    // admin sessions live server side
    let redis_store = RedisSessionStore::new(redis_uri.expose_secret()).await?;

    // `Data` is an `Arc` on the outside; every worker gets a cheap clone
    let pool = Data::new(pool);
    let email_client = Data::new(email_client);
    let base_url = Data::new(AppBaseUrl(base_url));

    // the closure runs once per worker thread, hence all the clones
    let server = HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(SessionMiddleware::new(
                redis_store.clone(),
                secret_key.clone(),
            ))
            .wrap(TracingLogger::default())
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(subscribe))
            .route("/login", web::get().to(login_form))
            .route("/login", web::post().to(login))
            .service(
                web::scope("/admin")
                    .wrap(from_fn(reject_anonymous_users))
                    .route("", web::get().to(admin_dashboard))
                    .route("/dashboard", web::get().to(admin_dashboard))
                    .route("/updates", web::post().to(send_update))
                    .route("/launch", web::post().to(send_launch_notification))
                    .route("/subscribers", web::get().to(subscribers_json))
                    .route("/stats", web::get().to(stats_json))
                    .route("/logout", web::post().to(logout)),
            )
            .app_data(pool.clone())
            .app_data(email_client.clone())
            .app_data(base_url.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
