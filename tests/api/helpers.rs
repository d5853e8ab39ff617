use launch_waitlist::configuration::get_configuration;
use launch_waitlist::configuration::DatabaseSettings;
use launch_waitlist::startup::get_connection_pool;
use launch_waitlist::startup::Application;
use launch_waitlist::telemetry::get_subscriber;
use launch_waitlist::telemetry::init_subscriber;
use once_cell::sync::Lazy;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Init the tracing subscriber once for the whole test binary.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // the two sinks are different closure types, hence the duplicated arms
    match std::env::var("TEST_LOG") {
        Ok(_) => init_subscriber(get_subscriber("test", "debug", std::io::stdout)),
        Err(_) => init_subscriber(get_subscriber("test", "debug", std::io::sink)),
    };
});

pub struct TestAdmin {
    pub username: String,
    pub password: String,
}

pub struct TestApp {
    pub addr: String,
    pub pool: PgPool,
    pub email_server: MockServer,
    pub admin: TestAdmin,
    /// Keeps cookies (session, flash messages) between requests, and does
    /// not follow redirects so tests can check them
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscriptions(
        &self,
        body: String,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/subscriptions", self.addr))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("execute request")
    }

    /// Urlencoded signup with all three fields present
    pub async fn subscribe(
        &self,
        first_name: &str,
        email: &str,
    ) -> reqwest::Response {
        let body = serde_urlencoded::to_string([
            ("first_name", first_name),
            ("email", email),
            ("notify", "on"),
        ])
        .unwrap();
        self.post_subscriptions(body).await
    }

    pub async fn get_home_html(&self) -> String {
        self.api_client
            .get(format!("{}/", self.addr))
            .send()
            .await
            .expect("execute request")
            .text()
            .await
            .unwrap()
    }

    pub async fn post_login<Body: serde::Serialize>(
        &self,
        body: &Body,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/login", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn login_as_admin(&self) {
        let resp = self
            .post_login(&serde_json::json!({
                "username": self.admin.username,
                "password": self.admin.password,
            }))
            .await;
        check_redirect(&resp, "/admin/dashboard");
    }

    pub async fn get_admin_dashboard(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/admin/dashboard", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_admin_dashboard_html(&self) -> String { self.get_admin_dashboard().await.text().await.unwrap() }

    pub async fn post_update<Body: serde::Serialize>(
        &self,
        body: &Body,
    ) -> reqwest::Response {
        self.api_client
            .post(format!("{}/admin/updates", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn post_launch(&self) -> reqwest::Response {
        self.api_client
            .post(format!("{}/admin/launch", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_admin_json(
        &self,
        endpoint: &str,
    ) -> Value {
        self.api_client
            .get(format!("{}/admin/{endpoint}", self.addr))
            .send()
            .await
            .expect("execute request")
            .error_for_status()
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.api_client
            .post(format!("{}/admin/logout", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    /// Accept every email sent from now on, without expectations
    pub async fn accept_all_emails(&self) {
        Mock::given(path("/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.email_server)
            .await;
    }

    pub async fn count_subscribers(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM email_subscribers")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// `(type, recipient_email, success)` of every logged notification
    pub async fn notifications(&self) -> Vec<(String, String, bool)> {
        sqlx::query_as(
            r#"SELECT "type", recipient_email, success FROM notifications_sent ORDER BY sent_at"#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap()
    }
}

pub fn check_redirect(
    resp: &reqwest::Response,
    location: &str,
) {
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), location);
}

/// Create a db with a randomised name and run all migrations on it
async fn configure_database(cfg: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&cfg.connection_without_db())
        .await
        .expect("postgres must be running; run scripts/init_db.sh");
    conn.execute(format!(r#"CREATE DATABASE "{}";"#, cfg.database_name).as_str())
        .await
        .expect("failed to create database");

    let pool = PgPool::connect_with(cfg.connection()).await.unwrap();
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to migrate");
    pool
}

/// Spawn the app on a random port, with its own fresh database and a mock
/// email API. Redis must be running (scripts/init_redis.sh).
pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let cfg = {
        let mut cfg = get_configuration().expect("failed to read configuration");
        cfg.database.database_name = Uuid::new_v4().to_string();
        cfg.application.port = 0;
        cfg.email_client.base_url = email_server.uri();
        cfg
    };

    configure_database(&cfg.database).await;

    let app = Application::build(cfg.clone())
        .await
        .expect("failed to build application");
    let addr = format!("http://localhost:{}", app.port());
    tokio::spawn(app.run_until_stopped());

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        addr,
        pool: get_connection_pool(&cfg.database),
        email_server,
        admin: TestAdmin {
            username: cfg.admin.username.clone(),
            password: cfg.admin.password.expose_secret().clone(),
        },
        api_client,
    }
}
