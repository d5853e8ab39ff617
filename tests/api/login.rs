use crate::helpers::check_redirect;
use crate::helpers::spawn_app;

#[tokio::test]
async fn login_invalid() {
    let app = spawn_app().await;
    let login_body = serde_json::json!({
        "username": "username",
        "password": "password",
    });
    let resp = app.post_login(&login_body).await;
    check_redirect(&resp, "/login");

    let html = app
        .api_client
        .get(format!("{}/login", app.addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Authentication failed"));

    // still locked out
    let resp = app.get_admin_dashboard().await;
    check_redirect(&resp, "/login");
}

#[tokio::test]
async fn login_wrong_password() {
    let app = spawn_app().await;
    let login_body = serde_json::json!({
        "username": app.admin.username,
        "password": "not-the-password",
    });
    let resp = app.post_login(&login_body).await;
    check_redirect(&resp, "/login");
}

#[tokio::test]
async fn login_ok() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains(&format!("Welcome {}!", app.admin.username)));
}

#[tokio::test]
async fn admin_routes_without_login() {
    let app = spawn_app().await;

    for endpoint in ["", "/dashboard", "/subscribers", "/stats"] {
        let resp = app
            .api_client
            .get(format!("{}/admin{endpoint}", app.addr))
            .send()
            .await
            .unwrap();
        check_redirect(&resp, "/login");
    }

    check_redirect(&app.post_launch().await, "/login");
    check_redirect(
        &app.post_update(&serde_json::json!({"title": "T", "content": "C"}))
            .await,
        "/login",
    );
}

#[tokio::test]
async fn logout() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let resp = app.post_logout().await;
    check_redirect(&resp, "/login");

    let html = app
        .api_client
        .get(format!("{}/login", app.addr))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("You have successfully logged out."));

    let resp = app.get_admin_dashboard().await;
    check_redirect(&resp, "/login");
}
