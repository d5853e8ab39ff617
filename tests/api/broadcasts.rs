use wiremock::matchers::any;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::check_redirect;
use crate::helpers::spawn_app;
use crate::helpers::TestApp;

/// Subscribe `n` people while welcome emails are accepted, then drop the mock
/// so that each test can set its own expectations
async fn with_subscribers(
    app: &TestApp,
    n: usize,
) {
    let _guard = Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .named("welcome emails")
        .expect(n as u64)
        .mount_as_scoped(&app.email_server)
        .await;
    for i in 0..n {
        let resp = app
            .subscribe(&format!("Student{i}"), &format!("student{i}@campus.edu"))
            .await;
        check_redirect(&resp, "/");
    }
}

#[tokio::test]
async fn send_update_ok() {
    let app = spawn_app().await;
    with_subscribers(&app, 2).await;
    app.login_as_admin().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let resp = app
        .post_update(&serde_json::json!({"title": "T", "content": "C"}))
        .await;
    check_redirect(&resp, "/admin/dashboard");

    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains("has been sent to 2 subscribers."));
    // 2 welcome + 2 update
    assert!(html.contains(r#"<strong id="total-notifications">4</strong>"#));

    let updates: Vec<_> = app
        .notifications()
        .await
        .into_iter()
        .filter(|(kind, _, _)| kind == "update")
        .collect();
    assert_eq!(updates.len(), 2);
    assert!(updates.iter().all(|(_, _, success)| *success));

    let (title, content): (String, String) =
        sqlx::query_as(r#"SELECT title, content FROM notifications_sent WHERE "type" = 'update' LIMIT 1"#)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(title, "T");
    assert_eq!(content, "C");
}

#[tokio::test]
async fn send_update_missing_fields() {
    let app = spawn_app().await;
    with_subscribers(&app, 1).await;
    app.login_as_admin().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for body in [
        serde_json::json!({"title": "", "content": "C"}),
        serde_json::json!({"title": "T", "content": "   "}),
        serde_json::json!({"title": "T"}),
    ] {
        let resp = app.post_update(&body).await;
        check_redirect(&resp, "/admin/dashboard");
        let html = app.get_admin_dashboard_html().await;
        assert!(html.contains("Missing Information"));
    }

    assert_eq!(app.notifications().await.len(), 1); // welcome only
}

#[tokio::test]
async fn send_launch_ok() {
    let app = spawn_app().await;
    with_subscribers(&app, 3).await;
    app.login_as_admin().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&app.email_server)
        .await;

    let resp = app.post_launch().await;
    check_redirect(&resp, "/admin/dashboard");

    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains("All 3 subscribers have been notified about the launch."));

    let launches = app
        .notifications()
        .await
        .into_iter()
        .filter(|(kind, _, _)| kind == "launch")
        .count();
    assert_eq!(launches, 3);
}

#[tokio::test]
async fn send_launch_without_subscribers() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let html = app.get_admin_dashboard_html().await;
    assert_eq!(html.matches("<button type=\"submit\" disabled>").count(), 2);

    // bypass the disabled button
    let resp = app.post_launch().await;
    check_redirect(&resp, "/admin/dashboard");
    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains("There are no subscribers to send the launch notification to."));

    let resp = app
        .post_update(&serde_json::json!({"title": "T", "content": "C"}))
        .await;
    check_redirect(&resp, "/admin/dashboard");
    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains("There are no subscribers to send the update to."));

    assert!(app.notifications().await.is_empty());
}

#[tokio::test]
async fn failed_deliveries_are_recorded() {
    let app = spawn_app().await;
    with_subscribers(&app, 2).await;
    app.login_as_admin().await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&app.email_server)
        .await;

    let resp = app.post_launch().await;
    check_redirect(&resp, "/admin/dashboard");
    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains("(2 failed)"));

    let launches: Vec<_> = app
        .notifications()
        .await
        .into_iter()
        .filter(|(kind, _, _)| kind == "launch")
        .collect();
    assert_eq!(launches.len(), 2);
    assert!(launches.iter().all(|(_, _, success)| !success));
}
