use crate::fixtures::test_app::TestApp;
use serde_json::Value;
use sitedesk_db::models::Role;

#[tokio::test]
async fn seeded_code_redeems_and_increments_usage() {
    let app = TestApp::spawn().await;
    app.seed_invitation("ENG2024", Role::Engineer, 5, 3600).await;

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .json(&serde_json::json!({ "code": "ENG2024", "fingerprint": "fp_abc" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["session"]["role"], "engineer");
    assert_eq!(json["session"]["fingerprint"], "fp_abc");
    assert!(json["session"]["session_id"].is_string());

    let row = app.invitation_row("ENG2024").await.unwrap();
    assert_eq!(row.current_uses, 1);
    assert!(row.used_at.is_some());
}

#[tokio::test]
async fn codes_are_normalized_before_lookup() {
    let app = TestApp::spawn().await;
    app.seed_invitation("SITE2024", Role::Worker, 0, 3600).await;

    let session = app.redeem("  site2024  ", "fp_abc").await;
    assert_eq!(session.role, "worker");
}

#[tokio::test]
async fn unknown_code_is_rejected() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .json(&serde_json::json!({ "code": "NOPE", "fingerprint": "fp_abc" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid invitation code");
}

#[tokio::test]
async fn expired_code_is_rejected_despite_remaining_uses() {
    let app = TestApp::spawn().await;
    app.seed_invitation("OLD2023", Role::Engineer, 100, -60).await;

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .json(&serde_json::json!({ "code": "OLD2023", "fingerprint": "fp_abc" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Invitation code has expired");

    let row = app.invitation_row("OLD2023").await.unwrap();
    assert_eq!(row.current_uses, 0);
}

#[tokio::test]
async fn single_use_code_rejects_second_redemption() {
    let app = TestApp::spawn().await;
    app.seed_invitation("ONCE", Role::Visitor, 1, 3600).await;

    app.redeem("ONCE", "fp_first").await;

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .json(&serde_json::json!({ "code": "ONCE", "fingerprint": "fp_second" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 401);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Invitation code fully used");

    let row = app.invitation_row("ONCE").await.unwrap();
    assert_eq!(row.current_uses, 1);
}

#[tokio::test]
async fn zero_max_uses_means_unlimited() {
    let app = TestApp::spawn().await;
    app.seed_invitation("OPEN", Role::Visitor, 0, 3600).await;

    for i in 0..3 {
        app.redeem("OPEN", &format!("fp_{i}")).await;
    }

    let row = app.invitation_row("OPEN").await.unwrap();
    assert_eq!(row.current_uses, 3);
}

#[tokio::test]
async fn empty_code_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .json(&serde_json::json!({ "code": "   " }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn missing_fingerprint_gets_a_derived_one() {
    let app = TestApp::spawn().await;
    app.seed_invitation("NOFP", Role::Worker, 0, 3600).await;

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .json(&serde_json::json!({ "code": "NOFP" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let fp = json["session"]["fingerprint"].as_str().unwrap();
    assert!(fp.starts_with("fp_"));
}

#[tokio::test]
async fn racing_redemptions_cannot_overspend_a_code() {
    let app = TestApp::spawn().await;
    app.seed_invitation("LAST1", Role::Worker, 1, 3600).await;

    let post = |fp: &'static str| {
        app.client
            .post(app.url("/api/invite/validate"))
            .json(&serde_json::json!({ "code": "LAST1", "fingerprint": fp }))
            .send()
    };

    let (a, b) = tokio::join!(post("fp_a"), post("fp_b"));
    let statuses = [a.unwrap().status().as_u16(), b.unwrap().status().as_u16()];

    assert_eq!(
        statuses.iter().filter(|&&s| s == 200).count(),
        1,
        "exactly one of two racing redemptions may win: {statuses:?}"
    );

    let row = app.invitation_row("LAST1").await.unwrap();
    assert_eq!(row.current_uses, 1);
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["status"], "ok");
}
