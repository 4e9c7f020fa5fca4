use crate::fixtures::test_app::TestApp;
use serde_json::Value;
use sitedesk_db::models::Role;

async fn attempt(app: &TestApp, code: &str, ip: &str) -> u16 {
    app.client
        .post(app.url("/api/invite/validate"))
        .header("X-Forwarded-For", ip)
        .json(&serde_json::json!({ "code": code, "fingerprint": "fp_rl" }))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}

#[tokio::test]
async fn sixth_failed_attempt_is_rate_limited() {
    let app = TestApp::spawn().await;

    for _ in 0..5 {
        assert_eq!(attempt(&app, "BOGUS", "10.0.0.1").await, 401);
    }

    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .header("X-Forwarded-For", "10.0.0.1")
        .json(&serde_json::json!({ "code": "BOGUS", "fingerprint": "fp_rl" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 429);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Too many attempts, please try again later");
}

#[tokio::test]
async fn rate_limit_fires_before_code_evaluation() {
    let app = TestApp::spawn().await;
    app.seed_invitation("ONESHOT", Role::Worker, 1, 3600).await;

    // Spend the code, then pile failures onto its (ip, code) key.
    app.redeem("ONESHOT", "fp_rl").await;
    for _ in 0..5 {
        let status = attempt(&app, "ONESHOT", "10.0.0.2").await;
        assert_eq!(status, 401); // "fully used"
    }

    // The 6th attempt is refused as rate-limited, not as fully-used:
    // the limiter answers before the code is even looked at.
    let resp = app
        .client
        .post(app.url("/api/invite/validate"))
        .header("X-Forwarded-For", "10.0.0.2")
        .json(&serde_json::json!({ "code": "ONESHOT", "fingerprint": "fp_rl" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 429);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "Too many attempts, please try again later");

    // And the row was never touched again.
    assert_eq!(app.invitation_row("ONESHOT").await.unwrap().current_uses, 1);
}

#[tokio::test]
async fn counters_are_keyed_by_client_and_code() {
    let app = TestApp::spawn().await;

    for _ in 0..5 {
        attempt(&app, "BOGUS", "10.1.0.1").await;
    }
    assert_eq!(attempt(&app, "BOGUS", "10.1.0.1").await, 429);

    // Another client, same code: unaffected.
    assert_eq!(attempt(&app, "BOGUS", "10.1.0.2").await, 401);
    // Same client, another code: unaffected.
    assert_eq!(attempt(&app, "OTHER", "10.1.0.1").await, 401);
}

#[tokio::test]
async fn successful_redemption_clears_the_counter() {
    let app = TestApp::spawn().await;
    app.seed_invitation("REVIVE", Role::Worker, 0, -60).await;

    // Four failures against the expired code.
    for _ in 0..4 {
        assert_eq!(attempt(&app, "REVIVE", "10.2.0.1").await, 401);
    }

    // An admin extends the code; the fifth attempt succeeds and clears
    // the caller's counter.
    let dao = sitedesk_services::dao::InvitationDao::new(&app.db);
    let future = bson::DateTime::from_millis(bson::DateTime::now().timestamp_millis() + 3_600_000);
    dao.base
        .update_one(
            bson::doc! { "code": "REVIVE" },
            bson::doc! { "$set": { "expires_at": future } },
        )
        .await
        .unwrap();
    assert_eq!(attempt(&app, "REVIVE", "10.2.0.1").await, 200);

    // A cleared counter means five fresh failures fit before the limit.
    dao.base
        .update_one(
            bson::doc! { "code": "REVIVE" },
            bson::doc! { "$set": { "expires_at": bson::DateTime::from_millis(0) } },
        )
        .await
        .unwrap();
    for _ in 0..5 {
        assert_eq!(attempt(&app, "REVIVE", "10.2.0.1").await, 401);
    }
    assert_eq!(attempt(&app, "REVIVE", "10.2.0.1").await, 429);
}

#[tokio::test]
async fn counter_resets_once_the_window_elapses() {
    let app = TestApp::spawn_with_settings(|s| {
        s.rate_limit.window_secs = 1;
    })
    .await;

    for _ in 0..5 {
        attempt(&app, "BOGUS", "10.3.0.1").await;
    }
    assert_eq!(attempt(&app, "BOGUS", "10.3.0.1").await, 429);

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    // Attempt 6 is now effectively attempt 1: evaluated normally.
    assert_eq!(attempt(&app, "BOGUS", "10.3.0.1").await, 401);
}
