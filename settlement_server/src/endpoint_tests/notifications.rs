use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    test::TestRequest,
    web,
};
use settlement_engine::{db_types::Notification, PaymentProof, SqliteDatabase};

use super::helpers::{bearer, call, identity_provider, seeded_db, settlement_api, sign, CUSTOMER, MECHANIC, TEST_KEY_SECRET};
use crate::{auth::JwtIdentityProvider, routes::MyNotificationsRoute};

async fn fetch_notifications(db: &SqliteDatabase, auth: Option<String>) -> (StatusCode, String) {
    let mut req = TestRequest::get().uri("/notifications");
    if let Some(auth) = auth {
        req = req.insert_header((AUTHORIZATION, auth));
    }
    let db = db.clone();
    let (status, _, body) = call(req, move |cfg| {
        cfg.service(MyNotificationsRoute::<SqliteDatabase, JwtIdentityProvider>::new())
            .app_data(web::Data::new(settlement_api(&db)))
            .app_data(web::Data::new(identity_provider()));
    })
    .await;
    (status, body)
}

#[actix_web::test]
async fn users_only_see_their_own_notifications() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let api = settlement_api(&db);
    for (order, payment, invoice) in [("order_abc", "pay_1", "INV-001"), ("order_def", "pay_2", "INV-002")] {
        let proof = PaymentProof::new(order, payment, &sign(order, payment), invoice);
        api.verify_and_settle(proof, TEST_KEY_SECRET).await.unwrap();
    }

    let (status, body) = fetch_notifications(&db, Some(bearer(MECHANIC))).await;
    assert_eq!(status, StatusCode::OK);
    let notifications: Vec<Notification> = serde_json::from_str(&body).unwrap();
    assert_eq!(notifications.len(), 2);
    assert!(notifications.iter().all(|n| n.user_id == MECHANIC && n.title == "Payment Received!"));
    // Newest first
    assert!(notifications[0].message.contains("INV-002"));
    assert!(notifications[1].message.contains("INV-001"));

    let (status, body) = fetch_notifications(&db, Some(bearer(CUSTOMER))).await;
    assert_eq!(status, StatusCode::OK);
    let notifications: Vec<Notification> = serde_json::from_str(&body).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "Your payment of ₹1500.00 for invoice INV-001 was successful.");
}

#[actix_web::test]
async fn notifications_require_authentication() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let (status, body) = fetch_notifications(&db, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Missing authorization header"}"#);
}
