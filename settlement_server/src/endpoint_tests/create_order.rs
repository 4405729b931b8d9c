use actix_web::{
    http::{header::AUTHORIZATION, StatusCode},
    test::TestRequest,
    web,
    web::ServiceConfig,
};
use razorpay_tools::{RazorpayApiError, RazorpayOrder};
use serde_json::json;
use settlement_engine::{
    db_types::{Amount, InvoiceId, InvoiceStatus},
    traits::InvoiceManagement,
    PaymentProof,
    SqliteDatabase,
};

use super::{
    helpers::{
        bearer,
        call,
        identity_provider,
        seeded_db,
        settlement_api,
        sign,
        CUSTOMER,
        TEST_KEY_ID,
        TEST_KEY_SECRET,
    },
    mocks::MockGateway,
};
use crate::{auth::JwtIdentityProvider, data_objects::CreateOrderResponse, routes::CreateOrderRoute};

const PATH: &str = "/create-razorpay-order";

fn configure(db: SqliteDatabase, gateway: MockGateway) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(CreateOrderRoute::<SqliteDatabase, JwtIdentityProvider, MockGateway>::new())
            .app_data(web::Data::new(settlement_api(&db)))
            .app_data(web::Data::new(identity_provider()))
            .app_data(web::Data::new(gateway));
    }
}

fn order_request(user: &str, invoice_id: &str) -> TestRequest {
    TestRequest::post()
        .uri(PATH)
        .insert_header((AUTHORIZATION, bearer(user)))
        .set_json(json!({ "invoice_id": invoice_id }))
}

fn gateway_order(id: &str, amount: i64, receipt: &str) -> RazorpayOrder {
    serde_json::from_value(json!({
        "id": id,
        "entity": "order",
        "amount": amount,
        "amount_paid": 0,
        "amount_due": amount,
        "currency": "INR",
        "receipt": receipt,
        "status": "created",
        "attempts": 0,
        "notes": {},
        "created_at": 1717200000
    }))
    .unwrap()
}

#[actix_web::test]
async fn customer_opens_payment_for_pending_invoice() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway
        .expect_create_order()
        .withf(|order| {
            order.amount == Amount::from(99_999) && order.receipt == "INV-003" && order.notes.is_some()
        })
        .times(1)
        .returning(|order| Ok(gateway_order("order_new_003", order.amount.value(), &order.receipt)));
    gateway.expect_key_id().return_const(TEST_KEY_ID.to_string());

    let (status, _, body) = call(order_request(CUSTOMER, "INV-003"), configure(db.clone(), gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let response: CreateOrderResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.order_id, "order_new_003");
    assert_eq!(response.amount, Amount::from(99_999));
    assert_eq!(response.currency, "INR");
    assert_eq!(response.key_id, TEST_KEY_ID);

    let invoice = db.fetch_invoice(&InvoiceId::from("INV-003")).await.unwrap().unwrap();
    assert_eq!(invoice.razorpay_order_id.as_deref(), Some("order_new_003"));
}

#[actix_web::test]
async fn reopened_checkout_reuses_the_first_order() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut first = MockGateway::new();
    first
        .expect_create_order()
        .times(1)
        .returning(|order| Ok(gateway_order("order_first", order.amount.value(), &order.receipt)));
    first.expect_key_id().return_const(TEST_KEY_ID.to_string());
    let (status, _, body) = call(order_request(CUSTOMER, "INV-003"), configure(db.clone(), first)).await;
    assert_eq!(status, StatusCode::OK);
    let opened: CreateOrderResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(opened.order_id, "order_first");

    let mut second = MockGateway::new();
    second.expect_create_order().times(0);
    second.expect_key_id().return_const(TEST_KEY_ID.to_string());
    let (status, _, body) = call(order_request(CUSTOMER, "INV-003"), configure(db.clone(), second)).await;
    assert_eq!(status, StatusCode::OK);
    let reopened: CreateOrderResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(reopened.order_id, "order_first");
    assert_eq!(reopened.amount, Amount::from(99_999));

    // The customer pays in the first widget
    let sig = sign("order_first", "pay_first");
    let proof = PaymentProof::new("order_first", "pay_first", &sig, "INV-003");
    let result = settlement_api(&db).verify_and_settle(proof, TEST_KEY_SECRET).await.unwrap();
    assert!(!result.is_already_paid());
    let invoice = db.fetch_invoice(&InvoiceId::from("INV-003")).await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
}

#[actix_web::test]
async fn invoice_with_an_order_does_not_call_the_gateway() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().times(0);
    gateway.expect_key_id().return_const(TEST_KEY_ID.to_string());
    let (status, _, body) = call(order_request("customer_d", "INV-002"), configure(db, gateway)).await;
    assert_eq!(status, StatusCode::OK);
    let response: CreateOrderResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.order_id, "order_def");
    assert_eq!(response.amount, Amount::from(25_000));
    assert_eq!(response.currency, "INR");
}

#[actix_web::test]
async fn only_the_invoiced_customer_can_open_a_payment() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().times(0);
    let (status, _, body) = call(order_request("someone_else", "INV-003"), configure(db.clone(), gateway)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Insufficient Permissions. Only the invoiced customer can pay an invoice"}"#);
    let invoice = db.fetch_invoice(&InvoiceId::from("INV-003")).await.unwrap().unwrap();
    assert!(invoice.razorpay_order_id.is_none());
}

#[actix_web::test]
async fn unknown_invoice() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().times(0);
    let (status, _, body) = call(order_request(CUSTOMER, "INV-404"), configure(db, gateway)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"The data was not found. Invoice INV-404 does not exist"}"#);
}

#[actix_web::test]
async fn paid_invoice_cannot_be_reopened() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    settle_invoice(&db, "INV-001").await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().times(0);
    let (status, _, body) = call(order_request(CUSTOMER, "INV-001"), configure(db, gateway)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invoice cannot be paid. Invoice INV-001 is paid"}"#);
}

#[actix_web::test]
async fn unconfigured_gateway() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().times(1).returning(|_| Err(RazorpayApiError::NotConfigured));
    let (status, _, body) = call(order_request(CUSTOMER, "INV-003"), configure(db.clone(), gateway)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Razorpay credentials not configured"}"#);
    let invoice = db.fetch_invoice(&InvoiceId::from("INV-003")).await.unwrap().unwrap();
    assert!(invoice.razorpay_order_id.is_none());
}

#[actix_web::test]
async fn invoice_id_is_required() {
    let _ = env_logger::try_init().ok();
    let db = seeded_db().await;
    let mut gateway = MockGateway::new();
    gateway.expect_create_order().times(0);
    let req = TestRequest::post().uri(PATH).insert_header((AUTHORIZATION, bearer(CUSTOMER))).set_json(json!({}));
    let (status, _, body) = call(req, configure(db, gateway)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read request body. invoice_id is required"}"#);
}

async fn settle_invoice(db: &SqliteDatabase, invoice_id: &str) {
    let api = settlement_api(db);
    let sig = sign("order_abc", "pay_1");
    let proof = PaymentProof::new("order_abc", "pay_1", &sig, invoice_id);
    api.verify_and_settle(proof, TEST_KEY_SECRET).await.unwrap();
}
