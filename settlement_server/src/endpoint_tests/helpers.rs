use actix_web::{
    http::{header::HeaderMap, StatusCode},
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use chrono::{Duration, Utc};
use log::debug;
use razorpay_tools::{signature::expected_signature, RazorpayConfig};
use settlement_engine::{
    db_types::{Amount, NewInvoice},
    events::EventProducers,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    traits::InvoiceManagement,
    InvoiceSettlementApi,
    SqliteDatabase,
};

use crate::{
    auth::{AuthenticatedUser, JwtIdentityProvider},
    config::AuthConfig,
    middleware::CorsMiddlewareFactory,
};

// Test-only secrets. DO NOT re-use these anywhere.
pub const TEST_JWT_SECRET: &str = "endpoint-tests-jwt-secret";
pub const TEST_KEY_ID: &str = "rzp_test_endpoint";
pub const TEST_KEY_SECRET: &str = "endpoint-tests-razorpay-secret";

pub const MECHANIC: &str = "mechanic_m";
pub const CUSTOMER: &str = "customer_c";

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(TEST_JWT_SECRET)
}

pub fn razorpay_config() -> RazorpayConfig {
    RazorpayConfig::new(TEST_KEY_ID, TEST_KEY_SECRET)
}

pub fn identity_provider() -> JwtIdentityProvider {
    JwtIdentityProvider::new(&auth_config())
}

pub fn bearer(user_id: &str) -> String {
    let token = identity_provider()
        .issue_token(&AuthenticatedUser::new(user_id), Utc::now() + Duration::hours(1))
        .expect("Failed to sign token");
    format!("Bearer {token}")
}

pub fn sign(order_id: &str, payment_id: &str) -> String {
    expected_signature(TEST_KEY_SECRET, order_id, payment_id)
}

/// A fresh database holding
/// * `INV-001`: 1500.00, pending, gateway order `order_abc`, owed by [`CUSTOMER`] to [`MECHANIC`].
/// * `INV-002`: 250.00, pending, gateway order `order_def`, owed by `customer_d` to [`MECHANIC`].
/// * `INV-003`: 999.99, pending, no gateway order yet, owed by [`CUSTOMER`] to `mechanic_n`.
pub async fn seeded_db() -> SqliteDatabase {
    let db = prepare_test_env(&random_db_path()).await;
    let invoices = [
        NewInvoice::new("INV-001", "INV-001", Amount::from_major_units(1500).unwrap(), MECHANIC, CUSTOMER)
            .with_service_request("req-001")
            .with_razorpay_order("order_abc"),
        NewInvoice::new("INV-002", "INV-002", Amount::from_major_units(250).unwrap(), MECHANIC, "customer_d")
            .with_service_request("req-002")
            .with_razorpay_order("order_def"),
        NewInvoice::new("INV-003", "INV-003", Amount::from_minor_units(99_999), "mechanic_n", CUSTOMER),
    ];
    for invoice in invoices {
        db.insert_invoice(invoice).await.expect("Failed to seed invoice");
    }
    db
}

pub fn settlement_api(db: &SqliteDatabase) -> InvoiceSettlementApi<SqliteDatabase> {
    InvoiceSettlementApi::new(db.clone(), EventProducers::default())
}

/// Sends a request through an app wrapped in the CORS middleware, and returns the status, headers and body.
pub async fn call<F>(req: TestRequest, configure: F) -> (StatusCode, HeaderMap, String)
where F: FnOnce(&mut ServiceConfig) {
    let app = test::init_service(App::new().wrap(CorsMiddlewareFactory::new("*")).configure(configure)).await;
    let res = test::call_service(&app, req.to_request()).await;
    let status = res.status();
    let headers = res.headers().clone();
    let body = test::read_body(res).await;
    let body = String::from_utf8_lossy(&body).into_owned();
    debug!("Response: {status} {body}");
    (status, headers, body)
}
