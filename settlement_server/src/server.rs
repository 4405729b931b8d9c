use std::{future::Future, pin::Pin, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use razorpay_tools::RazorpayApi;
use settlement_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    InvoiceSettlementApi,
    SqliteDatabase,
};

use crate::{
    auth::JwtIdentityProvider,
    config::ServerConfig,
    errors::ServerError,
    middleware::CorsMiddlewareFactory,
    routes::{health, CreateOrderRoute, MyNotificationsRoute, VerifyPaymentRoute},
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Connected to database at {}", config.database_url);
    let hooks = create_event_hooks();
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::InitializeError(e.to_string()))
}

/// Hooks that run on every settled invoice.
pub fn create_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_invoice_paid(|ev| {
        Box::pin(async move {
            info!(
                "📬️ Invoice {} ({}) paid at {:?}. Mechanic {} is owed {} {}.",
                ev.invoice.id,
                ev.invoice.invoice_number,
                ev.paid_at(),
                ev.invoice.mechanic_id,
                ev.invoice.total_amount,
                ev.invoice.currency
            );
        }) as Pin<Box<dyn Future<Output = ()> + Send>>
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    if !config.razorpay.is_configured() {
        warn!("🪛️ RAZORPAY_KEY_SECRET is not set. Payment verification requests will fail until it is configured.");
    }
    let gateway = RazorpayApi::new(config.razorpay.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = web::Data::new(gateway);
    let identity = web::Data::new(JwtIdentityProvider::new(&config.auth));
    let razorpay_config = web::Data::new(config.razorpay.clone());
    let strict_order_binding = config.strict_order_binding;
    let allowed_origin = config.cors_allowed_origin.clone();
    let srv = HttpServer::new(move || {
        let settlement_api = InvoiceSettlementApi::new(db.clone(), producers.clone())
            .with_strict_order_binding(strict_order_binding);
        App::new()
            .wrap(CorsMiddlewareFactory::new(&allowed_origin))
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("rsp::access_log"))
            .app_data(web::Data::new(settlement_api))
            .app_data(razorpay_config.clone())
            .app_data(identity.clone())
            .app_data(gateway.clone())
            .service(health)
            .service(VerifyPaymentRoute::<SqliteDatabase, JwtIdentityProvider>::new())
            .service(CreateOrderRoute::<SqliteDatabase, JwtIdentityProvider, RazorpayApi>::new())
            .service(MyNotificationsRoute::<SqliteDatabase, JwtIdentityProvider>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
