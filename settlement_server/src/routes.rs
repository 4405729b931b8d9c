//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database operations,
//! gateway calls) must be awaited, never blocked on.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use bytes::Bytes;
use log::*;
use razorpay_tools::{NewRazorpayOrder, PaymentGateway, RazorpayConfig};
use serde::de::DeserializeOwned;
use serde_json::json;
use settlement_engine::{
    db_types::InvoiceId,
    traits::SettlementDatabase,
    InvoiceSettlementApi,
    PaymentProof,
    SettlementResult,
};

use crate::{
    auth::{bearer_token, AuthenticatedUser, IdentityProvider},
    data_objects::{CreateOrderRequest, CreateOrderResponse, VerificationResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Resolves the caller from the `Authorization` header.
async fn authenticate<I: IdentityProvider>(req: &HttpRequest, identity: &I) -> Result<AuthenticatedUser, ServerError> {
    let token = bearer_token(req).map_err(|e| {
        debug!("💻️ Rejecting request to {}. {e}", req.path());
        e
    })?;
    let user = identity.resolve_user(token).await.map_err(|e| {
        debug!("💻️ Rejecting request to {}. Access token did not resolve to a user.", req.path());
        e
    })?;
    Ok(user)
}

/// An empty body is treated as `{}`, so that missing fields fall back to their defaults.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//---------------------------------------------   Verify payment  ---------------------------------------------------
route!(verify_payment => Post "/verify-razorpay-payment" impl SettlementDatabase, IdentityProvider);
/// Route handler for payment verification.
///
/// The checkout widget hands the browser `razorpay_order_id`, `razorpay_payment_id` and `razorpay_signature` after a
/// successful charge. The browser posts them here, together with the `invoice_id`, using the customer's access token.
///
/// The steps run in a fixed order and the first failure ends the request:
/// 1. The gateway secret must be configured.
/// 2. The bearer token must resolve to a user.
/// 3. The signature over `order_id|payment_id` must match.
/// 4. The invoice is marked as paid, if it is still pending. The mechanic and the customer are notified.
///
/// Replaying a proof for an invoice that is already paid succeeds with `"already_paid": true` and notifies nobody.
pub async fn verify_payment<B, I>(
    req: HttpRequest,
    body: Bytes,
    config: web::Data<RazorpayConfig>,
    identity: web::Data<I>,
    api: web::Data<InvoiceSettlementApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    I: IdentityProvider,
{
    trace!("💻️ Received payment verification request");
    if !config.is_configured() {
        error!("💻️ Payment verification was requested, but RAZORPAY_KEY_SECRET is not configured");
        return Err(ServerError::GatewayNotConfigured);
    }
    let user = authenticate(&req, identity.get_ref()).await?;
    let proof = parse_body::<PaymentProof>(&body).map_err(|e| {
        warn!("💻️ Could not parse payment verification request from {}. {e}", user.id);
        ServerError::Unknown
    })?;
    debug!(
        "💻️ User {} is verifying payment {} for invoice {}",
        user.id, proof.razorpay_payment_id, proof.invoice_id
    );
    let payment = proof.verify(config.key_secret.reveal())?;
    let result = api.settle_invoice(payment).await?;
    match &result {
        SettlementResult::Settled { invoice, notifications_sent: true } => {
            info!("💻️ Invoice {} is paid", invoice.id);
        },
        SettlementResult::Settled { invoice, notifications_sent: false } => {
            warn!("💻️ Invoice {} is paid, but the parties were not notified", invoice.id);
        },
        SettlementResult::AlreadyPaid { invoice } => {
            info!("💻️ Invoice {} was already paid", invoice.id);
        },
    }
    Ok(HttpResponse::Ok().json(VerificationResponse::from(&result)))
}

//---------------------------------------------   Create order  ----------------------------------------------------
route!(create_order => Post "/create-razorpay-order" impl SettlementDatabase, IdentityProvider, PaymentGateway);
/// Route handler for gateway order creation.
///
/// Only the invoice's customer may open a payment for it, and only while it is pending. The gateway order id is
/// stored on the invoice, which is what binds a later payment signature to this invoice. An invoice keeps its first
/// order: reopening checkout hands out the same order again, so a payment made in an earlier widget still settles.
pub async fn create_order<B, I, G>(
    req: HttpRequest,
    body: Bytes,
    identity: web::Data<I>,
    gateway: web::Data<G>,
    api: web::Data<InvoiceSettlementApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    I: IdentityProvider,
    G: PaymentGateway,
{
    trace!("💻️ Received create order request");
    let user = authenticate(&req, identity.get_ref()).await?;
    let CreateOrderRequest { invoice_id } =
        parse_body(&body).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    if invoice_id.is_empty() {
        return Err(ServerError::InvalidRequestBody("invoice_id is required".into()));
    }
    let invoice = api.fetch_invoice(&InvoiceId::from(invoice_id)).await?;
    if invoice.customer_id != user.id {
        warn!("💻️ User {} tried to open a payment for invoice {}, which is not theirs", user.id, invoice.id);
        return Err(ServerError::InsufficientPermissions("Only the invoiced customer can pay an invoice".into()));
    }
    if invoice.status.is_terminal() {
        return Err(ServerError::InvoiceNotPayable(format!("Invoice {} is {}", invoice.id, invoice.status)));
    }
    let order_id = match invoice.razorpay_order_id {
        Some(existing) => {
            debug!("💻️ Invoice {} already has gateway order {existing}. Reusing it.", invoice.id);
            existing
        },
        None => {
            let new_order = NewRazorpayOrder::new(invoice.total_amount, &invoice.currency, &invoice.invoice_number)
                .with_notes(json!({ "invoice_id": invoice.id }));
            let order = gateway.create_order(new_order).await.map_err(|e| {
                warn!("💻️ Could not create gateway order for invoice {}. {e}", invoice.id);
                ServerError::from(e)
            })?;
            let updated = api.attach_order(&invoice.id, &order.id).await?;
            // A concurrent request may have attached its order first. Theirs is the one that counts.
            let stored = updated.razorpay_order_id.unwrap_or_else(|| order.id.clone());
            if stored != order.id {
                info!("💻️ Gateway order {} for invoice {} lost the race to {stored}", order.id, invoice.id);
            } else {
                info!("💻️ Gateway order {} created for invoice {}", order.id, invoice.id);
            }
            stored
        },
    };
    let response = CreateOrderResponse {
        order_id,
        amount: invoice.total_amount,
        currency: invoice.currency,
        key_id: gateway.key_id(),
    };
    Ok(HttpResponse::Ok().json(response))
}

//---------------------------------------------   Notifications  ---------------------------------------------------
route!(my_notifications => Get "/notifications" impl SettlementDatabase, IdentityProvider);
pub async fn my_notifications<B, I>(
    req: HttpRequest,
    identity: web::Data<I>,
    api: web::Data<InvoiceSettlementApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: SettlementDatabase,
    I: IdentityProvider,
{
    trace!("💻️ Received notifications request");
    let user = authenticate(&req, identity.get_ref()).await?;
    let notifications = api.notifications_for_user(&user.id).await?;
    debug!("💻️ Returning {} notifications for {}", notifications.len(), user.id);
    Ok(HttpResponse::Ok().json(notifications))
}
