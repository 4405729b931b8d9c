use crate::{NewRazorpayOrder, RazorpayApiError, RazorpayOrder};

/// The subset of gateway behaviour the settlement server needs. [`crate::RazorpayApi`] is the production
/// implementation.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    /// The public key id that the checkout widget must be initialised with.
    fn key_id(&self) -> String;

    /// Creates a new gateway order.
    async fn create_order(&self, order: NewRazorpayOrder) -> Result<RazorpayOrder, RazorpayApiError>;
}
