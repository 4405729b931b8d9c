use mockall::mock;
use razorpay_tools::{NewRazorpayOrder, PaymentGateway, RazorpayApiError, RazorpayOrder};

use crate::{
    auth::{AuthenticatedUser, IdentityProvider},
    errors::AuthError,
};

mock! {
    pub Identity {}
    impl IdentityProvider for Identity {
        async fn resolve_user(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGateway for Gateway {
        fn key_id(&self) -> String;
        async fn create_order(&self, order: NewRazorpayOrder) -> Result<RazorpayOrder, RazorpayApiError>;
    }
}
