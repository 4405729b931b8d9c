use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use razorpay_tools::RazorpayApiError;
use settlement_engine::SettlementError;
use thiserror::Error;

/// Every request failure is reported as `400 {"error": "<message>"}`. Only failures to bring the server up are
/// reported as server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Razorpay credentials not configured")]
    GatewayNotConfigured,
    #[error(transparent)]
    AuthenticationError(#[from] AuthError),
    #[error("Invalid payment signature")]
    InvalidSignature,
    #[error("Failed to update invoice")]
    InvoiceUpdateFailed,
    #[error("Could not read request body. {0}")]
    InvalidRequestBody(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("Invoice cannot be paid. {0}")]
    InvoiceNotPayable(String),
    #[error("Payment gateway error. {0}")]
    GatewayError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Unknown error")]
    Unknown,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Unauthorized")]
    Unauthorized,
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::InvalidSignature => Self::InvalidSignature,
            SettlementError::InvoiceUpdateFailed { .. } => Self::InvoiceUpdateFailed,
            SettlementError::InvoiceNotFound(id) => Self::NoRecordFound(format!("Invoice {id} does not exist")),
            SettlementError::InvoiceNotPending(id, status) => {
                Self::InvoiceNotPayable(format!("Invoice {id} is {status}"))
            },
            SettlementError::DatabaseError(e) => Self::BackendError(e),
        }
    }
}

impl From<RazorpayApiError> for ServerError {
    fn from(e: RazorpayApiError) -> Self {
        match e {
            RazorpayApiError::NotConfigured => Self::GatewayNotConfigured,
            e => Self::GatewayError(e.to_string()),
        }
    }
}
