use crate::document::RenderError;
use crate::invoice::CompositionError;
use crate::services::metrics::record_invoice_failure;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use thiserror::Error;

pub const MISSING_ORDER_ID: &str = "Missing orderId";
pub const ORDER_NOT_FOUND: &str = "Order not found";
pub const GENERATION_FAILED: &str = "Failed to generate invoice PDF";

/// Failures of the invoice endpoint.
///
/// Client errors carry fixed messages. Server-side causes are logged and
/// collapsed into one generic message.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("orderId query parameter is missing")]
    MissingParameter,

    #[error("order {0} not found")]
    NotFound(String),

    #[error("order lookup failed: {0}")]
    Lookup(#[from] AppError),

    #[error("invoice composition failed: {0}")]
    Composition(#[from] CompositionError),

    #[error("invoice rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl InvoiceError {
    fn reason(&self) -> &'static str {
        match self {
            InvoiceError::MissingParameter => "missing_parameter",
            InvoiceError::NotFound(_) => "not_found",
            InvoiceError::Lookup(_) => "lookup",
            InvoiceError::Composition(_) => "composition",
            InvoiceError::Render(_) => "render",
        }
    }
}

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        record_invoice_failure(self.reason());

        let (status, body) = match &self {
            InvoiceError::MissingParameter => (StatusCode::BAD_REQUEST, MISSING_ORDER_ID),
            InvoiceError::NotFound(_) => (StatusCode::NOT_FOUND, ORDER_NOT_FOUND),
            InvoiceError::Lookup(_) | InvoiceError::Composition(_) | InvoiceError::Render(_) => {
                tracing::error!(error = %self, reason = self.reason(), "PDF generation error");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED)
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}
