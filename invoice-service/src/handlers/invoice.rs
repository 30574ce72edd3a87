use crate::error::InvoiceError;
use crate::invoice::{compose, derive};
use crate::services::metrics::record_invoice_generated;
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;

const ORDER_ID_PARAM: &str = "orderId";

/// First `orderId` in the query string. Later repeats are ignored and an
/// empty first value counts as absent.
pub fn first_order_id(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == ORDER_ID_PARAM)
        .map(|(_, value)| value.as_str())
        .filter(|id| !id.is_empty())
}

/// `GET /api/invoice?orderId=<id>`: render the tax invoice for one order.
///
/// Lookup, composition and rendering run strictly in sequence; nothing is
/// cached between requests.
pub async fn generate_invoice(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, InvoiceError> {
    let order_id = first_order_id(&params).ok_or(InvoiceError::MissingParameter)?;

    let order = state
        .orders
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| InvoiceError::NotFound(order_id.to_string()))?;

    let fields = derive(&order.id, Local::now().date_naive());
    let tree = compose(&order, &fields, &state.issuer)?;
    let pdf = state.renderer.render(&tree).await?;

    tracing::info!(
        order_id = %order.id,
        invoice_number = %fields.invoice_number,
        size = pdf.len(),
        "Invoice generated"
    );
    record_invoice_generated(pdf.len());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=invoice-{}.pdf", order.id),
            ),
            (header::CONTENT_LENGTH, pdf.len().to_string()),
        ],
        pdf,
    )
        .into_response())
}
