use chrono::NaiveDate;

const INVOICE_PREFIX: &str = "INV-";
const ORDER_PREFIX: &str = "ORD-";
const INVOICE_SUFFIX_LEN: usize = 6;
const ORDER_SUFFIX_LEN: usize = 8;

/// Per-request invoice identifiers. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFields {
    pub invoice_number: String,
    pub order_number: String,
    /// `DD/MM/YYYY`
    pub issue_date: String,
}

/// Derive invoice fields from an order identifier and the issue date.
///
/// Numbers depend on the identifier alone; identifiers shorter than the
/// suffix length are used whole.
pub fn derive(order_id: &str, issued_on: NaiveDate) -> InvoiceFields {
    InvoiceFields {
        invoice_number: format!("{}{}", INVOICE_PREFIX, upper_suffix(order_id, INVOICE_SUFFIX_LEN)),
        order_number: format!("{}{}", ORDER_PREFIX, upper_suffix(order_id, ORDER_SUFFIX_LEN)),
        issue_date: issued_on.format("%d/%m/%Y").to_string(),
    }
}

fn upper_suffix(id: &str, len: usize) -> String {
    let skip = id.chars().count().saturating_sub(len);
    id.chars().skip(skip).collect::<String>().to_uppercase()
}
