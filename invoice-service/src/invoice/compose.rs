//! Invoice page layout.
//!
//! Pure: the same order, fields and issuer always produce an equal tree.

use super::fields::InvoiceFields;
use super::issuer::IssuerProfile;
use crate::document::{Align, Color, Justify, Length, Node, Style, TextAlign};
use crate::models::Order;
use thiserror::Error;

const TITLE: &str = "TAX INVOICE";
const TITLE_COLOR: Color = Color::rgb(0, 128, 0);
const LABEL_WIDTH: Length = Length::Percent(40.0);
const VALUE_WIDTH: Length = Length::Percent(60.0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompositionError {
    #[error("order {order_id} is missing required field `{field}`")]
    MissingField {
        order_id: String,
        field: &'static str,
    },
}

/// Build the single-page invoice for `order`.
///
/// Fails if a field the layout prints is absent. The buyer phone line is
/// always blank: orders carry no buyer distinct from the consignee.
pub fn compose(
    order: &Order,
    fields: &InvoiceFields,
    issuer: &IssuerProfile,
) -> Result<Node, CompositionError> {
    let missing = |field| CompositionError::MissingField {
        order_id: order.id.clone(),
        field,
    };
    let phone = order
        .shipping_address
        .as_ref()
        .ok_or_else(|| missing("shippingAddress"))?
        .phone
        .as_deref()
        .ok_or_else(|| missing("shippingAddress.phone"))?;

    Ok(Node::page(
        Style::new().padding(40.0).font_size(10.0),
        vec![
            header(issuer),
            info_block(phone, fields, issuer),
            total(order.amount),
        ],
    ))
}

/// Two decimals, and never a negative zero.
pub fn format_amount(amount: f64) -> String {
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{:.2}", amount)
}

fn header(issuer: &IssuerProfile) -> Node {
    let mut company = vec![Node::text(
        Style::new().bold().font_size(12.0),
        format!("{},", issuer.legal_name),
    )];
    company.extend(
        issuer
            .address_lines
            .iter()
            .map(|line| Node::text(Style::new().font_size(10.0), *line)),
    );

    Node::row(
        Style::new()
            .justify(Justify::SpaceBetween)
            .align_items(Align::Center)
            .margin_bottom(20.0),
        vec![
            Node::image(
                Style::new().width(Length::Points(120.0)).height(40.0),
                issuer.logo_url,
            ),
            Node::text(
                Style::new().bold().font_size(20.0).color(TITLE_COLOR),
                TITLE,
            ),
            Node::column(Style::new().align_items(Align::End), company),
        ],
    )
}

fn info_block(phone: &str, fields: &InvoiceFields, issuer: &IssuerProfile) -> Node {
    let consignee = Node::column(
        Style::new().width(Length::Percent(50.0)),
        vec![
            Node::text(Style::new().bold().margin_bottom(5.0), "CONSIGNEE:"),
            Node::text(Style::new().margin_bottom(5.0), format!("Mobile: {}", phone)),
            Node::text(
                Style::new().bold().margin_top(10.0).margin_bottom(5.0),
                "BUYER (If other than the Consignee):",
            ),
            Node::text(Style::new().margin_bottom(5.0), "Mobile:"),
        ],
    );

    // Orders have no separate creation date here; the order date is the issue date.
    let references = Node::column(
        Style::new().width(Length::Percent(50.0)),
        vec![
            info_row("GSTIN", issuer.gstin),
            info_row("CIN", issuer.cin),
            info_row("PAN", issuer.pan),
            Node::text(
                Style::new().bold().margin_top(10.0).margin_bottom(5.0),
                format!("PAYMENT MODE: {}", issuer.payment_mode),
            ),
            Node::text(Style::new().margin_bottom(5.0), "PAYMENT REF NO:"),
            info_row("INVOICE NO", &fields.invoice_number),
            info_row("INVOICE DATE", &fields.issue_date),
            info_row("ORDER NO", &fields.order_number),
            info_row("ORDER DATE", &fields.issue_date),
        ],
    );

    Node::row(
        Style::new()
            .justify(Justify::SpaceBetween)
            .margin_bottom(15.0),
        vec![consignee, references],
    )
}

fn info_row(label: &str, value: &str) -> Node {
    Node::row(
        Style::new()
            .justify(Justify::SpaceBetween)
            .margin_bottom(5.0),
        vec![
            Node::text(Style::new().bold().width(LABEL_WIDTH), label),
            Node::text(Style::new().width(VALUE_WIDTH), format!(": {}", value)),
        ],
    )
}

fn total(amount: f64) -> Node {
    Node::column(
        Style::new()
            .margin_top(30.0)
            .font_size(14.0)
            .bold()
            .text_align(TextAlign::Right),
        vec![Node::text(
            Style::new(),
            format!("Total Price: INR {}", format_amount(amount)),
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::derive;
    use crate::models::ShippingAddress;
    use chrono::NaiveDate;

    fn order() -> Order {
        Order {
            id: "64fabc1234567890abcdef12".to_string(),
            user_id: Some("u1".to_string()),
            product_id: Some("p1".to_string()),
            variant: None,
            quantity: Some(1.0),
            amount: 499.0,
            shipping_address: Some(ShippingAddress {
                phone: Some("9999999999".to_string()),
                ..Default::default()
            }),
        }
    }

    fn fields() -> InvoiceFields {
        derive(
            "64fabc1234567890abcdef12",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
    }

    fn lines(node: &Node) -> Vec<String> {
        node.plain_text().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_compose_is_deterministic() {
        let issuer = IssuerProfile::vevvion();
        let first = compose(&order(), &fields(), &issuer).unwrap();
        let second = compose(&order(), &fields(), &issuer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_contains_derived_and_order_values() {
        let tree = compose(&order(), &fields(), &IssuerProfile::vevvion()).unwrap();
        let lines = lines(&tree);

        for expected in [
            "TAX INVOICE",
            "Mobile: 9999999999",
            ": INV-CDEF12",
            ": ORD-ABCDEF12",
            ": 05/03/2024",
            ": 29AAICV6290Q1Z8",
            "PAYMENT MODE: Razorpay",
            "Total Price: INR 499.00",
        ] {
            assert!(lines.iter().any(|l| l == expected), "missing line {:?}", expected);
        }
    }

    #[test]
    fn test_order_date_equals_issue_date() {
        let tree = compose(&order(), &fields(), &IssuerProfile::vevvion()).unwrap();
        let lines = lines(&tree);

        let date_rows = lines.iter().filter(|l| *l == ": 05/03/2024").count();
        assert_eq!(date_rows, 2);
    }

    #[test]
    fn test_buyer_phone_is_blank() {
        let tree = compose(&order(), &fields(), &IssuerProfile::vevvion()).unwrap();
        let lines = lines(&tree);

        let buyer = lines
            .iter()
            .position(|l| l == "BUYER (If other than the Consignee):")
            .unwrap();
        assert_eq!(lines[buyer + 1], "Mobile:");
    }

    #[test]
    fn test_header_layout() {
        let tree = compose(&order(), &fields(), &IssuerProfile::vevvion()).unwrap();
        let header = &tree.children()[0];

        assert_eq!(header.style().justify, Justify::SpaceBetween);
        let [logo, title, company] = header.children() else {
            panic!("header should have three regions");
        };
        assert_eq!(
            logo,
            &Node::image(
                Style::new().width(Length::Points(120.0)).height(40.0),
                IssuerProfile::vevvion().logo_url
            )
        );
        assert_eq!(title.style().color, Some(TITLE_COLOR));
        assert_eq!(company.style().align_items, Align::End);
        assert_eq!(company.children().len(), 4);
    }

    #[test]
    fn test_info_rows_split_forty_sixty() {
        let row = info_row("PAN", "AAICV6290Q");
        let [label, value] = row.children() else {
            panic!("info row should have two cells");
        };

        assert_eq!(label.style().width, Some(Length::Percent(40.0)));
        assert_eq!(label.style().font_weight, Some(crate::document::FontWeight::Bold));
        assert_eq!(value.style().width, Some(Length::Percent(60.0)));
        assert_eq!(value, &Node::text(Style::new().width(VALUE_WIDTH), ": AAICV6290Q"));
    }

    #[test]
    fn test_missing_shipping_address_fails() {
        let mut order = order();
        order.shipping_address = None;

        let err = compose(&order, &fields(), &IssuerProfile::vevvion()).unwrap_err();

        assert_eq!(
            err,
            CompositionError::MissingField {
                order_id: "64fabc1234567890abcdef12".to_string(),
                field: "shippingAddress",
            }
        );
    }

    #[test]
    fn test_missing_phone_fails() {
        let mut order = order();
        order.shipping_address = Some(ShippingAddress::default());

        let err = compose(&order, &fields(), &IssuerProfile::vevvion()).unwrap_err();

        assert!(matches!(
            err,
            CompositionError::MissingField {
                field: "shippingAddress.phone",
                ..
            }
        ));
    }

    #[test]
    fn test_amount_always_has_two_decimals() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(1234.5), "1234.50");
        assert_eq!(format_amount(499.0), "499.00");
        assert_eq!(format_amount(-12.3), "-12.30");
        assert_eq!(format_amount(0.999), "1.00");
    }

    #[test]
    fn test_issuer_changes_do_not_touch_layout() {
        let issuer = IssuerProfile {
            legal_name: "ACME TRADING LLP",
            gstin: "GSTIN-TEST",
            ..IssuerProfile::vevvion()
        };

        let tree = compose(&order(), &fields(), &issuer).unwrap();
        let lines = lines(&tree);

        assert!(lines.contains(&"ACME TRADING LLP,".to_string()));
        assert!(lines.contains(&": GSTIN-TEST".to_string()));
    }
}
