//! CSV export of the order list

use std::borrow::Cow;

use crate::models::{Order, timestamp};

/// Header row of the export
pub const CSV_HEADER: [&str; 8] = [
    "Order ID",
    "Product",
    "Quantity",
    "Customer Name",
    "Phone",
    "Address",
    "Status",
    "CreatedAt",
];

/// Quote a cell when it holds a comma, a double quote, CR or LF.
/// Embedded quotes are doubled.
pub fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|c| escape_cell(c))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header row then one row per order, joined by `\n`
pub fn orders_to_csv(orders: &[Order]) -> String {
    let mut lines = Vec::with_capacity(orders.len() + 1);
    lines.push(row(&CSV_HEADER));
    for order in orders {
        let quantity = order.quantity.to_string();
        let created = order
            .created_at
            .as_ref()
            .map(timestamp::format)
            .unwrap_or_default();
        lines.push(row(&[
            order.id.as_str(),
            order.product_title.as_str(),
            quantity.as_str(),
            order.name.as_str(),
            order.phone.as_str(),
            order.address.as_str(),
            order.status.as_str(),
            created.as_str(),
        ]));
    }
    lines.join("\n")
}
