//! Response parsing and schema validation
//!
//! The completion text is parsed strictly and then validated field by
//! field against the invoice shape. Required fields (currency,
//! total_amount) must be present with the right primitive type; optional
//! fields may be absent or null; unknown extra fields are ignored so newer
//! models can return more than we read.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::invoice::{InvoiceRecord, LineItem};

use super::error::ExtractError;

/// Longest raw-response excerpt carried in a parse error.
const EXCERPT_LIMIT: usize = 200;

/// Parse a completion into an invoice record.
pub fn parse_invoice(raw: &str) -> Result<InvoiceRecord, ExtractError> {
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|_| ExtractError::MalformedResponse {
            excerpt: excerpt(raw),
        })?;

    let obj = value
        .as_object()
        .ok_or_else(|| schema_error("(root object)"))?;

    Ok(InvoiceRecord {
        supplier_name: opt_string(obj, "supplier_name")?,
        supplier_abn_or_vat: opt_string(obj, "supplier_abn_or_vat")?,
        supplier_address: opt_string(obj, "supplier_address")?,
        invoice_number: opt_string(obj, "invoice_number")?,
        issue_date: opt_string(obj, "issue_date")?,
        due_date: opt_string(obj, "due_date")?,
        currency: req_string(obj, "currency")?,
        subtotal: opt_decimal(obj, "subtotal")?,
        tax_amount: opt_decimal(obj, "tax_amount")?,
        tax_rate: opt_decimal(obj, "tax_rate")?,
        total_amount: req_decimal(obj, "total_amount")?,
        line_items: line_items(obj)?,
        notes: opt_string(obj, "notes")?,
    })
}

fn schema_error(field: impl Into<String>) -> ExtractError {
    ExtractError::SchemaValidation {
        field: field.into(),
    }
}

fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= EXCERPT_LIMIT {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(EXCERPT_LIMIT).collect();
    format!("{}...", head)
}

fn opt_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(schema_error(field)),
    }
}

fn req_string(obj: &Map<String, Value>, field: &str) -> Result<String, ExtractError> {
    opt_string(obj, field)?.ok_or_else(|| schema_error(field))
}

fn opt_decimal(obj: &Map<String, Value>, field: &str) -> Result<Option<Decimal>, ExtractError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => decimal_from_number(n)
            .map(Some)
            .ok_or_else(|| schema_error(field)),
        Some(_) => Err(schema_error(field)),
    }
}

fn req_decimal(obj: &Map<String, Value>, field: &str) -> Result<Decimal, ExtractError> {
    opt_decimal(obj, field)?.ok_or_else(|| schema_error(field))
}

/// Convert through the number's literal form so values keep their decimal
/// semantics instead of going through binary floating point.
fn decimal_from_number(n: &serde_json::Number) -> Option<Decimal> {
    let literal = n.to_string();
    Decimal::from_str(&literal)
        .ok()
        .or_else(|| Decimal::from_scientific(&literal).ok())
}

fn line_items(obj: &Map<String, Value>) -> Result<Vec<LineItem>, ExtractError> {
    let items = match obj.get("line_items") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(schema_error("line_items")),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item = item
                .as_object()
                .ok_or_else(|| schema_error(format!("line_items[{}]", i)))?;
            let path = |name: &str| format!("line_items[{}].{}", i, name);

            Ok(LineItem {
                description: opt_string(item, "description")
                    .map_err(|_| schema_error(path("description")))?,
                quantity: opt_decimal(item, "quantity")
                    .map_err(|_| schema_error(path("quantity")))?,
                unit_price: opt_decimal(item, "unit_price")
                    .map_err(|_| schema_error(path("unit_price")))?,
                line_total: opt_decimal(item, "line_total")
                    .map_err(|_| schema_error(path("line_total")))?,
            })
        })
        .collect()
}
