//! Invoice data model
//!
//! The structured record returned by the extraction pipeline. Every field
//! the model cannot find is null rather than guessed, and all monetary
//! values use `Decimal` so amounts survive display without float drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete extracted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Name of the company/vendor issuing the invoice.
    #[serde(default)]
    pub supplier_name: Option<String>,

    /// Tax identification number (ABN, VAT, EIN, etc.).
    #[serde(default)]
    pub supplier_abn_or_vat: Option<String>,

    /// Full address of the supplier.
    #[serde(default)]
    pub supplier_address: Option<String>,

    /// Unique invoice identifier.
    #[serde(default)]
    pub invoice_number: Option<String>,

    /// Date the invoice was issued (ISO-8601 when the model can tell).
    #[serde(default)]
    pub issue_date: Option<String>,

    /// Payment due date.
    #[serde(default)]
    pub due_date: Option<String>,

    /// Currency code (USD, EUR, AUD, ...). Required.
    pub currency: String,

    /// Total before tax.
    #[serde(default)]
    pub subtotal: Option<Decimal>,

    /// Total tax amount.
    #[serde(default)]
    pub tax_amount: Option<Decimal>,

    /// Tax percentage rate.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,

    /// Final amount due. Required.
    pub total_amount: Decimal,

    /// Line items in invoice order.
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Additional terms, conditions, or notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name/description.
    #[serde(default)]
    pub description: Option<String>,

    /// Number of units.
    #[serde(default)]
    pub quantity: Option<Decimal>,

    /// Price per unit.
    #[serde(default)]
    pub unit_price: Option<Decimal>,

    /// Total for this line.
    #[serde(default)]
    pub line_total: Option<Decimal>,
}
