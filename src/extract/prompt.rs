//! Prompt construction
//!
//! Both prompts are pure functions of the recognized text, so identical
//! input always produces identical requests.

/// System prompt: how to read OCR text and what to compute.
pub const SYSTEM_PROMPT: &str = "\
You are an expert invoice analysis AI. Your task is to extract structured \
information from invoice text that has been obtained via OCR.

CRITICAL REQUIREMENTS:
1. You MUST perform ALL calculations yourself (subtotals, tax amounts, totals, line item totals)
2. Verify that all numbers are mathematically correct and consistent
3. If a field is not present in the invoice, use null (do not guess or hallucinate data)
4. Return ONLY valid JSON with no additional text or explanation
5. Support various currencies and tax formats (GST, VAT, Sales Tax, etc.)

FIELD DESCRIPTIONS:
- supplier_name: The name of the company/vendor issuing the invoice
- supplier_abn_or_vat: Tax identification number (ABN, VAT, EIN, etc.)
- supplier_address: Full address of the supplier
- invoice_number: Unique invoice identifier
- issue_date: Date when invoice was issued (format: YYYY-MM-DD if possible)
- due_date: Payment due date (format: YYYY-MM-DD if possible)
- currency: Currency code (USD, EUR, AUD, GBP, etc.)
- subtotal: Total before tax (YOU must calculate this)
- tax_amount: Total tax amount (YOU must calculate this)
- tax_rate: Tax percentage rate
- total_amount: Final amount due (YOU must calculate: subtotal + tax_amount)
- line_items: Array of items with description, quantity, unit_price and \
line_total (YOU must calculate: quantity x unit_price)
- notes: Any additional terms, conditions, or notes

CALCULATION RULES:
- line_total = quantity x unit_price
- subtotal = sum of all line_totals
- tax_amount = subtotal x (tax_rate / 100)
- total_amount = subtotal + tax_amount

Ensure all calculations are accurate and the numbers reconcile correctly.";

/// Build the user prompt embedding the recognized text and the exact
/// output schema the response must conform to.
pub fn user_prompt(ocr_text: &str) -> String {
    format!(
        "Extract all invoice information from the following OCR text and \
return it as a JSON object.

OCR TEXT:
{ocr_text}

Return ONLY the JSON object with this exact structure (use null for missing fields):
{{
  \"supplier_name\": \"string or null\",
  \"supplier_abn_or_vat\": \"string or null\",
  \"supplier_address\": \"string or null\",
  \"invoice_number\": \"string or null\",
  \"issue_date\": \"string or null\",
  \"due_date\": \"string or null\",
  \"currency\": \"string\",
  \"subtotal\": \"number or null\",
  \"tax_amount\": \"number or null\",
  \"tax_rate\": \"number or null\",
  \"total_amount\": \"number\",
  \"line_items\": [
    {{
      \"description\": \"string or null\",
      \"quantity\": \"number or null\",
      \"unit_price\": \"number or null\",
      \"line_total\": \"number or null\"
    }}
  ],
  \"notes\": \"string or null\"
}}

Remember: Perform ALL calculations yourself and ensure mathematical consistency."
    )
}
