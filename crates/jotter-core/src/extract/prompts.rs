//! System and user prompts for expense extraction

use chrono::NaiveDate;

use crate::categories::CategoryCatalog;

/// Currency assumed when the caller supplies none
pub const FALLBACK_CURRENCY: &str = "INR";

/// The two messages sent with every extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

/// `default_currency` trimmed and upper-cased, or [`FALLBACK_CURRENCY`] when blank
pub fn effective_currency(default_currency: &str) -> String {
    match default_currency.trim() {
        "" => FALLBACK_CURRENCY.to_string(),
        currency => currency.to_uppercase(),
    }
}

/// Build the prompts for one raw input line
///
/// Deterministic for identical arguments. The fallback vocabulary only appears
/// when `catalog` is empty.
pub fn build_prompts(
    raw_line: &str,
    default_currency: &str,
    catalog: &CategoryCatalog,
    fallback_categories: &[String],
    today: NaiveDate,
) -> Prompts {
    let currency = effective_currency(default_currency);
    Prompts {
        system: system_prompt(&currency, catalog, fallback_categories, today),
        user: user_prompt(raw_line),
    }
}

pub fn user_prompt(raw_line: &str) -> String {
    format!("Please extract all expenses from this text: {}", raw_line)
}

fn category_guidance(catalog: &CategoryCatalog, fallback_categories: &[String]) -> String {
    if catalog.is_empty() {
        return format!(
            r#"
## Category Selection:
Use common expense categories like: {}
- Use lowercase, descriptive category names
- Be consistent with similar expenses
- Prefer general categories over very specific ones"#,
            fallback_categories.join(", ")
        );
    }

    format!(
        r#"
## Category Selection (CRITICAL):
You have access to the user's existing categories: {}

**Rules for categories:**
1. ALWAYS try to match one of the existing categories first
2. Use exact category names (case-sensitive matching preferred)
3. Only create a NEW category if none of the existing categories are relevant
4. When creating new categories, use lowercase, single-word names when possible
5. Be consistent - if user has "food", use "food" not "dining" or "restaurant"

Examples:
- If user has "groceries" and input is "bought vegetables", use "groceries"
- If user has "transport" and input is "uber ride", use "transport"
- If user has "food" and input is "lunch at restaurant", use "food""#,
        catalog.joined()
    )
}

fn system_prompt(
    currency: &str,
    catalog: &CategoryCatalog,
    fallback_categories: &[String],
    today: NaiveDate,
) -> String {
    let today = today.format("%Y-%m-%d");
    let guidance = category_guidance(catalog, fallback_categories);

    format!(
        r#"You are an expert expense parser. Your task is to extract and categorize expense information from text input.

## Core Instructions:
1. Extract ALL expense transactions mentioned in the input
2. For each expense, identify: date, amount, currency, category, and description
3. Use today's date ({today}) if no specific date is mentioned
4. Your default currency is {currency}, but DETECT actual currency from input
5. Be precise with amounts - include taxes, tips, and all fees
6. Return an error if no valid expense information is found
{guidance}

## Currency Detection (IMPORTANT):
- ALWAYS detect currency from context first before using default
- Look for currency symbols: $ (USD), ₹ (INR), € (EUR), £ (GBP), ¥ (JPY/CNY)
- Look for explicit currency mentions: "dollars", "rupees", "euros", "pounds"
- Examples:
  * "spent $50" → USD (not {currency}!)
  * "paid €20" → EUR (not {currency}!)
  * "₹500 for groceries" → INR
  * "bought lunch for 15 pounds" → GBP
- Only use default currency ({currency}) if NO currency indicators are present

## Important Rules:
- Only extract actual expenses/purchases, not income or refunds
- Combine related items into single transactions when they form one purchase
- Use descriptive but concise descriptions
- If amounts include multiple items, create separate transactions
- Validate that extracted data makes logical sense
- Be conservative - only extract what's clearly an expense

## Text Input Formats Supported:
- Natural language: "spent $50 on lunch", "bought groceries for ₹500"
- Shorthand: "lunch 20", "uber 15 dollars", "coffee 5€"
- Multi-currency: "paid $100 for hotel and €50 for dinner"
- Dates: "yesterday spent 500", "on Monday bought 1000 worth of groceries"

## Output Format:
Use the provided function to return structured expense data."#
    )
}
