//! Tool schema the model fills in

use serde_json::json;

use crate::ai::ToolDefinition;
use crate::categories::CategoryCatalog;

/// Name of the extraction tool
pub const TOOL_NAME: &str = "categorize_expenses";

fn category_description(catalog: &CategoryCatalog, fallback_categories: &[String]) -> String {
    if catalog.is_empty() {
        format!(
            "Expense category. Common categories include: {}. Use these as a guide or create appropriate categories.",
            fallback_categories.join(", ")
        )
    } else {
        format!(
            "Expense category. MUST use one of these existing categories if applicable: {}. Only create a new category if none of these fit.",
            catalog.joined()
        )
    }
}

/// The `categorize_expenses` tool definition
pub fn expense_tool(catalog: &CategoryCatalog, fallback_categories: &[String]) -> ToolDefinition {
    let parameters = json!({
        "type": "object",
        "properties": {
            "transactions": {
                "type": "array",
                "description": "Array of all expense transactions found in the input",
                "items": {
                    "type": "object",
                    "properties": {
                        "transaction_date": {
                            "type": "string",
                            "description": "Transaction date in YYYY-MM-DD format. Use today's date if not specified in the input."
                        },
                        "amount": {
                            "type": "number",
                            "description": "Exact monetary amount of the expense. Include all fees, taxes, and charges."
                        },
                        "currency": {
                            "type": "string",
                            "description": "Three-letter ISO currency code (USD, INR, EUR, GBP, etc.). IMPORTANT: Detect currency from context (symbols like $, ₹, €, £, or explicit mentions). Only use default currency if currency is completely unspecified."
                        },
                        "category": {
                            "type": "string",
                            "description": category_description(catalog, fallback_categories)
                        },
                        "description": {
                            "type": "string",
                            "description": "Clear, concise description of what was purchased or the expense purpose. Include merchant name if available."
                        }
                    },
                    "required": ["transaction_date", "amount", "currency", "category", "description"]
                }
            }
        },
        "required": ["transactions"]
    });

    ToolDefinition {
        name: TOOL_NAME.to_string(),
        description:
            "Extract and categorize expense transactions from the input. Return all valid expenses found."
                .to_string(),
        parameters,
    }
}
