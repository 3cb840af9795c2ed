//! Turning a provider reply into an extracted batch or a typed failure

use tracing::debug;

use crate::ai::{Choice, CompletionResponse};
use crate::error::ExtractError;
use crate::models::ExtractedBatch;

use super::schema::TOOL_NAME;

/// The single choice of a reply; any other count is a completion failure
pub fn select_choice(response: CompletionResponse) -> Result<Choice, ExtractError> {
    let count = response.choices.len();
    let mut choices = response.choices.into_iter();
    match (choices.next(), count) {
        (Some(choice), 1) => Ok(choice),
        _ => Err(ExtractError::CompletionFailure(format!(
            "expected exactly one choice, got {}",
            count
        ))),
    }
}

/// Classify one choice
///
/// The first `categorize_expenses` call wins and later calls are ignored. A
/// prose reply that stopped normally is the model saying the line holds no
/// expense.
pub fn interpret(choice: &Choice) -> Result<ExtractedBatch, ExtractError> {
    if let Some(call) = choice.tool_calls().iter().find(|c| c.name() == TOOL_NAME) {
        let batch: ExtractedBatch = serde_json::from_str(call.arguments())
            .map_err(|e| ExtractError::DecodeFailure(e.to_string()))?;
        if batch.transactions.is_empty() {
            debug!("Tool call decoded to an empty batch");
            return Err(ExtractError::UnclassifiedFailure);
        }
        return Ok(batch);
    }

    let content = choice.content();
    if choice.finish_reason() == Some("stop") && !content.is_empty() {
        return Err(ExtractError::NoValidTransaction(content.to_string()));
    }

    Err(ExtractError::UnclassifiedFailure)
}
