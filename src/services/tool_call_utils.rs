use crate::error::PlannerError;
use serde::Deserialize;
use serde_json::{json, Value};

pub(crate) const FINAL_ANSWER_TOOL_NAME: &str = "final_answer";

/// Arguments for the final_answer tool
#[derive(Deserialize)]
pub(super) struct FinalAnswerArguments {
    pub answer: String,
}

/// Tool definition the model calls to finish a task
pub(super) fn final_answer_tool_definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": FINAL_ANSWER_TOOL_NAME,
            "description": "Finish the task and hand your complete answer to the next stage of the trip plan.",
            "parameters": {
                "type": "object",
                "properties": {
                    "answer": {
                        "type": "string",
                        "description": "The complete final answer, including any JSON the task asked for"
                    }
                },
                "required": ["answer"]
            }
        }
    })
}

/// Extract tool_call_id from a tool call JSON object
pub(super) fn extract_tool_call_id(tool_call: &Value) -> Option<&str> {
    tool_call
        .get("id")
        .and_then(|value| value.as_str())
        .filter(|id| !id.is_empty())
}

/// Extract the function object and its name from a tool call
pub(super) fn extract_function_info(tool_call: &Value) -> Option<(&Value, Option<&str>)> {
    let function = tool_call.get("function")?;
    let function_name = function.get("name").and_then(|value| value.as_str());
    Some((function, function_name))
}

/// Extract arguments string from function object
pub(super) fn extract_arguments_str(function: &Value) -> &str {
    function
        .get("arguments")
        .and_then(|value| value.as_str())
        .unwrap_or("")
}

/// Parse function arguments from JSON string. An empty string means no arguments.
pub(super) fn parse_function_arguments(
    arguments_str: &str,
    function_name: &str,
) -> Result<Value, PlannerError> {
    if arguments_str.trim().is_empty() {
        return Ok(json!({}));
    }

    serde_json::from_str(arguments_str).map_err(|err| {
        PlannerError::InvalidFunctionCall(format!(
            "Failed to parse arguments for tool '{}': {}",
            function_name, err
        ))
    })
}
