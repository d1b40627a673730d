pub(crate) mod execution;
pub(crate) mod llm_client;
pub(crate) mod tool_call_utils;
