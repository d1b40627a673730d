use super::{
    llm_client::ChatCompletionRequest,
    tool_call_utils::{
        extract_arguments_str, extract_function_info, extract_tool_call_id,
        final_answer_tool_definition, parse_function_arguments, FinalAnswerArguments,
        FINAL_ANSWER_TOOL_NAME,
    },
};
use crate::{
    core::{agent::Agent, memory::AgentMemory, steps::AgentStep},
    error::{PlannerError, Result},
    types::result::{RunResult, TokenUsage},
};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

/// Step recorded for corrections that don't answer a specific tool call
fn correction(message: impl Into<String>) -> AgentStep {
    AgentStep::Observation {
        tool_call_id: String::new(),
        result: message.into(),
        is_error: true,
    }
}

fn parse_usage(response: &Value) -> Option<TokenUsage> {
    let usage = response.get("usage")?;
    Some(TokenUsage {
        prompt_tokens: usage.get("prompt_tokens")?.as_u64()? as u32,
        completion_tokens: usage.get("completion_tokens")?.as_u64()? as u32,
        total_tokens: usage.get("total_tokens")?.as_u64()? as u32,
    })
}

fn assistant_message(response: &Value) -> Result<&Value> {
    let choices = response
        .get("choices")
        .and_then(|value| value.as_array())
        .ok_or_else(|| {
            PlannerError::LlmApi("Missing 'choices' array in completion response".to_string())
        })?;

    choices
        .first()
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| {
            PlannerError::LlmApi("Completion response contained no assistant message".to_string())
        })
}

fn is_final_answer_call(tool_call: &Value) -> bool {
    tool_call
        .get("function")
        .and_then(|f| f.get("name"))
        .and_then(|name| name.as_str())
        == Some(FINAL_ANSWER_TOOL_NAME)
}

impl Agent {
    /// Run one task to completion: call tools until the model produces a final answer.
    pub async fn run(&self, task: &str) -> Result<RunResult> {
        let start_time = Instant::now();
        let mut memory = AgentMemory::new(self.role(), self.persona().system_prompt());
        memory.add_step(AgentStep::Task {
            content: task.to_string(),
        });

        let mut tokens: Option<TokenUsage> = None;

        for iteration in 1..=self.max_iterations() {
            let mut tools = self.function_factory().get_openai_tools();
            tools.push(final_answer_tool_definition());

            let request_body = ChatCompletionRequest::new(self.model(), memory.as_messages())
                .with_tools(tools)
                .with_tool_choice(json!("auto"))
                .with_temperature(self.temperature())
                .with_max_tokens(self.max_tokens())
                .into_value();

            let response = self.make_raw_request(&request_body).await?;
            tokens = TokenUsage::merge(tokens, parse_usage(&response));
            let message = assistant_message(&response)?;

            let tool_calls = message
                .get("tool_calls")
                .and_then(|value| value.as_array())
                .filter(|calls| !calls.is_empty());

            let Some(tool_calls) = tool_calls else {
                let content = message
                    .get("content")
                    .and_then(|value| value.as_str())
                    .unwrap_or("")
                    .trim();

                if content.is_empty() {
                    memory.add_step(correction(
                        "You returned no content. Call the `final_answer` tool with your complete answer to finish.",
                    ));
                    continue;
                }

                return Ok(self.finish(memory, content.to_string(), tokens, start_time, iteration));
            };

            if tool_calls.len() > 1 && tool_calls.iter().any(is_final_answer_call) {
                memory.add_step(correction(
                    PlannerError::InvalidFunctionCall(
                        "`final_answer` must be the only tool call in a single turn".to_string(),
                    )
                    .to_error_payload()
                    .to_string(),
                ));
                continue;
            }

            for (index, tool_call) in tool_calls.iter().enumerate() {
                // Observations must answer a non-empty id or the endpoint rejects the turn
                let tool_call_id = extract_tool_call_id(tool_call)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("call_{iteration}_{index}"));

                let (function, function_name) = match extract_function_info(tool_call) {
                    Some((function, Some(name))) if !name.is_empty() => (function, name),
                    _ => {
                        memory.add_step(correction(
                            PlannerError::InvalidFunctionCall(
                                "Tool call missing function name".to_string(),
                            )
                            .to_error_payload()
                            .to_string(),
                        ));
                        continue;
                    }
                };

                let parsed_arguments =
                    parse_function_arguments(extract_arguments_str(function), function_name);

                if function_name == FINAL_ANSWER_TOOL_NAME {
                    let answer = parsed_arguments
                        .and_then(|args| {
                            serde_json::from_value::<FinalAnswerArguments>(args).map_err(|err| {
                                PlannerError::InvalidFunctionCall(format!(
                                    "Invalid final_answer arguments: {}",
                                    err
                                ))
                            })
                        })
                        .map(|args| args.answer.trim().to_string());

                    match answer {
                        Ok(answer) if !answer.is_empty() => {
                            return Ok(self.finish(memory, answer, tokens, start_time, iteration));
                        }
                        Ok(_) => memory.add_step(correction(
                            PlannerError::InvalidFunctionCall(
                                "final_answer requires a non-empty `answer` field".to_string(),
                            )
                            .to_error_payload()
                            .to_string(),
                        )),
                        Err(err) => memory.add_step(correction(err.to_error_payload().to_string())),
                    }
                    continue;
                }

                let arguments_json = match parsed_arguments {
                    Ok(arguments_json) => arguments_json,
                    Err(err) => {
                        memory.add_step(correction(err.to_error_payload().to_string()));
                        continue;
                    }
                };

                memory.add_step(AgentStep::Action {
                    tool_name: function_name.to_string(),
                    tool_call_id: tool_call_id.clone(),
                    arguments: arguments_json.clone(),
                });

                let (result, is_error) = match self
                    .function_factory()
                    .execute_function(function_name, arguments_json)
                    .await
                {
                    Ok(result) => (result.to_string(), false),
                    Err(err) => (err.to_error_payload().to_string(), true),
                };

                memory.add_step(AgentStep::Observation {
                    tool_call_id,
                    result,
                    is_error,
                });
            }
        }

        Err(PlannerError::MaxIterations(self.max_iterations()))
    }

    fn finish(
        &self,
        mut memory: AgentMemory,
        answer: String,
        tokens: Option<TokenUsage>,
        start_time: Instant,
        iteration: usize,
    ) -> RunResult {
        memory.add_step(AgentStep::FinalAnswer {
            answer: answer.clone(),
        });

        let result = RunResult {
            output: answer,
            steps: memory.into_steps(),
            tokens,
            duration: start_time.elapsed(),
            iterations: iteration,
        };

        info!(
            agent = %self.role(),
            iterations = result.iterations,
            tool_calls = result.action_count(),
            elapsed_ms = result.duration.as_millis() as u64,
            "agent finished"
        );
        debug!("{}", result.replay());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::agent::Persona,
        tools::{FlightSearchTool, FunctionFactory},
    };

    fn completion(message: Value) -> String {
        json!({
            "id": "cmpl",
            "choices": [{"index": 0, "message": message, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })
        .to_string()
    }

    fn agent_for(server: &mockito::Server) -> Agent {
        let mut factory = FunctionFactory::new();
        factory.register_tool(FlightSearchTool::new());
        Agent::new(
            Persona::new("Flight Search Specialist", "find flights", "expert"),
            "test-key".to_string(),
            factory,
        )
        .with_base_url(server.url())
        .with_max_iterations(3)
    }

    #[tokio::test]
    async fn tool_call_then_final_answer() {
        let mut server = mockito::Server::new_async().await;

        // The second request already carries the tool observation
        let answer_mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex("\"role\":\"tool\"".to_string()))
            .with_status(200)
            .with_body(completion(json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_2",
                    "type": "function",
                    "function": {"name": "final_answer", "arguments": "{\"answer\":\"Take AF123\"}"}
                }]
            })))
            .create_async()
            .await;

        let search_mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion(json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "search_flights",
                        "arguments": "{\"destination\":\"Paris\",\"start_date\":\"2025-03-01\",\"end_date\":\"2025-03-08\",\"budget\":1200}"
                    }
                }]
            })))
            .expect(1)
            .create_async()
            .await;

        let result = agent_for(&server).run("Find flights").await.unwrap();

        search_mock.assert_async().await;
        answer_mock.assert_async().await;
        assert_eq!(result.output, "Take AF123");
        assert_eq!(result.iterations, 2);
        assert_eq!(result.action_count(), 1);
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.tokens.unwrap().total_tokens, 30);
        assert!(matches!(result.steps.last(), Some(AgentStep::FinalAnswer { .. })));
    }

    #[tokio::test]
    async fn tool_call_without_id_gets_a_generated_one() {
        let mut server = mockito::Server::new_async().await;

        let answer_mock = server
            .mock("POST", "/chat/completions")
            .match_body(mockito::Matcher::Regex(
                "\"tool_call_id\":\"call_1_0\"".to_string(),
            ))
            .with_status(200)
            .with_body(completion(json!({"role": "assistant", "content": "Take BA456"})))
            .create_async()
            .await;

        let search_mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion(json!({
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "type": "function",
                    "function": {
                        "name": "search_flights",
                        "arguments": "{\"destination\":\"Paris\",\"start_date\":\"2025-03-01\",\"end_date\":\"2025-03-08\",\"budget\":900}"
                    }
                }]
            })))
            .expect(1)
            .create_async()
            .await;

        let result = agent_for(&server).run("Find flights").await.unwrap();

        search_mock.assert_async().await;
        answer_mock.assert_async().await;
        assert_eq!(result.output, "Take BA456");

        let ids: Vec<&str> = result
            .steps
            .iter()
            .filter_map(|step| match step {
                AgentStep::Action { tool_call_id, .. }
                | AgentStep::Observation { tool_call_id, .. } => Some(tool_call_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["call_1_0", "call_1_0"]);
        assert_eq!(result.steps[2].to_message()["role"], "tool");
    }

    #[tokio::test]
    async fn plain_content_is_accepted_as_answer() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion(json!({"role": "assistant", "content": "  Fly Lufthansa.  "})))
            .create_async()
            .await;

        let result = agent_for(&server).run("Find flights").await.unwrap();
        assert_eq!(result.output, "Fly Lufthansa.");
        assert_eq!(result.iterations, 1);
    }

    #[tokio::test]
    async fn empty_replies_exhaust_iterations() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion(json!({"role": "assistant", "content": ""})))
            .expect(3)
            .create_async()
            .await;

        let err = agent_for(&server).run("Find flights").await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, PlannerError::MaxIterations(3)));
    }

    #[tokio::test]
    async fn api_failure_aborts_the_run() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let err = agent_for(&server).run("Find flights").await.unwrap_err();
        assert!(err.to_string().contains("upstream exploded"));
    }
}
