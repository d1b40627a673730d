use crate::{
    config::LlmSettings,
    error::Result,
    services::llm_client::LlmClient,
    tools::FunctionFactory,
};
use serde_json::Value;
use std::time::Duration;

/// Who an agent is: the text that frames every prompt it receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Persona {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {role}. {backstory}\n\nYour personal goal is: {goal}\n\nUse your tools when they help you gather facts; never invent data a tool can provide. When you are ready to give the final response, you MUST call the `final_answer` tool with an `answer` string instead of replying directly.",
            role = self.role,
            backstory = self.backstory,
            goal = self.goal,
        )
    }
}

/// A persona bound to a set of tools and a chat completion endpoint
#[derive(Debug)]
pub struct Agent {
    persona: Persona,
    llm_client: LlmClient,
    function_factory: FunctionFactory,
    model: String,
    temperature: Option<f32>,
    max_iterations: usize,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Agent {
    pub fn new(persona: Persona, api_key: String, function_factory: FunctionFactory) -> Self {
        Self {
            persona,
            llm_client: LlmClient::new(api_key),
            function_factory,
            model: crate::config::DEFAULT_LLM_MODEL.to_string(),
            temperature: None,
            max_iterations: 10,
            max_tokens: Some(1024),
            timeout: Duration::from_secs(120),
        }
    }

    /// Build an agent with every knob taken from the shared LLM settings
    pub fn from_settings(
        persona: Persona,
        settings: &LlmSettings,
        function_factory: FunctionFactory,
    ) -> Self {
        Self::new(persona, settings.api_key.clone(), function_factory)
            .with_base_url(settings.base_url.clone())
            .with_max_retries(settings.max_retries)
            .with_model(settings.model.clone())
            .with_temperature(settings.temperature)
            .with_max_iterations(settings.max_iterations)
            .with_max_tokens(settings.max_tokens)
            .with_timeout(settings.timeout)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.llm_client.set_base_url(base_url);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.llm_client.set_max_retries(max_retries);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn role(&self) -> &str {
        &self.persona.role
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.function_factory.tool_names()
    }

    pub(crate) fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub(crate) async fn make_raw_request(&self, request_body: &Value) -> Result<Value> {
        self.llm_client
            .chat_completion(request_body, self.timeout)
            .await
    }
}
