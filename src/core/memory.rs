use super::steps::AgentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Ordered record of one agent run, convertible to chat messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMemory {
    steps: Vec<AgentStep>,
    system_prompt: String,
    role: String,
}

impl AgentMemory {
    pub fn new(role: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            steps: Vec::new(),
            system_prompt: system_prompt.into(),
            role: role.into(),
        }
    }

    /// Add a step to memory
    pub fn add_step(&mut self, step: AgentStep) {
        info!(target: "travel_crew::steps", agent = %self.role, "{}", step.describe());
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<AgentStep> {
        self.steps
    }

    /// Convert memory to chat completion message format
    pub fn as_messages(&self) -> Vec<Value> {
        let mut messages = Vec::with_capacity(self.steps.len() + 1);
        messages.push(serde_json::json!({
            "role": "system",
            "content": self.system_prompt
        }));
        messages.extend(self.steps.iter().map(AgentStep::to_message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_start_with_system_prompt() {
        let mut memory = AgentMemory::new("Flight Search Specialist", "You find flights.");
        memory.add_step(AgentStep::Task {
            content: "Find flights to Paris".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "You find flights.");
        assert_eq!(messages[1]["content"], "Find flights to Paris");
        assert_eq!(memory.steps().len(), 1);
    }
}
