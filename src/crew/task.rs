use super::agents::AgentRole;
use crate::types::TokenUsage;
use serde::Serialize;
use std::fmt;

/// One unit of work in a plan, assigned to a single agent.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    pub agent: AgentRole,
    /// Names of earlier tasks whose raw output is appended to the prompt
    pub context: Vec<String>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        agent: AgentRole,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, task_name: impl Into<String>) -> Self {
        self.context.push(task_name.into());
        self
    }

    /// Full prompt handed to the agent, with upstream outputs appended.
    pub fn prompt(&self, context: &[&TaskOutput]) -> String {
        let mut prompt = format!(
            "{}\n\nExpected output: {}",
            self.description.trim(),
            self.expected_output.trim()
        );

        if !context.is_empty() {
            prompt.push_str("\n\nContext from earlier tasks:");
            for output in context {
                prompt.push_str(&format!(
                    "\n\n--- {} ({}) ---\n{}",
                    output.task, output.agent_role, output.raw
                ));
            }
        }

        prompt
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutput {
    pub task: String,
    pub agent: AgentRole,
    pub agent_role: String,
    pub raw: String,
    pub iterations: usize,
}

/// Aggregated result of running every task of a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewOutput {
    pub tasks: Vec<TaskOutput>,
    pub token_usage: Option<TokenUsage>,
}

impl CrewOutput {
    /// Raw text of the last task
    pub fn raw(&self) -> &str {
        self.tasks.last().map(|task| task.raw.as_str()).unwrap_or_default()
    }

    pub fn task(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks.iter().find(|task| task.task == name)
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
