use super::{
    agents::AgentRole,
    task::{CrewOutput, Task, TaskOutput},
};
use crate::{
    core::Agent,
    error::{PlannerError, Result},
    types::TokenUsage,
};
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

/// Sequential plan: every task runs after the previous one finishes.
pub struct Crew {
    agents: BTreeMap<AgentRole, Agent>,
    tasks: Vec<Task>,
}

impl Crew {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            agents: BTreeMap::new(),
            tasks,
        }
    }

    pub fn with_agent(mut self, role: AgentRole, agent: Agent) -> Self {
        self.agents.insert(role, agent);
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Check that every task has an agent and only depends on earlier tasks.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();

        for task in &self.tasks {
            if !self.agents.contains_key(&task.agent) {
                return Err(PlannerError::Config(format!(
                    "task '{}' is assigned to the {} agent, which is not part of the crew",
                    task.name, task.agent
                )));
            }

            for dependency in &task.context {
                if !seen.contains(dependency.as_str()) {
                    return Err(PlannerError::Config(format!(
                        "task '{}' uses '{}' as context, but that task does not run before it",
                        task.name, dependency
                    )));
                }
            }

            if !seen.insert(task.name.as_str()) {
                return Err(PlannerError::Config(format!(
                    "duplicate task name '{}'",
                    task.name
                )));
            }
        }

        Ok(())
    }

    /// Run all tasks in order. The first failing agent aborts the plan.
    pub async fn kickoff(&self) -> Result<CrewOutput> {
        self.validate()?;

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut token_usage: Option<TokenUsage> = None;

        for task in &self.tasks {
            let agent = self.agents.get(&task.agent).ok_or_else(|| {
                PlannerError::Config(format!("no agent registered for {}", task.agent))
            })?;

            let context: Vec<&TaskOutput> = task
                .context
                .iter()
                .filter_map(|name| outputs.iter().find(|output| &output.task == name))
                .collect();

            info!(task = %task.name, agent = %agent.role(), "Starting task");

            let result = match agent.run(&task.prompt(&context)).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(task = %task.name, agent = %agent.role(), error = %err, "Task failed, aborting plan");
                    return Err(err);
                }
            };

            info!(
                task = %task.name,
                iterations = result.iterations,
                duration_ms = result.duration.as_millis() as u64,
                "Task completed"
            );

            token_usage = TokenUsage::merge(token_usage, result.tokens);
            outputs.push(TaskOutput {
                task: task.name.clone(),
                agent: task.agent,
                agent_role: agent.role().to_string(),
                raw: result.output,
                iterations: result.iterations,
            });
        }

        Ok(CrewOutput {
            tasks: outputs,
            token_usage,
        })
    }
}
