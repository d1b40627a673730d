pub mod agent;
pub mod memory;
pub mod steps;

pub use crate::types::result::{RunResult, TokenUsage};
pub use agent::{Agent, Persona};
pub use memory::AgentMemory;
pub use steps::AgentStep;
