//! Role agents and the sequential plan that chains them.

pub mod agents;
pub mod budget;
pub mod plan;
pub mod task;
pub mod travel;

pub use agents::AgentRole;
pub use budget::BudgetAllocation;
pub use plan::Crew;
pub use task::{CrewOutput, Task, TaskOutput};
pub use travel::{travel_crew, travel_tasks};
