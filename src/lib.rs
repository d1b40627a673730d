//! travel-crew: a multi-agent travel planner
//!
//! Four tool-calling LLM agents (flights, weather, hotels, attractions) run in
//! a fixed sequence, each backed by a deterministic mock data provider. The
//! hotel agent sees the flight agent's answer and the attractions agent sees
//! the weather agent's. An axum server exposes the planner over HTTP.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use travel_crew::{Settings, TripPlanner, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::from_env()?;
//!     let planner = TripPlanner::new(settings.llm);
//!
//!     let request: TripRequest = serde_json::from_str(
//!         r#"{"destination": "Paris", "start_date": "2025-01-10",
//!             "end_date": "2025-01-17", "budget": 3000.0,
//!             "preferences": ["museums", "food"]}"#,
//!     )?;
//!     let plan = planner.plan(&request).await?;
//!     println!("{}", plan.reasoning_summary);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod crew;
pub mod error;
pub mod planner;
pub(crate) mod services;
pub mod tools;
pub mod types;
pub mod web;

pub use config::{LlmSettings, Settings};
pub use crate::core::{Agent, AgentMemory, AgentStep, Persona, RunResult, TokenUsage};
pub use crew::{AgentRole, BudgetAllocation, Crew, CrewOutput, Task};
pub use error::{PlannerError, Result};
pub use planner::TripPlanner;
pub use tools::{FunctionFactory, Tool, ToolRegistry};
pub use types::{TripPlan, TripRequest};

#[cfg(feature = "cli")]
pub mod cli;
