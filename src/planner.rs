//! Request-level planning: validate, split the budget, run the crew and
//! assemble the response.

use crate::{
    config::LlmSettings,
    crew::{travel_crew, BudgetAllocation, CrewOutput},
    error::{PlannerError, Result},
    types::{TripPlan, TripRequest, WeatherInfo},
};
use tracing::{debug, info};

/// Fraction of the budget reported as the estimated total cost
pub const ESTIMATED_COST_SHARE: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct TripPlanner {
    llm: LlmSettings,
}

impl TripPlanner {
    pub fn new(llm: LlmSettings) -> Self {
        Self { llm }
    }

    pub fn settings(&self) -> &LlmSettings {
        &self.llm
    }

    pub async fn plan(&self, request: &TripRequest) -> Result<TripPlan> {
        validate_request(request)?;

        let budget = BudgetAllocation::allocate(request.budget, request.nights());
        info!(
            destination = %request.destination,
            start = %request.start_date,
            end = %request.end_date,
            budget = request.budget,
            nights = budget.nights,
            "Planning trip"
        );
        debug!(?budget, "Budget split");

        let output = travel_crew(request, &budget, &self.llm).kickoff().await?;

        if let Some(tokens) = output.token_usage {
            info!(
                prompt_tokens = tokens.prompt_tokens,
                completion_tokens = tokens.completion_tokens,
                total_tokens = tokens.total_tokens,
                "Plan completed"
            );
        } else {
            info!("Plan completed");
        }

        Ok(assemble_plan(request, &output))
    }
}

pub fn validate_request(request: &TripRequest) -> Result<()> {
    if request.end_date < request.start_date {
        return Err(PlannerError::Validation(format!(
            "end_date {} is before start_date {}",
            request.end_date, request.start_date
        )));
    }
    Ok(())
}

/// Weather reported in every plan until agent output is parsed
pub fn placeholder_weather() -> WeatherInfo {
    WeatherInfo {
        avg_temp_high: 45.0,
        avg_temp_low: 37.0,
        condition: "cold".to_string(),
        precipitation_chance: 0.4,
        recommendations: vec!["Pack warm layers".to_string()],
    }
}

// TODO: parse the flight, hotel and attraction JSON out of the task outputs
// instead of returning empty lists.
pub fn assemble_plan(request: &TripRequest, output: &CrewOutput) -> TripPlan {
    TripPlan {
        destination: request.destination.clone(),
        dates: format!("{} to {}", request.start_date, request.end_date),
        flights: Vec::new(),
        hotels: Vec::new(),
        weather: placeholder_weather(),
        attractions: Vec::new(),
        total_estimated_cost: request.budget * ESTIMATED_COST_SHARE,
        langfuse_trace_url: None,
        reasoning_summary: output.raw().to_string(),
    }
}
