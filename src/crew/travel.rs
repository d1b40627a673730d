//! The fixed four-step travel plan.

use super::{agents::AgentRole, budget::BudgetAllocation, plan::Crew, task::Task};
use crate::{config::LlmSettings, types::TripRequest};

pub const FLIGHT_TASK: &str = "flight_search";
pub const WEATHER_TASK: &str = "weather_forecast";
pub const HOTEL_TASK: &str = "hotel_search";
pub const ATTRACTIONS_TASK: &str = "attractions_curation";

/// Tasks in execution order: flight, weather, hotel (flight context),
/// attractions (weather context).
pub fn travel_tasks(request: &TripRequest, budget: &BudgetAllocation) -> Vec<Task> {
    let destination = &request.destination;
    let start = request.start_date;
    let end = request.end_date;
    let preferences = request.preferences_label();

    let flight = Task::new(
        FLIGHT_TASK,
        AgentRole::Flight,
        format!(
            "Find the best flights to {destination} for a trip from {start} to {end}.\n\
             Flight budget: ${flights:.2}\n\n\
             Steps:\n\
             1. Call search_flights to list the available options.\n\
             2. Compare price, convenience and arrival time.\n\
             3. Arrival time matters for hotel check-in, so state it clearly.\n\
             4. Recommend your top two flights and explain the choice.\n\n\
             Answer with JSON containing the flight details and your reasoning.",
            flights = budget.flights,
        ),
        "JSON with the recommended flights, their arrival times and the analysis",
    );

    let weather = Task::new(
        WEATHER_TASK,
        AgentRole::Weather,
        format!(
            "Forecast the weather in {destination} between {start} and {end}.\n\n\
             Steps:\n\
             1. Call get_weather_forecast for the travel dates.\n\
             2. Report the temperature range and the chance of precipitation.\n\
             3. Give concrete packing advice.\n\
             4. Say whether indoor or outdoor activities suit the trip better.\n\n\
             Answer with JSON containing the forecast and your recommendations."
        ),
        "JSON with the weather forecast and packing recommendations",
    );

    let hotel = Task::new(
        HOTEL_TASK,
        AgentRole::Hotel,
        format!(
            "Find hotels in {destination} for the trip.\n\
             Nightly budget: ${per_night:.2}\n\
             Dates: {start} to {end}\n\
             Traveler preferences: {preferences}\n\n\
             Check the flight arrival time in the context below:\n\
             - arriving before 3 PM: favour hotels offering early check-in\n\
             - arriving after 10 PM: mention that late check-in must be confirmed\n\n\
             Steps:\n\
             1. Call search_hotels with the check-in and check-out dates and the flight arrival time.\n\
             2. Match the hotel location to the traveler preferences.\n\
             3. Recommend two or three hotels and explain the choice.\n\n\
             Answer with JSON containing the hotel details and your reasoning.",
            per_night = budget.hotel_per_night,
        ),
        "JSON with hotel recommendations coordinated with the flight arrival",
    )
    .with_context(FLIGHT_TASK);

    let attractions = Task::new(
        ATTRACTIONS_TASK,
        AgentRole::Attractions,
        format!(
            "Curate attractions and activities in {destination}.\n\
             Activity budget: ${activities:.2}\n\
             Traveler preferences: {preferences}\n\n\
             Check the weather forecast in the context below:\n\
             - rain or cold expected: put indoor attractions first\n\
             - good weather: include outdoor experiences\n\n\
             Steps:\n\
             1. Call search_attractions with the preferences, the weather condition and the budget.\n\
             2. Balance the mix of activities against the preferences.\n\
             3. Keep the total cost within the activity budget.\n\
             4. Recommend four to six activities with time estimates.\n\n\
             Answer with JSON containing the attraction details and your reasoning.",
            activities = budget.activities,
        ),
        "JSON with curated attractions adapted to weather and preferences",
    )
    .with_context(WEATHER_TASK);

    vec![flight, weather, hotel, attractions]
}

/// Build the crew for one request with a fresh agent per role.
pub fn travel_crew(
    request: &TripRequest,
    budget: &BudgetAllocation,
    settings: &LlmSettings,
) -> Crew {
    AgentRole::ALL.iter().fold(
        Crew::new(travel_tasks(request, budget)),
        |crew, role| crew.with_agent(*role, role.build_agent(settings)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request() -> TripRequest {
        TripRequest {
            destination: "Paris".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 14).unwrap(),
            budget: 2000.0,
            preferences: vec!["museums".to_string(), "food".to_string()],
            travelers: 1,
        }
    }

    #[test]
    fn tasks_run_in_fixed_order_with_context() {
        let request = request();
        let budget = BudgetAllocation::allocate(request.budget, request.nights());
        let tasks = travel_tasks(&request, &budget);

        let order: Vec<(&str, AgentRole)> = tasks
            .iter()
            .map(|task| (task.name.as_str(), task.agent))
            .collect();
        assert_eq!(
            order,
            vec![
                (FLIGHT_TASK, AgentRole::Flight),
                (WEATHER_TASK, AgentRole::Weather),
                (HOTEL_TASK, AgentRole::Hotel),
                (ATTRACTIONS_TASK, AgentRole::Attractions),
            ]
        );
        assert!(tasks[0].context.is_empty());
        assert!(tasks[1].context.is_empty());
        assert_eq!(tasks[2].context, vec![FLIGHT_TASK.to_string()]);
        assert_eq!(tasks[3].context, vec![WEATHER_TASK.to_string()]);
    }

    #[test]
    fn budgets_are_interpolated() {
        let request = request();
        let budget = BudgetAllocation::allocate(request.budget, request.nights());
        let tasks = travel_tasks(&request, &budget);

        assert!(tasks[0].description.contains("Flight budget: $800.00"));
        assert!(tasks[2].description.contains("Nightly budget: $175.00"));
        assert!(tasks[2].description.contains("museums, food"));
        assert!(tasks[3].description.contains("Activity budget: $500.00"));
    }

    #[test]
    fn crew_is_valid() {
        let request = request();
        let budget = BudgetAllocation::allocate(request.budget, request.nights());
        let settings = LlmSettings {
            api_key: "test-key".to_string(),
            ..LlmSettings::default()
        };
        assert!(travel_crew(&request, &budget, &settings).validate().is_ok());
    }
}
