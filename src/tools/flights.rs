//! Mock flight search.
//!
//! Three canned itineraries whose prices scale with the caller's budget,
//! capped per airline and floored at [`MIN_FARE`].

use super::{
    tool::{parameters_schema_for, parse_parameters, ToolFuture},
    Tool,
};
use crate::{
    error::{PlannerError, Result},
    types::FlightOption,
};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lowest fare any mock flight can have
pub const MIN_FARE: f64 = 49.0;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FlightSearchParams {
    /// Target city/country
    pub destination: String,
    /// Departure date (YYYY-MM-DD)
    pub start_date: String,
    /// Return date (YYYY-MM-DD)
    pub end_date: String,
    /// Maximum flight budget in USD
    pub budget: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSearch {
    pub flights: Vec<FlightOption>,
    pub destination: String,
    pub outbound_date: String,
    pub return_date: String,
    pub currency: String,
    pub total_options: usize,
}

struct FlightTemplate {
    airline: &'static str,
    flight_number: &'static str,
    departure: (u32, u32),
    arrival: (u32, u32),
    arrives_next_day: bool,
    duration_hours: f64,
    budget_share: f64,
    price_cap: f64,
    notes: &'static str,
}

const FLIGHTS: [FlightTemplate; 3] = [
    FlightTemplate {
        airline: "Air France",
        flight_number: "AF123",
        departure: (8, 0),
        arrival: (20, 30),
        arrives_next_day: false,
        duration_hours: 8.5,
        budget_share: 0.4,
        price_cap: 850.0,
        notes: "Direct flight, arrives evening - comfortable arrival time for check-in",
    },
    FlightTemplate {
        airline: "British Airways",
        flight_number: "BA456",
        departure: (14, 0),
        arrival: (2, 30),
        arrives_next_day: true,
        duration_hours: 10.5,
        budget_share: 0.3,
        price_cap: 650.0,
        notes: "One layover in London, overnight arrival - may need early check-in",
    },
    FlightTemplate {
        airline: "Lufthansa",
        flight_number: "LH789",
        departure: (11, 0),
        arrival: (13, 15),
        arrives_next_day: false,
        duration_hours: 9.25,
        budget_share: 0.35,
        price_cap: 720.0,
        notes: "One stop in Frankfurt, afternoon arrival",
    },
];

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        PlannerError::ToolExecution(format!(
            "`{field}` must be a YYYY-MM-DD date, got '{value}': {err}"
        ))
    })
}

fn timestamp(date: NaiveDate, (hour, minute): (u32, u32)) -> String {
    format!("{}T{:02}:{:02}:00", date.format("%Y-%m-%d"), hour, minute)
}

/// Price a template for the given budget; always strictly positive
fn fare(template: &FlightTemplate, budget: f64) -> f64 {
    (budget * template.budget_share)
        .min(template.price_cap)
        .max(MIN_FARE)
}

/// Return the canned flights whose price fits within `budget`
pub fn search_flights(params: &FlightSearchParams) -> Result<FlightSearch> {
    let outbound = parse_date("start_date", &params.start_date)?;
    let inbound = parse_date("end_date", &params.end_date)?;

    let flights: Vec<FlightOption> = FLIGHTS
        .iter()
        .map(|template| {
            let arrival_date = if template.arrives_next_day {
                outbound + chrono::Duration::days(1)
            } else {
                outbound
            };

            FlightOption {
                airline: template.airline.to_string(),
                flight_number: template.flight_number.to_string(),
                departure_time: timestamp(outbound, template.departure),
                arrival_time: timestamp(arrival_date, template.arrival),
                duration_hours: template.duration_hours,
                price: fare(template, params.budget),
                booking_class: "Economy".to_string(),
                notes: Some(template.notes.to_string()),
            }
        })
        .filter(|flight| flight.price <= params.budget)
        .collect();

    Ok(FlightSearch {
        total_options: flights.len(),
        flights,
        destination: params.destination.clone(),
        outbound_date: outbound.to_string(),
        return_date: inbound.to_string(),
        currency: "USD".to_string(),
    })
}

#[derive(Debug, Default)]
pub struct FlightSearchTool;

impl FlightSearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FlightSearchTool {
    fn name(&self) -> &'static str {
        "search_flights"
    }

    fn description(&self) -> &'static str {
        "Search for flight options to a destination within a maximum flight budget. Returns airline, departure/arrival times, price and notes."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        parameters_schema_for::<FlightSearchParams>()
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params: FlightSearchParams = parse_parameters(self.name(), parameters)?;
            let search = search_flights(&params)?;
            Ok(serde_json::to_value(search)?)
        })
    }
}
