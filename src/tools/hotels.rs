//! Mock hotel search, aware of flight arrival times.

use super::{
    flights::parse_date,
    tool::{parameters_schema_for, parse_parameters, ToolFuture},
    Tool,
};
use crate::{
    error::{PlannerError, Result},
    types::HotelOption,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Standard check-in hour; arriving earlier counts as an early arrival
pub const CHECK_IN_HOUR: u32 = 15;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HotelSearchParams {
    /// Target city/country
    pub destination: String,
    /// Check-in date (YYYY-MM-DD) or arrival timestamp (YYYY-MM-DDTHH:MM:SS)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD)
    pub check_out: String,
    /// Maximum price per night in USD
    pub budget_per_night: f64,
    /// Comma-separated traveler preferences used to rank hotels
    #[serde(default)]
    pub preferences: Option<String>,
    /// Flight arrival timestamp; overrides the check-in time for early-arrival detection
    #[serde(default)]
    pub flight_arrival_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSearch {
    pub hotels: Vec<HotelOption>,
    pub destination: String,
    pub nights: i64,
    pub early_arrival_detected: bool,
    pub check_in: String,
    pub check_out: String,
    pub total_options: usize,
}

struct HotelTemplate {
    name: &'static str,
    location: &'static str,
    budget_share: f64,
    price_cap: f64,
    rating: f64,
    amenities: [&'static str; 4],
    notes: &'static str,
    early_arrival_notes: Option<&'static str>,
}

const HOTELS: [HotelTemplate; 3] = [
    HotelTemplate {
        name: "Le Marais Boutique Hotel",
        location: "Le Marais District - Central Paris, walkable to museums",
        budget_share: 1.0,
        price_cap: 180.0,
        rating: 4.5,
        amenities: [
            "Free WiFi",
            "Breakfast included",
            "Walking distance to Louvre",
            "24/7 reception",
        ],
        notes: "Standard check-in from 3 PM",
        early_arrival_notes: Some("Early check-in available at no extra cost"),
    },
    HotelTemplate {
        name: "Montmartre View Hotel",
        location: "Montmartre - Artistic district with panoramic views",
        budget_share: 0.7,
        price_cap: 120.0,
        rating: 4.2,
        amenities: [
            "Free WiFi",
            "Rooftop terrace",
            "Near Sacré-Cœur",
            "Metro access",
        ],
        notes: "Budget-friendly option in charming neighborhood",
        early_arrival_notes: None,
    },
    HotelTemplate {
        name: "Latin Quarter Historic Inn",
        location: "Latin Quarter - Near Pantheon and Sorbonne",
        budget_share: 0.85,
        price_cap: 150.0,
        rating: 4.4,
        amenities: [
            "Free WiFi",
            "Continental breakfast",
            "Historic building",
            "Central location",
        ],
        notes: "Perfect for exploring Left Bank cafes and bookshops",
        early_arrival_notes: None,
    },
];

/// Parse an ISO timestamp, tolerating a `Z` suffix, a UTC offset or a space
/// instead of `T`
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }

    let naive = value
        .split('+')
        .next()
        .unwrap_or(value)
        .trim_end_matches('Z')
        .replacen(' ', "T", 1);
    NaiveDateTime::parse_from_str(&naive, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&naive, "%Y-%m-%dT%H:%M"))
        .ok()
}

fn parse_required_timestamp(field: &str, value: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value).ok_or_else(|| {
        PlannerError::ToolExecution(format!(
            "`{field}` must be an ISO timestamp, got '{value}'"
        ))
    })
}

/// Split a date-or-timestamp into its date and, for timestamps, the full time
fn parse_date_or_timestamp(
    field: &str,
    value: &str,
) -> Result<(NaiveDate, Option<NaiveDateTime>)> {
    if value.trim().contains(|c: char| c == 'T' || c == ' ') {
        let arrival = parse_timestamp(value).ok_or_else(|| {
            PlannerError::ToolExecution(format!(
                "`{field}` must be a date or ISO timestamp, got '{value}'"
            ))
        })?;
        Ok((arrival.date(), Some(arrival)))
    } else {
        Ok((parse_date(field, value)?, None))
    }
}

fn preference_hits(template: &HotelTemplate, tags: &[String]) -> usize {
    let haystack =
        format!("{} {}", template.location, template.amenities.join(" ")).to_lowercase();
    tags.iter().filter(|tag| haystack.contains(tag.as_str())).count()
}

/// Return the canned hotels whose nightly price fits `budget_per_night`
pub fn search_hotels(params: &HotelSearchParams) -> Result<HotelSearch> {
    let (check_in_date, arrival) = parse_date_or_timestamp("check_in", &params.check_in)?;
    let (check_out_date, _) = parse_date_or_timestamp("check_out", &params.check_out)?;

    let arrival = match params.flight_arrival_time.as_deref() {
        Some(value) => Some(parse_required_timestamp("flight_arrival_time", value)?),
        None => arrival,
    };
    let early_arrival = arrival.is_some_and(|at| at.hour() < CHECK_IN_HOUR);

    let nights = (check_out_date - check_in_date).num_days().max(0);

    let tags: Vec<String> = params
        .preferences
        .as_deref()
        .unwrap_or_default()
        .to_lowercase()
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let mut ranked: Vec<&HotelTemplate> = HOTELS.iter().collect();
    // Stable: ties keep catalogue order
    ranked.sort_by_key(|template| std::cmp::Reverse(preference_hits(template, &tags)));

    let hotels: Vec<HotelOption> = ranked
        .into_iter()
        .map(|template| {
            let price_per_night =
                (params.budget_per_night * template.budget_share).min(template.price_cap);
            let notes = template
                .early_arrival_notes
                .filter(|_| early_arrival)
                .unwrap_or(template.notes);

            HotelOption {
                name: template.name.to_string(),
                location: template.location.to_string(),
                price_per_night,
                total_price: price_per_night * nights as f64,
                rating: template.rating,
                amenities: template.amenities.iter().map(|a| a.to_string()).collect(),
                check_in_date: check_in_date.to_string(),
                check_out_date: check_out_date.to_string(),
                notes: Some(notes.to_string()),
            }
        })
        .filter(|hotel| hotel.price_per_night <= params.budget_per_night)
        .collect();

    Ok(HotelSearch {
        total_options: hotels.len(),
        hotels,
        destination: params.destination.clone(),
        nights,
        early_arrival_detected: early_arrival,
        check_in: check_in_date.to_string(),
        check_out: check_out_date.to_string(),
    })
}

#[derive(Debug, Default)]
pub struct HotelSearchTool;

impl HotelSearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for HotelSearchTool {
    fn name(&self) -> &'static str {
        "search_hotels"
    }

    fn description(&self) -> &'static str {
        "Search for hotels in a destination for the given dates and nightly budget. Pass the flight arrival timestamp as check_in (or flight_arrival_time) to get early check-in advice."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        parameters_schema_for::<HotelSearchParams>()
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params: HotelSearchParams = parse_parameters(self.name(), parameters)?;
            let search = search_hotels(&params)?;
            Ok(serde_json::to_value(search)?)
        })
    }
}
