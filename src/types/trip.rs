use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Incoming trip planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city/country
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total budget in USD
    pub budget: f64,
    /// Interests such as "museums", "food", "adventure"
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
}

fn default_travelers() -> u32 {
    1
}

impl TripRequest {
    /// Whole days between start and end date. Negative when the dates are reversed.
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Preferences joined for prompts, or a generic fallback
    pub fn preferences_label(&self) -> String {
        if self.preferences.is_empty() {
            "general sightseeing".to_string()
        } else {
            self.preferences.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlightOption {
    pub airline: String,
    pub flight_number: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_hours: f64,
    pub price: f64,
    pub booking_class: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HotelOption {
    pub name: String,
    pub location: String,
    pub price_per_night: f64,
    pub total_price: f64,
    pub rating: f64,
    pub amenities: Vec<String>,
    pub check_in_date: String,
    pub check_out_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherInfo {
    /// Average daily high in °F
    pub avg_temp_high: f64,
    /// Average daily low in °F
    pub avg_temp_low: f64,
    pub condition: String,
    /// Probability of precipitation, 0.0 to 1.0
    pub precipitation_chance: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attraction {
    pub name: String,
    pub category: String,
    pub estimated_time_hours: f64,
    pub cost: f64,
    pub indoor: bool,
    pub description: String,
}

/// Assembled response for one trip request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub destination: String,
    /// `"<start> to <end>"`
    pub dates: String,
    pub flights: Vec<FlightOption>,
    pub hotels: Vec<HotelOption>,
    pub weather: WeatherInfo,
    pub attractions: Vec<Attraction>,
    pub total_estimated_cost: f64,
    #[serde(default)]
    pub langfuse_trace_url: Option<String>,
    pub reasoning_summary: String,
}
