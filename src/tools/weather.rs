//! Mock weather forecast backed by a monthly climate table.

use super::{
    flights::parse_date,
    tool::{parameters_schema_for, parse_parameters, ToolFuture},
    Tool,
};
use crate::{error::Result, types::WeatherInfo};
use chrono::Datelike;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WeatherParams {
    /// Target city/country
    pub destination: String,
    /// First day of the trip (YYYY-MM-DD)
    pub start_date: String,
    /// Last day of the trip (YYYY-MM-DD)
    pub end_date: String,
    /// Temperature units for the forecast, fahrenheit by default
    #[serde(default)]
    pub units: Option<TemperatureUnits>,
}

/// Temperature units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnits {
    Celsius,
    #[default]
    Fahrenheit,
}

/// Whether the forecast favours indoor or outdoor plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivitySetting {
    Indoor,
    Outdoor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub units: TemperatureUnits,
    pub forecast: WeatherInfo,
    pub suggested_setting: ActivitySetting,
}

/// Average high °F, average low °F, chance of precipitation; January first
const PARIS_CLIMATE: [(f64, f64, f64); 12] = [
    (45.0, 37.0, 0.40),
    (47.0, 37.0, 0.35),
    (54.0, 41.0, 0.35),
    (61.0, 45.0, 0.35),
    (67.0, 51.0, 0.40),
    (73.0, 56.0, 0.35),
    (77.0, 59.0, 0.30),
    (77.0, 59.0, 0.30),
    (70.0, 54.0, 0.30),
    (61.0, 48.0, 0.40),
    (52.0, 42.0, 0.45),
    (46.0, 38.0, 0.45),
];

fn condition_label(high_f: f64, precipitation: f64) -> &'static str {
    if high_f < 50.0 {
        "cold"
    } else if precipitation >= 0.45 {
        "rainy"
    } else if high_f >= 75.0 {
        "warm"
    } else {
        "mild"
    }
}

fn packing_tips(condition: &str, precipitation: f64) -> Vec<String> {
    let mut tips: Vec<&str> = match condition {
        "cold" => vec!["Pack warm layers", "Insulated coat, scarf and gloves"],
        "rainy" => vec!["Water-resistant jacket", "Shoes that handle wet pavement"],
        "warm" => vec![
            "Light, breathable clothing",
            "Sunscreen and sunglasses",
            "Refillable water bottle",
        ],
        _ => vec!["Light sweater or jacket for the evenings"],
    };

    if precipitation >= 0.35 {
        tips.push("Compact umbrella");
    }
    tips.push("Comfortable walking shoes");
    tips.into_iter().map(str::to_string).collect()
}

fn to_celsius(fahrenheit: f64) -> f64 {
    ((fahrenheit - 32.0) * 5.0 / 9.0 * 10.0).round() / 10.0
}

/// Forecast for the month the trip starts in
pub fn get_weather_forecast(params: &WeatherParams) -> Result<WeatherForecast> {
    let start = parse_date("start_date", &params.start_date)?;
    let end = parse_date("end_date", &params.end_date)?;

    // Every destination shares the Paris table
    let (high_f, low_f, precipitation) = PARIS_CLIMATE[start.month0() as usize];
    let condition = condition_label(high_f, precipitation);
    let units = params.units.unwrap_or_default();
    let (avg_temp_high, avg_temp_low) = match units {
        TemperatureUnits::Fahrenheit => (high_f, low_f),
        TemperatureUnits::Celsius => (to_celsius(high_f), to_celsius(low_f)),
    };

    let suggested_setting = match condition {
        "cold" | "rainy" => ActivitySetting::Indoor,
        _ => ActivitySetting::Outdoor,
    };

    Ok(WeatherForecast {
        destination: params.destination.clone(),
        start_date: start.to_string(),
        end_date: end.to_string(),
        units,
        forecast: WeatherInfo {
            avg_temp_high,
            avg_temp_low,
            condition: condition.to_string(),
            precipitation_chance: precipitation,
            recommendations: packing_tips(condition, precipitation),
        },
        suggested_setting,
    })
}

#[derive(Debug, Default)]
pub struct WeatherForecastTool;

impl WeatherForecastTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for WeatherForecastTool {
    fn name(&self) -> &'static str {
        "get_weather_forecast"
    }

    fn description(&self) -> &'static str {
        "Get the expected weather for a destination over the travel dates: temperature range, condition, precipitation chance, packing tips and whether indoor or outdoor plans suit better (mock implementation)"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        parameters_schema_for::<WeatherParams>()
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params: WeatherParams = parse_parameters(self.name(), parameters)?;
            let forecast = get_weather_forecast(&params)?;
            Ok(serde_json::to_value(forecast)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: &str) -> WeatherParams {
        WeatherParams {
            destination: "Paris".to_string(),
            start_date: start.to_string(),
            end_date: start.to_string(),
            units: None,
        }
    }

    #[test]
    fn january_is_cold_and_indoor() {
        let forecast = get_weather_forecast(&params("2025-01-10")).unwrap();
        assert_eq!(forecast.forecast.condition, "cold");
        assert_eq!(forecast.forecast.avg_temp_high, 45.0);
        assert_eq!(forecast.forecast.avg_temp_low, 37.0);
        assert_eq!(forecast.forecast.recommendations[0], "Pack warm layers");
        assert_eq!(forecast.suggested_setting, ActivitySetting::Indoor);
    }

    #[test]
    fn july_is_warm_and_outdoor() {
        let forecast = get_weather_forecast(&params("2025-07-14")).unwrap();
        assert_eq!(forecast.forecast.condition, "warm");
        assert_eq!(forecast.suggested_setting, ActivitySetting::Outdoor);
        assert!(!forecast
            .forecast
            .recommendations
            .iter()
            .any(|tip| tip == "Compact umbrella"));
    }

    #[test]
    fn november_is_rainy() {
        let forecast = get_weather_forecast(&params("2025-11-03")).unwrap();
        assert_eq!(forecast.forecast.condition, "rainy");
        assert!(forecast
            .forecast
            .recommendations
            .contains(&"Compact umbrella".to_string()));
    }

    #[test]
    fn celsius_conversion() {
        let mut p = params("2025-01-10");
        p.units = Some(TemperatureUnits::Celsius);
        let forecast = get_weather_forecast(&p).unwrap();
        assert_eq!(forecast.forecast.avg_temp_high, 7.2);
        assert_eq!(forecast.forecast.avg_temp_low, 2.8);
        assert_eq!(forecast.units, TemperatureUnits::Celsius);
    }

    #[tokio::test]
    async fn tool_reports_bad_parameters() {
        let err = WeatherForecastTool::new()
            .execute(serde_json::json!({"destination": "Paris", "start_date": 7}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("get_weather_forecast"));
        assert!(err.to_string().contains("start_date"));
    }
}
