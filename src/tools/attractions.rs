//! Mock attraction curation with weather and preference adaptation.

use super::{
    tool::{parameters_schema_for, parse_parameters, ToolFuture},
    Tool,
};
use crate::types::Attraction;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACTIVITY_BUDGET: f64 = 500.0;
pub const MAX_ATTRACTIONS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AttractionSearchParams {
    /// Target city/country
    pub destination: String,
    /// Comma-separated preferences, e.g. "museums, food, history"
    #[serde(default)]
    pub preferences: Option<String>,
    /// Expected weather condition, used to favour indoor activities
    #[serde(default)]
    pub weather_condition: Option<String>,
    /// Remaining budget for activities in USD (default 500)
    #[serde(default)]
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionSearch {
    pub destination: String,
    pub attractions: Vec<Attraction>,
    pub total_options: usize,
    pub weather_adapted: bool,
    pub preferences_applied: bool,
}

struct AttractionTemplate {
    name: &'static str,
    category: &'static str,
    estimated_time_hours: f64,
    cost: f64,
    indoor: bool,
    description: &'static str,
}

const PARIS_ATTRACTIONS: [AttractionTemplate; 6] = [
    AttractionTemplate {
        name: "Louvre Museum",
        category: "museum",
        estimated_time_hours: 3.5,
        cost: 17.0,
        indoor: true,
        description: "World's largest art museum, home to Mona Lisa and Venus de Milo. Perfect for rainy days.",
    },
    AttractionTemplate {
        name: "Musée d'Orsay",
        category: "museum",
        estimated_time_hours: 2.5,
        cost: 16.0,
        indoor: true,
        description: "Impressionist masterpieces in a stunning Beaux-Arts railway station.",
    },
    AttractionTemplate {
        name: "Le Marais Food Tour",
        category: "food experience",
        estimated_time_hours: 3.0,
        cost: 85.0,
        indoor: false,
        description: "Guided walking tour through historic district with stops at bakeries, cheese shops, and cafes.",
    },
    AttractionTemplate {
        name: "Eiffel Tower",
        category: "landmark",
        estimated_time_hours: 2.0,
        cost: 28.0,
        indoor: false,
        description: "Iconic Parisian landmark with breathtaking city views. Best on clear days.",
    },
    AttractionTemplate {
        name: "Seine River Dinner Cruise",
        category: "dining",
        estimated_time_hours: 2.5,
        cost: 95.0,
        indoor: true,
        description: "Elegant dinner cruise past illuminated monuments. Weather-independent.",
    },
    AttractionTemplate {
        name: "Versailles Palace",
        category: "historical site",
        estimated_time_hours: 4.0,
        cost: 20.0,
        indoor: true,
        description: "Opulent royal château with famous Hall of Mirrors and extensive gardens.",
    },
];

impl AttractionTemplate {
    fn to_attraction(&self) -> Attraction {
        Attraction {
            name: self.name.to_string(),
            category: self.category.to_string(),
            estimated_time_hours: self.estimated_time_hours,
            cost: self.cost,
            indoor: self.indoor,
            description: self.description.to_string(),
        }
    }

    fn matches_any(&self, tags: &[String]) -> bool {
        let category = self.category.to_lowercase();
        let description = self.description.to_lowercase();
        tags.iter()
            .any(|tag| category.contains(tag.as_str()) || description.contains(tag.as_str()))
    }
}

/// Rain or cold pushes indoor attractions to the front
pub fn favours_indoor(weather_condition: &str) -> bool {
    let condition = weather_condition.to_lowercase();
    condition.contains("rain") || condition.contains("cold")
}

/// Curate attractions for a destination.
///
/// Order of operations: weather reordering (indoor first, then cheapest),
/// preference filtering (skipped if it would leave nothing), then the budget
/// ceiling and the [`MAX_ATTRACTIONS`] cap.
pub fn search_attractions(params: &AttractionSearchParams) -> AttractionSearch {
    let preferences = params.preferences.as_deref().unwrap_or_default();
    let weather_condition = params.weather_condition.as_deref().unwrap_or_default();
    let budget = params.budget.unwrap_or(DEFAULT_ACTIVITY_BUDGET);

    // Every destination shares the Paris catalogue
    let mut candidates: Vec<&AttractionTemplate> = PARIS_ATTRACTIONS.iter().collect();

    if favours_indoor(weather_condition) {
        candidates.sort_by(|a, b| {
            (!a.indoor)
                .cmp(&!b.indoor)
                .then(a.cost.total_cmp(&b.cost))
        });
    }

    let tags: Vec<String> = preferences
        .to_lowercase()
        .split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    if !tags.is_empty() {
        let filtered: Vec<&AttractionTemplate> = candidates
            .iter()
            .copied()
            .filter(|attraction| attraction.matches_any(&tags))
            .collect();
        if !filtered.is_empty() {
            candidates = filtered;
        }
    }

    let attractions: Vec<Attraction> = candidates
        .into_iter()
        .filter(|attraction| attraction.cost <= budget)
        .take(MAX_ATTRACTIONS)
        .map(AttractionTemplate::to_attraction)
        .collect();

    AttractionSearch {
        destination: params.destination.clone(),
        total_options: attractions.len(),
        attractions,
        weather_adapted: !weather_condition.trim().is_empty(),
        preferences_applied: !preferences.trim().is_empty(),
    }
}

#[derive(Debug, Default)]
pub struct AttractionSearchTool;

impl AttractionSearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for AttractionSearchTool {
    fn name(&self) -> &'static str {
        "search_attractions"
    }

    fn description(&self) -> &'static str {
        "Search for attractions and activities in a destination, filtered by preferences and budget and adapted to the expected weather (indoor first when rainy or cold)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        parameters_schema_for::<AttractionSearchParams>()
    }

    fn execute(&self, parameters: serde_json::Value) -> ToolFuture<'_> {
        Box::pin(async move {
            let params: AttractionSearchParams = parse_parameters(self.name(), parameters)?;
            Ok(serde_json::to_value(search_attractions(&params))?)
        })
    }
}
