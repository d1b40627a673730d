//! The four travel specialists.

use crate::{
    config::LlmSettings,
    core::{Agent, Persona},
    tools::{
        AttractionSearchTool, FlightSearchTool, FunctionFactory, HotelSearchTool,
        WeatherForecastTool,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Flight,
    Weather,
    Hotel,
    Attractions,
}

impl AgentRole {
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Flight,
        AgentRole::Weather,
        AgentRole::Hotel,
        AgentRole::Attractions,
    ];

    pub fn persona(self) -> Persona {
        match self {
            AgentRole::Flight => Persona::new(
                "Flight Search Specialist",
                "Find optimal flight options that balance cost, convenience, and travel comfort within the user's budget",
                "You are an experienced travel agent with 15 years of expertise in international flight bookings. You understand airline routes, pricing patterns, layover strategies, and how arrival times shape the rest of a trip. You weigh jet lag, connection times and arrival convenience, and you prioritize value over simply finding the cheapest fare.",
            ),
            AgentRole::Weather => Persona::new(
                "Weather and Packing Advisor",
                "Provide accurate weather forecasts and practical packing recommendations so travelers arrive prepared",
                "You are a meteorologist and travel consultant who helps travelers prepare for conditions at their destination. You know seasonal patterns and microclimates and how weather affects travel activities. You give specific, actionable packing advice and always consider both temperature and precipitation.",
            ),
            AgentRole::Hotel => Persona::new(
                "Accommodation Specialist",
                "Find hotels that match the traveler's budget, preferences, and flight schedule for a comfortable stay",
                "You are a hospitality expert with deep knowledge of accommodations worldwide. You understand how flight arrival times affect check-in logistics, why location relative to attractions matters, and how to balance budget with comfort. You coordinate closely with flight information to keep the journey seamless.",
            ),
            AgentRole::Attractions => Persona::new(
                "Local Activities Curator",
                "Curate attraction recommendations that match traveler preferences, weather conditions, and the remaining budget",
                "You are a destination expert and cultural guide who knows the attractions, restaurants and experiences of major cities. You match activities to traveler profiles, from art lovers to food lovers to history buffs, suggest indoor options on rainy days, and know which sights are worth the time and which are tourist traps.",
            ),
        }
    }

    /// Each role is bound to exactly one data provider
    pub fn function_factory(self) -> FunctionFactory {
        let mut factory = FunctionFactory::new();
        match self {
            AgentRole::Flight => factory.register_tool(FlightSearchTool::new()),
            AgentRole::Weather => factory.register_tool(WeatherForecastTool::new()),
            AgentRole::Hotel => factory.register_tool(HotelSearchTool::new()),
            AgentRole::Attractions => factory.register_tool(AttractionSearchTool::new()),
        }
        factory
    }

    pub fn build_agent(self, settings: &LlmSettings) -> Agent {
        Agent::from_settings(self.persona(), settings, self.function_factory())
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentRole::Flight => "flight",
            AgentRole::Weather => "weather",
            AgentRole::Hotel => "hotel",
            AgentRole::Attractions => "attractions",
        };
        f.write_str(name)
    }
}
