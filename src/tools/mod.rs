//! Tool abstractions and the mock travel data providers

pub mod attractions;
pub mod flights;
pub mod function_factory;
pub mod hotels;
pub mod tool;
pub mod weather;

pub use attractions::{search_attractions, AttractionSearchTool};
pub use flights::{search_flights, FlightSearchTool};
pub use function_factory::FunctionFactory;
pub use hotels::{search_hotels, HotelSearchTool};
pub use tool::{Tool, ToolRegistry};
pub use weather::{get_weather_forecast, WeatherForecastTool};
