pub mod result;
pub mod trip;

pub use result::{RunResult, TokenUsage};
pub use trip::{Attraction, FlightOption, HotelOption, TripPlan, TripRequest, WeatherInfo};
