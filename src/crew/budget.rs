/// Share of the total budget reserved for flights
pub const FLIGHT_SHARE: f64 = 0.40;
/// Share of the total budget spread across hotel nights
pub const HOTEL_SHARE: f64 = 0.35;
/// Share of the total budget left for activities
pub const ACTIVITY_SHARE: f64 = 0.25;

/// Fixed split of a trip budget between the agents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetAllocation {
    pub flights: f64,
    pub hotel_per_night: f64,
    pub activities: f64,
    /// Nights used for the hotel split; never below one
    pub nights: u32,
}

impl BudgetAllocation {
    pub fn allocate(budget: f64, nights: i64) -> Self {
        let nights = nights.clamp(1, i64::from(u32::MAX)) as u32;
        Self {
            flights: budget * FLIGHT_SHARE,
            hotel_per_night: budget * HOTEL_SHARE / f64::from(nights),
            activities: budget * ACTIVITY_SHARE,
            nights,
        }
    }

    pub fn total(&self) -> f64 {
        self.flights + self.hotel_per_night * f64::from(self.nights) + self.activities
    }
}
