//! Plain-text rendering of a trip plan.

use crate::types::TripPlan;

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_section(out: &mut String, title: &str, empty: bool, empty_note: &str) {
    push_line(out, &format!("\n== {title} =="));
    if empty {
        push_line(out, &format!("  {empty_note}"));
    }
}

pub fn render_plan(plan: &TripPlan) -> String {
    let mut out = String::new();

    push_line(&mut out, &format!("Trip to {} ({})", plan.destination, plan.dates));
    push_line(
        &mut out,
        &format!("Estimated total cost: ${:.2}", plan.total_estimated_cost),
    );

    push_section(&mut out, "Flights", plan.flights.is_empty(), "No flights in this plan");
    for flight in &plan.flights {
        push_line(
            &mut out,
            &format!(
                "  {} {}: departs {}, arrives {}, {:.1}h, ${:.2}",
                flight.airline,
                flight.flight_number,
                flight.departure_time,
                flight.arrival_time,
                flight.duration_hours,
                flight.price
            ),
        );
    }

    push_section(&mut out, "Hotels", plan.hotels.is_empty(), "No hotels in this plan");
    for hotel in &plan.hotels {
        push_line(
            &mut out,
            &format!(
                "  {} ({}) ${:.2}/night, rated {:.1}",
                hotel.name, hotel.location, hotel.price_per_night, hotel.rating
            ),
        );
        if let Some(notes) = &hotel.notes {
            push_line(&mut out, &format!("    {notes}"));
        }
    }

    let weather = &plan.weather;
    push_line(&mut out, "\n== Weather ==");
    push_line(
        &mut out,
        &format!(
            "  {}: {:.0}°F / {:.0}°F, {:.0}% chance of precipitation",
            weather.condition,
            weather.avg_temp_high,
            weather.avg_temp_low,
            weather.precipitation_chance * 100.0
        ),
    );
    for tip in &weather.recommendations {
        push_line(&mut out, &format!("  - {tip}"));
    }

    push_section(
        &mut out,
        "Attractions",
        plan.attractions.is_empty(),
        "No attractions in this plan",
    );
    for attraction in &plan.attractions {
        let setting = if attraction.indoor { "indoor" } else { "outdoor" };
        push_line(
            &mut out,
            &format!(
                "  {} [{}, {}] {:.1}h, ${:.2}",
                attraction.name,
                attraction.category,
                setting,
                attraction.estimated_time_hours,
                attraction.cost
            ),
        );
    }

    push_line(&mut out, "\n== Summary ==");
    out.push_str(plan.reasoning_summary.trim());

    out
}
