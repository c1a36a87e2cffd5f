//! Plain-text rendering of the calendar grids and price breakdowns.
//!
//! This is one interchangeable consumer of the engine's data structures;
//! nothing in here feeds back into grid computation, and a DOM or widget
//! renderer can replace it without touching the engine.

use std::fmt::Write as _;

use chrono::Datelike;
use shared::{PriceQuote, Reservation};

use crate::app::AvailabilityOutcome;
use crate::domain::calendar::{DayGrid, MonthGrid, WeekGrid};

const WEEKDAY_HEADER: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Render a month grid as a 7-column table.
///
/// Day numbers outside the focus month are parenthesized; `*` marks today,
/// `(n)` the number of reservations, `+` a bookable empty day.
pub fn month_to_text(grid: &MonthGrid, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(
        out,
        "{}",
        WEEKDAY_HEADER
            .iter()
            .map(|day| format!("{:>8}", day))
            .collect::<String>()
    );

    for week in grid.weeks() {
        let mut line = String::new();
        for cell in week {
            let day = if cell.in_focus_month {
                format!("{:>2}", cell.date.day())
            } else {
                format!("({:>2})", cell.date.day())
            };
            let marker = if cell.is_today { "*" } else { "" };
            let load = if !cell.reservations.is_empty() {
                format!("({})", cell.reservations.len())
            } else if cell.available {
                "+".to_string()
            } else {
                String::new()
            };
            let _ = write!(line, "{:>8}", format!("{}{}{}", day, marker, load));
        }
        let _ = writeln!(out, "{}", line);
    }

    out
}

/// Render a week grid as hour rows by day columns; cells show the
/// reservation count or `+` for a free slot
pub fn week_to_text(grid: &WeekGrid, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);

    let mut header = String::from("     ");
    for offset in 0..7 {
        let date = grid.week_start + chrono::Duration::days(offset);
        let _ = write!(header, "{:>7}", date.format("%d/%m").to_string());
    }
    let _ = writeln!(out, "{}", header);

    for row in &grid.rows {
        let mut line = format!("{:02}:00", row.hour);
        for slot in &row.slots {
            let cell = if !slot.reservations.is_empty() {
                format!("{}", slot.reservations.len())
            } else {
                "+".to_string()
            };
            let _ = write!(line, "{:>7}", cell);
        }
        let _ = writeln!(out, "{}", line);
    }

    out
}

/// Render a day grid, one labelled line per reservation
pub fn day_to_text(
    grid: &DayGrid,
    title: &str,
    label: impl Fn(&Reservation) -> String,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);

    for slot in &grid.rows {
        if slot.reservations.is_empty() {
            let _ = writeln!(out, "{:02}:00  (free)", slot.hour);
        } else {
            let _ = writeln!(out, "{:02}:00", slot.hour);
            for reservation in &slot.reservations {
                let _ = writeln!(out, "       {}", label(reservation));
            }
        }
    }

    out
}

/// Render a price breakdown: base price, every applied rule with its
/// discount or surcharge, and the final price
pub fn quote_to_text(quote: &PriceQuote) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Base price:  {:>10.2}", quote.base_price);

    for rule in &quote.applied_rules {
        let amount = if rule.discount > 0.0 {
            format!("-{:.2}", rule.discount)
        } else {
            format!("+{:.2}", rule.surcharge)
        };
        let _ = writeln!(out, "  {} ({}): {}", rule.name, rule.modifier_kind, amount);
    }

    if quote.total_discount > 0.0 {
        let _ = writeln!(out, "Discounts:   {:>10.2}", -quote.total_discount);
    }
    if quote.total_surcharge > 0.0 {
        let _ = writeln!(out, "Surcharges:  {:>10.2}", quote.total_surcharge);
    }
    let _ = writeln!(out, "Final price: {:>10.2}", quote.final_price);

    out
}

/// Render an availability outcome for a requested date
pub fn availability_to_text(outcome: &AvailabilityOutcome, requested: &str) -> String {
    let mut out = String::new();
    match outcome {
        AvailabilityOutcome::Available(slots) => {
            let _ = writeln!(out, "Free slots on {}:", requested);
            for slot in slots {
                let price = slot
                    .price
                    .map(|price| format!("  ({:.2})", price))
                    .unwrap_or_default();
                let _ = writeln!(out, "  {} - {}{}", slot.start, slot.end, price);
            }
        }
        AvailabilityOutcome::Suggestions(suggestions) if suggestions.is_empty() => {
            let _ = writeln!(out, "No availability on {} or nearby dates.", requested);
        }
        AvailabilityOutcome::Suggestions(suggestions) => {
            let _ = writeln!(out, "{} is fully booked. Closest alternatives:", requested);
            for suggestion in suggestions {
                let _ = writeln!(
                    out,
                    "  {} ({} day(s) away, {} free slot(s))",
                    suggestion.date,
                    suggestion.days_from_requested,
                    suggestion.slots.len()
                );
            }
        }
    }
    out
}
