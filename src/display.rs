//! Display utilities for formatting dashboard output.
//!
//! This module provides shared formatting functions used by the CLI for
//! rendering reporting periods, metric cards and record tables in the
//! terminal.
//!
//! # Functions
//!
//! - [`format_interval`] - Human-readable reporting period
//! - [`format_revenue`] / [`format_count`] - Money and counts with separators
//! - [`truncate`] - Truncate strings to a maximum length with ellipsis
//! - [`make_bar`] - Create visual bar charts for relative values
//! - [`print_section`] / [`print_section_simple`] - Print section headers
//! - [`display_cards`] / [`display_bus_ranking`] / etc. - Display formatted records

use chrono::NaiveDateTime;

use crate::date_range::{Interval, RangeSelection};
use crate::listing::Page;
use crate::summary::MetricCard;
use crate::types::{BusSales, Revenue, TicketRecord, TripRecord};

/// Describe a reporting period.
///
/// Single days render as `Mar 14, 2024`, custom ranges include times
/// (`Jan 01, 2024 09:00 - Jan 03, 2024 17:30`) and every other range renders
/// as `Mar 11 - Mar 17, 2024`.
#[must_use]
pub fn format_interval(selection: &RangeSelection, interval: &Interval) -> String {
    match selection {
        RangeSelection::Today | RangeSelection::Yesterday => {
            interval.start().format("%b %d, %Y").to_string()
        }
        RangeSelection::Custom(_) => format!(
            "{} - {}",
            interval.start().format("%b %d, %Y %H:%M"),
            interval.end().format("%b %d, %Y %H:%M")
        ),
        _ => format!(
            "{} - {}",
            interval.start().format("%b %d"),
            interval.end().format("%b %d, %Y")
        ),
    }
}

/// Group the digits of `value` in thousands: `1234567` -> `1,234,567`.
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a count with thousands separators.
///
/// ```
/// use fleet_dashboard::display::format_count;
///
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(-56), "-56");
/// ```
#[must_use]
pub fn format_count(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(value.unsigned_abs()))
}

/// Format money with a currency symbol, separators and two decimals.
///
/// ```
/// use fleet_dashboard::display::format_revenue;
/// use fleet_dashboard::types::Revenue;
///
/// assert_eq!(format_revenue(Revenue(1234.5), "$"), "$1,234.50");
/// ```
#[must_use]
pub fn format_revenue(revenue: Revenue, currency: &str) -> String {
    let cents = (revenue.get() * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}{currency}{}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn format_instant(instant: Option<NaiveDateTime>) -> String {
    instant.map_or_else(|| "-".to_string(), |t| t.format("%b %d %H:%M").to_string())
}

/// Truncate a string to a maximum length, adding "..." if truncated.
///
/// Handles Unicode characters correctly by counting chars rather than bytes.
/// For `max_len < 3`, truncates without ellipsis since there's no room for "...".
///
/// # Examples
///
/// ```
/// use fleet_dashboard::display::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// assert_eq!(truncate("hello", 2), "he");
/// ```
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len < 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{truncated}...")
    }
}

/// Create a visual bar for displaying relative values.
///
/// Uses Unicode block characters to create a proportional bar chart.
///
/// # Arguments
///
/// * `value` - The value to represent (negative values treated as 0)
/// * `max_value` - The maximum value (determines 100% width)
/// * `width` - The total width of the bar in characters
pub fn make_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }
    let ratio = (value / max_value).clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Print a section header with equals signs.
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {title}");
    println!("{}", "=".repeat(60));
}

/// Print a simple section header with dashes.
pub fn print_section_simple(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Display metric cards, one per line.
pub fn display_cards(cards: &[MetricCard]) {
    for card in cards {
        match card.subtitle {
            Some(ref subtitle) => {
                println!("  {:<22} {:>16}   {}", card.title, card.value, subtitle);
            }
            None => println!("  {:<22} {:>16}", card.title, card.value),
        }
    }
}

/// Display buses ranked by revenue.
pub fn display_bus_ranking(buses: &[BusSales], currency: &str) {
    if buses.is_empty() {
        println!("  No bus sales for this period.");
        return;
    }
    let max_revenue = buses.first().map_or(0.0, |b| b.revenue.get());

    for (i, bus) in buses.iter().enumerate() {
        println!(
            "  {:2}. {:<10} {:<10} {} {:>6} tickets {:>14}",
            i + 1,
            truncate(&bus.bus_id, 10),
            truncate(&bus.plate, 10),
            make_bar(bus.revenue.get(), max_revenue, 15),
            format_count(bus.tickets.get()),
            format_revenue(bus.revenue, currency)
        );
    }
}

fn display_page_footer<T>(page: &Page<T>) {
    if page.total_pages > 1 {
        println!(
            "\n  Page {} of {} ({} records)",
            page.page, page.total_pages, page.total_items
        );
    }
}

/// Display a page of trips.
pub fn display_trips(page: &Page<&TripRecord>, currency: &str) {
    if page.items.is_empty() {
        println!("  No trips found for this period.");
        return;
    }
    println!(
        "  {:<10} {:<8} {:<26} {:<13} {:>8} {:>14}",
        "Trip", "Bus", "Route", "Departure", "Tickets", "Revenue"
    );
    for trip in &page.items {
        println!(
            "  {:<10} {:<8} {:<26} {:<13} {:>8} {:>14}",
            truncate(&trip.trip_id, 10),
            truncate(&trip.bus_id, 8),
            truncate(&trip.route, 26),
            format_instant(trip.departure),
            format_count(trip.tickets_sold.get()),
            format_revenue(trip.revenue, currency)
        );
    }
    display_page_footer(page);
}

/// Display a page of tickets.
pub fn display_tickets(page: &Page<&TicketRecord>, currency: &str) {
    if page.items.is_empty() {
        println!("  No tickets found for this trip.");
        return;
    }
    println!(
        "  {:<12} {:<22} {:<6} {:<10} {:<13} {:>12}",
        "Ticket", "Passenger", "Seat", "Payment", "Issued", "Fare"
    );
    for ticket in &page.items {
        println!(
            "  {:<12} {:<22} {:<6} {:<10} {:<13} {:>12}",
            truncate(&ticket.ticket_id, 12),
            truncate(ticket.passenger.as_deref().unwrap_or("-"), 22),
            truncate(ticket.seat.as_deref().unwrap_or("-"), 6),
            truncate(ticket.payment_method.as_deref().unwrap_or("-"), 10),
            format_instant(ticket.issued_at),
            format_revenue(ticket.fare, currency)
        );
    }
    display_page_footer(page);
}
