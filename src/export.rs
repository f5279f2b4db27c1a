//! CSV and printable HTML export of the loaded record set.
//!
//! Exports only see records that were already fetched plus the display
//! string of the interval they cover. CSV goes through the `csv` writer so
//! quoting is handled for us; HTML is rendered with `maud`, which escapes
//! every interpolated value.

use std::path::Path;

use chrono::NaiveDateTime;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use tracing::info;

use crate::date_range::Interval;
use crate::display::format_revenue;
use crate::error::{Error, Result};
use crate::types::{BusSales, Revenue, TicketRecord, TripRecord};

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

/// Header information printed at the top of an HTML report.
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    pub title: &'a str,
    /// Human-readable interval, as shown on screen.
    pub range: &'a str,
    pub generated_at: NaiveDateTime,
    pub currency: &'a str,
}

const PRINT_CSS: &str = r"
body { font-family: Helvetica, Arial, sans-serif; margin: 24px; color: #222; }
h1 { font-size: 20px; margin-bottom: 4px; }
.meta { color: #666; font-size: 12px; margin: 0 0 16px; }
table { border-collapse: collapse; width: 100%; font-size: 12px; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }
th { background: #f2f2f2; }
tr:nth-child(even) td { background: #fafafa; }
@media print {
  body { margin: 0; }
  thead { display: table-header-group; }
  tr { page-break-inside: avoid; }
}
";

struct Table {
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

impl Table {
    fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::other(format!("failed to flush CSV: {e}")))?;
        String::from_utf8(bytes).map_err(|e| Error::other(format!("CSV is not UTF-8: {e}")))
    }

    fn to_html(&self, header: &ReportHeader<'_>) -> String {
        document(header, self).into_string()
    }
}

fn document(header: &ReportHeader<'_>, table: &Table) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (header.title) " - " (header.range) }
                style { (PreEscaped(PRINT_CSS)) }
            }
            body {
                h1 { (header.title) }
                p.meta {
                    "Period: " (header.range)
                    br;
                    "Generated: " (header.generated_at.format("%b %d, %Y %H:%M").to_string())
                }
                table {
                    thead {
                        tr {
                            @for name in table.headers {
                                th { (name) }
                            }
                        }
                    }
                    tbody {
                        @if table.rows.is_empty() {
                            tr {
                                td colspan=(table.headers.len()) { "No records for this period." }
                            }
                        }
                        @for row in &table.rows {
                            tr {
                                @for cell in row {
                                    td { (cell) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn instant(value: Option<NaiveDateTime>) -> String {
    value.map(|t| t.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_default()
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn trip_table(trips: &[TripRecord], money: impl Fn(Revenue) -> String) -> Table {
    Table {
        headers: &["Trip", "Bus", "Route", "Departure", "Arrival", "Tickets", "Revenue"],
        rows: trips
            .iter()
            .map(|trip| {
                vec![
                    trip.trip_id.clone(),
                    trip.bus_id.clone(),
                    trip.route.clone(),
                    instant(trip.departure),
                    instant(trip.arrival),
                    trip.tickets_sold.to_string(),
                    money(trip.revenue),
                ]
            })
            .collect(),
    }
}

fn ticket_table(tickets: &[TicketRecord], money: impl Fn(Revenue) -> String) -> Table {
    Table {
        headers: &["Ticket", "Trip", "Passenger", "Seat", "Fare", "Payment", "Issued"],
        rows: tickets
            .iter()
            .map(|ticket| {
                vec![
                    ticket.ticket_id.clone(),
                    ticket.trip_id.clone(),
                    text(ticket.passenger.as_ref()),
                    text(ticket.seat.as_ref()),
                    money(ticket.fare),
                    text(ticket.payment_method.as_ref()),
                    instant(ticket.issued_at),
                ]
            })
            .collect(),
    }
}

fn bus_table(buses: &[BusSales], money: impl Fn(Revenue) -> String) -> Table {
    Table {
        headers: &["Rank", "Bus", "Plate", "Trips", "Tickets", "Revenue"],
        rows: buses
            .iter()
            .enumerate()
            .map(|(i, bus)| {
                vec![
                    (i + 1).to_string(),
                    bus.bus_id.clone(),
                    bus.plate.clone(),
                    bus.trips.to_string(),
                    bus.tickets.to_string(),
                    money(bus.revenue),
                ]
            })
            .collect(),
    }
}

// CSV keeps money as a plain decimal so spreadsheets can sum it.
fn plain(revenue: Revenue) -> String {
    revenue.to_string()
}

pub fn trips_csv(trips: &[TripRecord]) -> Result<String> {
    trip_table(trips, plain).to_csv()
}

pub fn tickets_csv(tickets: &[TicketRecord]) -> Result<String> {
    ticket_table(tickets, plain).to_csv()
}

/// Ranked bus sales; the rank column follows slice order.
pub fn buses_csv(buses: &[BusSales]) -> Result<String> {
    bus_table(buses, plain).to_csv()
}

#[must_use]
pub fn trips_html(trips: &[TripRecord], header: &ReportHeader<'_>) -> String {
    trip_table(trips, |r| format_revenue(r, header.currency)).to_html(header)
}

#[must_use]
pub fn tickets_html(tickets: &[TicketRecord], header: &ReportHeader<'_>) -> String {
    ticket_table(tickets, |r| format_revenue(r, header.currency)).to_html(header)
}

#[must_use]
pub fn buses_html(buses: &[BusSales], header: &ReportHeader<'_>) -> String {
    bus_table(buses, |r| format_revenue(r, header.currency)).to_html(header)
}

/// File name for an export, e.g. `trips_2024-03-14_2024-03-14.csv`.
#[must_use]
pub fn default_file_name(stem: &str, format: ExportFormat, interval: &Interval) -> String {
    format!(
        "{stem}_{}_{}.{}",
        interval.start().format("%Y-%m-%d"),
        interval.end().format("%Y-%m-%d"),
        format.extension()
    )
}

/// Write an export, creating parent directories as needed.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    info!(path = %path.display(), bytes = contents.len(), "Wrote export");
    Ok(())
}
