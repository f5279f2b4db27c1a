//! Reporting data source
//!
//! The dashboard never talks to the backend directly: every screen asks a
//! [`DataSource`] for the records of an [`IntervalQuery`]. [`RestDataSource`]
//! is the HTTP/JSON implementation used by the binary.

mod query;
mod rest;
mod sequence;

pub use query::{IntervalQuery, ISO_FORMAT};
pub use rest::RestDataSource;
pub use sequence::FetchSequence;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{BusSummary, FleetSummary, TicketRecord, TripRecord};

/// Aggregated fleet records for a reporting interval.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fleet-wide totals plus per-bus sales rows.
    async fn fleet_summary(&self, query: &IntervalQuery) -> Result<FleetSummary>;

    /// Totals for one bus.
    async fn bus_summary(&self, query: &IntervalQuery, bus_id: &str) -> Result<BusSummary>;

    /// Trips in the interval, optionally restricted to `query.bus_id`.
    async fn trips(&self, query: &IntervalQuery) -> Result<Vec<TripRecord>>;

    /// Tickets in the interval, optionally restricted to `query.trip_id`.
    async fn tickets(&self, query: &IntervalQuery) -> Result<Vec<TicketRecord>>;
}
