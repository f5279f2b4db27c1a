//! Request parameters for interval-scoped data source calls.

use crate::date_range::Interval;

/// ISO-8601 local instant format used for `start_date` / `end_date`.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Interval plus optional entity filters for a data source request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalQuery {
    pub interval: Interval,
    pub bus_id: Option<String>,
    pub trip_id: Option<String>,
}

impl IntervalQuery {
    /// Create an unfiltered query for `interval`.
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            bus_id: None,
            trip_id: None,
        }
    }

    /// Restrict the query to one bus.
    #[must_use]
    pub fn for_bus(mut self, bus_id: impl Into<String>) -> Self {
        self.bus_id = Some(bus_id.into());
        self
    }

    /// Restrict the query to one trip.
    #[must_use]
    pub fn for_trip(mut self, trip_id: impl Into<String>) -> Self {
        self.trip_id = Some(trip_id.into());
        self
    }

    /// The interval start as an ISO-8601 string.
    #[must_use]
    pub fn start_param(&self) -> String {
        self.interval.start().format(ISO_FORMAT).to_string()
    }

    /// The interval end as an ISO-8601 string.
    #[must_use]
    pub fn end_param(&self) -> String {
        self.interval.end().format(ISO_FORMAT).to_string()
    }

    /// Append the request parameters in order: dates first, then filters.
    pub fn apply(&self, params: &mut Vec<(&'static str, String)>) {
        params.push(("start_date", self.start_param()));
        params.push(("end_date", self.end_param()));
        if let Some(ref bus_id) = self.bus_id {
            params.push(("bus_id", bus_id.clone()));
        }
        if let Some(ref trip_id) = self.trip_id {
            params.push(("trip_id", trip_id.clone()));
        }
    }

    /// Request parameters as a list of key/value pairs.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        self.apply(&mut params);
        params
    }
}
