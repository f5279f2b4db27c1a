//! Domain types for fleet reporting records.
//!
//! Counts and money are strongly-typed wrappers so ticket counts, trip counts
//! and revenue cannot be mixed up. Uses `derive_more` for the arithmetic
//! boilerplate. Record structs mirror the JSON returned by the reporting
//! backend; missing fields fall back to their defaults.

use std::fmt;
use std::iter::Sum;
use std::ops::AddAssign;

use chrono::NaiveDateTime;
use derive_more::{Add as DeriveAdd, From, Into};
use serde::{Deserialize, Serialize};

// ============================================================================
// Macros for reducing boilerplate
// ============================================================================

/// Generates common methods and traits for integer count newtypes.
macro_rules! impl_count {
    ($type:ty) => {
        impl $type {
            /// Create a new instance.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the inner value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }

            /// Check if the value is zero.
            #[must_use]
            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, value| acc + value)
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ============================================================================
// Counts
// ============================================================================

/// Number of tickets sold.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveAdd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct TicketCount(pub i64);

impl_count!(TicketCount);

/// Number of trips run.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveAdd,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct TripCount(pub i64);

impl_count!(TripCount);

// ============================================================================
// Revenue
// ============================================================================

/// An amount of money in the fleet's currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, DeriveAdd, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revenue(pub f64);

impl Revenue {
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Average amount per item, or zero when there are no items.
    #[must_use]
    pub fn per(self, count: i64) -> Self {
        if count == 0 {
            Self::default()
        } else {
            Self(self.0 / count as f64)
        }
    }
}

impl AddAssign for Revenue {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sum for Revenue {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, value| acc + value)
    }
}

impl fmt::Display for Revenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// ============================================================================
// Records
// ============================================================================

/// Sales for one bus within a fleet summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSales {
    pub bus_id: String,
    /// Registration plate.
    pub plate: String,
    pub trips: TripCount,
    pub tickets: TicketCount,
    pub revenue: Revenue,
}

/// Fleet-wide sales totals for an interval.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetSummary {
    pub total_trips: TripCount,
    pub total_tickets: TicketCount,
    pub total_revenue: Revenue,
    /// Buses with at least one trip in the interval.
    pub active_buses: i64,
    pub buses: Vec<BusSales>,
}

/// Sales totals for a single bus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSummary {
    pub bus_id: String,
    pub plate: String,
    pub total_trips: TripCount,
    pub total_tickets: TicketCount,
    pub total_revenue: Revenue,
}

/// One scheduled trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripRecord {
    pub trip_id: String,
    pub bus_id: String,
    /// Route name, e.g. "Central - Airport".
    pub route: String,
    pub departure: Option<NaiveDateTime>,
    pub arrival: Option<NaiveDateTime>,
    pub tickets_sold: TicketCount,
    pub revenue: Revenue,
}

/// One ticket sold on a trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketRecord {
    pub ticket_id: String,
    pub trip_id: String,
    pub passenger: Option<String>,
    pub seat: Option<String>,
    pub fare: Revenue,
    pub payment_method: Option<String>,
    pub issued_at: Option<NaiveDateTime>,
}
