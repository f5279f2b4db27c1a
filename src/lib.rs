//! # Fleet Dashboard
//!
//! Sales reporting for a bus-fleet ticketing operation.
//!
//! This crate provides:
//! - A date-range engine mapping named periods (Today, This Week, Custom, ...)
//!   onto concrete intervals, with back/forward calendar navigation
//! - A data source abstraction with an HTTP/JSON implementation
//! - Metric cards, search and pagination over fetched records
//! - CSV and printable HTML export
//! - A dashboard controller tying navigation to data loading

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod dashboard;
pub mod date_range;
pub mod display;
pub mod error;
pub mod export;
pub mod listing;
pub mod navigation;
pub mod source;
pub mod summary;
pub mod types;

pub use config::Config;
pub use dashboard::{Dashboard, Loaded, Screen, ScreenData};
pub use date_range::{CustomRange, Direction, Interval, RangeSelection};
pub use error::{Error, Result};
pub use navigation::{Clock, FixedClock, NavigationState, SystemClock};
pub use source::{DataSource, IntervalQuery, RestDataSource};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "fleet-dashboard";
