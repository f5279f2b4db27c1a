//! Dashboard controller.
//!
//! Owns the navigation state of the active screen and reloads the screen's
//! records whenever the interval changes. Fetch failures never surface as
//! errors here: they are logged and the screen shows an empty result.

use tracing::{debug, info, warn};

use crate::date_range::{CustomRange, Interval, RangeSelection};
use crate::error::Result;
use crate::navigation::{Clock, NavigationState};
use crate::source::{DataSource, FetchSequence, IntervalQuery};
use crate::types::{BusSummary, FleetSummary, TicketRecord, TripRecord};

/// A dashboard screen and the entity it is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Fleet,
    Bus(String),
    Trips { bus_id: Option<String> },
    Tickets(String),
}

impl Screen {
    /// Short name used for export file names.
    #[must_use]
    pub const fn stem(&self) -> &'static str {
        match self {
            Self::Fleet => "fleet",
            Self::Bus(_) => "bus",
            Self::Trips { .. } => "trips",
            Self::Tickets(_) => "tickets",
        }
    }
}

/// Records shown on a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenData {
    Fleet(FleetSummary),
    Bus(BusSummary, Vec<TripRecord>),
    Trips(Vec<TripRecord>),
    Tickets(Vec<TicketRecord>),
}

/// Result of loading a screen for one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    /// Fetch ticket; see [`Dashboard::is_current`].
    pub sequence: u64,
    /// Display string of the interval.
    pub range: String,
    pub interval: Interval,
    pub view: ScreenData,
}

pub struct Dashboard<S, C> {
    source: S,
    clock: C,
    state: NavigationState,
    sequence: FetchSequence,
}

impl<S: DataSource, C: Clock> Dashboard<S, C> {
    /// A dashboard showing Today.
    pub fn new(source: S, clock: C) -> Self {
        let state = NavigationState::new(clock.now());
        Self::with_state(source, clock, state)
    }

    /// A dashboard starting from an existing navigation state.
    pub fn with_state(source: S, clock: C, state: NavigationState) -> Self {
        Self {
            source,
            clock,
            state,
            sequence: FetchSequence::new(),
        }
    }

    pub const fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn select(&mut self, selection: RangeSelection) -> Result<()> {
        self.state = NavigationState::select(selection, self.clock.now())?;
        Ok(())
    }

    pub fn apply_custom(&mut self, custom: CustomRange) -> Result<()> {
        self.state = NavigationState::apply_custom(custom, self.clock.now())?;
        Ok(())
    }

    pub fn back(&mut self) -> Result<()> {
        self.state = self.state.back(self.clock.now())?;
        Ok(())
    }

    /// Step forward if allowed. Returns whether the interval changed.
    pub fn forward(&mut self) -> Result<bool> {
        match self.state.forward(self.clock.now())? {
            Some(next) => {
                self.state = next;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.can_go_forward(self.clock.now())
    }

    /// Whether [`Self::forward`] would change the interval.
    pub fn has_next(&self) -> bool {
        self.state.has_next(self.clock.now())
    }

    /// Fetch the records of `screen` for the current interval.
    pub async fn load(&self, screen: &Screen) -> Loaded {
        let sequence = self.sequence.begin();
        let interval = self.state.interval();
        let range = self.state.display_range();
        let query = IntervalQuery::new(interval);
        debug!(sequence, ?screen, %range, "Loading screen");

        let view = match screen {
            Screen::Fleet => ScreenData::Fleet(or_empty(
                self.source.fleet_summary(&query).await,
                "fleet summary",
            )),
            Screen::Bus(bus_id) => {
                let trips_query = query.clone().for_bus(bus_id.as_str());
                let (summary, trips) = tokio::join!(
                    self.source.bus_summary(&query, bus_id),
                    self.source.trips(&trips_query)
                );
                ScreenData::Bus(
                    or_empty(summary, "bus summary"),
                    or_empty(trips, "bus trips"),
                )
            }
            Screen::Trips { bus_id } => {
                let query = match bus_id {
                    Some(bus_id) => query.for_bus(bus_id.as_str()),
                    None => query,
                };
                ScreenData::Trips(or_empty(self.source.trips(&query).await, "trips"))
            }
            Screen::Tickets(trip_id) => {
                let query = query.for_trip(trip_id.as_str());
                ScreenData::Tickets(or_empty(self.source.tickets(&query).await, "tickets"))
            }
        };

        info!(sequence, screen = screen.stem(), %range, "Loaded screen");
        Loaded {
            sequence,
            range,
            interval,
            view,
        }
    }

    /// Whether `loaded` is the result of the most recent load.
    ///
    /// Older results must be discarded so a slow response cannot replace
    /// the records of a newer interval.
    pub fn is_current(&self, loaded: &Loaded) -> bool {
        self.sequence.is_current(loaded.sequence)
    }
}

fn or_empty<T: Default>(result: Result<T>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, what, "Fetch failed, showing empty result");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::navigation::FixedClock;
    use crate::types::{Revenue, TicketCount, TripCount};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubSource {
        fail: bool,
        queries: Mutex<Vec<IntervalQuery>>,
    }

    impl StubSource {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn record(&self, query: &IntervalQuery) -> Result<()> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail {
                Err(Error::other("backend unavailable"))
            } else {
                Ok(())
            }
        }

        fn queries(&self) -> Vec<IntervalQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DataSource for StubSource {
        async fn fleet_summary(&self, query: &IntervalQuery) -> Result<FleetSummary> {
            self.record(query)?;
            Ok(FleetSummary {
                total_tickets: TicketCount(10),
                total_revenue: Revenue(75.0),
                ..FleetSummary::default()
            })
        }

        async fn bus_summary(&self, query: &IntervalQuery, bus_id: &str) -> Result<BusSummary> {
            self.record(query)?;
            Ok(BusSummary {
                bus_id: bus_id.to_string(),
                total_trips: TripCount(1),
                ..BusSummary::default()
            })
        }

        async fn trips(&self, query: &IntervalQuery) -> Result<Vec<TripRecord>> {
            self.record(query)?;
            Ok(vec![TripRecord {
                trip_id: "T1".to_string(),
                bus_id: query.bus_id.clone().unwrap_or_default(),
                ..TripRecord::default()
            }])
        }

        async fn tickets(&self, query: &IntervalQuery) -> Result<Vec<TicketRecord>> {
            self.record(query)?;
            Ok(vec![TicketRecord {
                ticket_id: "K1".to_string(),
                trip_id: query.trip_id.clone().unwrap_or_default(),
                ..TicketRecord::default()
            }])
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn dashboard(source: StubSource) -> Dashboard<StubSource, FixedClock> {
        Dashboard::new(source, FixedClock(now()))
    }

    #[test]
    fn test_starts_on_today() {
        let dash = dashboard(StubSource::default());
        assert_eq!(dash.state().selection(), &RangeSelection::Today);
        assert!(!dash.can_go_forward());
    }

    #[test]
    fn test_navigation_updates_state() {
        let mut dash = dashboard(StubSource::default());
        dash.select(RangeSelection::Yesterday).unwrap();
        assert!(dash.can_go_forward());
        assert!(dash.has_next());
        assert!(dash.forward().unwrap());
        assert_eq!(dash.state().interval(), Interval::day(now().date()));
        assert!(!dash.has_next());
        assert!(!dash.forward().unwrap());

        dash.back().unwrap();
        assert_eq!(
            dash.state().interval(),
            Interval::day(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap())
        );
    }

    #[test]
    fn test_apply_custom_rejects_inverted_range() {
        let mut dash = dashboard(StubSource::default());
        let custom = CustomRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        assert!(matches!(
            dash.apply_custom(custom),
            Err(Error::InvalidDateRange { .. })
        ));
        assert_eq!(dash.state().selection(), &RangeSelection::Today);
    }

    #[test]
    fn test_clamped_month_has_no_next() {
        let mut dash = dashboard(StubSource::default());
        dash.select(RangeSelection::ThisMonth).unwrap();
        dash.back().unwrap();
        assert!(dash.forward().unwrap());
        assert_eq!(dash.state().interval().end(), now());

        assert!(dash.can_go_forward());
        assert!(!dash.has_next());
        assert!(!dash.forward().unwrap());
    }

    #[tokio::test]
    async fn test_load_fleet() {
        let dash = dashboard(StubSource::default());
        let loaded = dash.load(&Screen::Fleet).await;
        assert_eq!(loaded.range, "Mar 15, 2024");
        assert_eq!(loaded.interval, Interval::day(now().date()));
        match loaded.view {
            ScreenData::Fleet(summary) => assert_eq!(summary.total_tickets, TicketCount(10)),
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_bus_scopes_trips() {
        let source = StubSource::default();
        let dash = dashboard(source);
        let loaded = dash.load(&Screen::Bus("B7".to_string())).await;
        match loaded.view {
            ScreenData::Bus(summary, trips) => {
                assert_eq!(summary.bus_id, "B7");
                assert_eq!(trips[0].bus_id, "B7");
            }
            other => panic!("unexpected view {other:?}"),
        }
        let queries = dash.source.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().any(|q| q.bus_id.is_none()));
        assert!(queries.iter().any(|q| q.bus_id.as_deref() == Some("B7")));
    }

    #[tokio::test]
    async fn test_load_tickets_for_trip() {
        let dash = dashboard(StubSource::default());
        let loaded = dash.load(&Screen::Tickets("T9".to_string())).await;
        assert_eq!(
            loaded.view,
            ScreenData::Tickets(vec![TicketRecord {
                ticket_id: "K1".to_string(),
                trip_id: "T9".to_string(),
                ..TicketRecord::default()
            }])
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_shows_empty() {
        let dash = dashboard(StubSource::failing());
        let loaded = dash.load(&Screen::Trips { bus_id: None }).await;
        assert_eq!(loaded.view, ScreenData::Trips(Vec::new()));

        let loaded = dash.load(&Screen::Bus("B1".to_string())).await;
        assert_eq!(
            loaded.view,
            ScreenData::Bus(BusSummary::default(), Vec::new())
        );
    }

    #[tokio::test]
    async fn test_only_latest_load_is_current() {
        let mut dash = dashboard(StubSource::default());
        let first = dash.load(&Screen::Fleet).await;
        assert!(dash.is_current(&first));

        dash.back().unwrap();
        let second = dash.load(&Screen::Fleet).await;
        assert!(!dash.is_current(&first));
        assert!(dash.is_current(&second));
        assert_ne!(first.interval, second.interval);
    }
}
