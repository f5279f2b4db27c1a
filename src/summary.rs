//! Metric cards and rankings derived from fetched records.
//!
//! Everything here is a pure transform of data already returned by the
//! data source; nothing is fetched. Averages over zero items are zero.

use std::cmp::Ordering;

use crate::display::{format_count, format_revenue};
use crate::types::{BusSales, BusSummary, FleetSummary, Revenue, TicketCount, TicketRecord, TripRecord};

/// One headline figure on a dashboard screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub subtitle: Option<String>,
}

impl MetricCard {
    fn new(title: &'static str, value: String) -> Self {
        Self {
            title,
            value,
            subtitle: None,
        }
    }

    fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Average of `total` over `count`, or zero when `count` is zero.
fn ratio(total: i64, count: i64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Cards for the fleet overview screen.
#[must_use]
pub fn fleet_cards(summary: &FleetSummary, currency: &str) -> Vec<MetricCard> {
    vec![
        MetricCard::new(
            "Total Revenue",
            format_revenue(summary.total_revenue, currency),
        ),
        MetricCard::new("Tickets Sold", format_count(summary.total_tickets.get())),
        MetricCard::new("Trips", format_count(summary.total_trips.get())),
        MetricCard::new("Active Buses", format_count(summary.active_buses)),
        MetricCard::new(
            "Avg. Fare",
            format_revenue(
                summary.total_revenue.per(summary.total_tickets.get()),
                currency,
            ),
        ),
    ]
}

/// Cards for a single bus.
#[must_use]
pub fn bus_cards(summary: &BusSummary, trips: &[TripRecord], currency: &str) -> Vec<MetricCard> {
    let mut revenue = MetricCard::new("Revenue", format_revenue(summary.total_revenue, currency));
    if !summary.plate.is_empty() {
        revenue = revenue.with_subtitle(summary.plate.clone());
    }
    let busiest = busiest_trip(trips).filter(|trip| !trip.tickets_sold.is_zero());

    let mut cards = vec![
        revenue,
        MetricCard::new("Tickets Sold", format_count(summary.total_tickets.get())),
        MetricCard::new("Trips", format_count(summary.total_trips.get())),
        MetricCard::new(
            "Avg. Tickets / Trip",
            format!(
                "{:.1}",
                ratio(summary.total_tickets.get(), summary.total_trips.get())
            ),
        ),
    ];
    if let Some(trip) = busiest {
        cards.push(
            MetricCard::new("Busiest Trip", format_count(trip.tickets_sold.get()))
                .with_subtitle(trip.route.clone()),
        );
    }
    cards
}

/// Cards for a trip listing, computed from the listed trips.
#[must_use]
pub fn trip_cards(trips: &[TripRecord], currency: &str) -> Vec<MetricCard> {
    let tickets: TicketCount = trips.iter().map(|t| t.tickets_sold).sum();
    let revenue: Revenue = trips.iter().map(|t| t.revenue).sum();
    let count = trips.len() as i64;

    vec![
        MetricCard::new("Trips", format_count(count)),
        MetricCard::new("Tickets Sold", format_count(tickets.get())),
        MetricCard::new("Revenue", format_revenue(revenue, currency)),
        MetricCard::new(
            "Avg. Tickets / Trip",
            format!("{:.1}", ratio(tickets.get(), count)),
        ),
    ]
}

/// Cards for a ticket listing.
#[must_use]
pub fn ticket_cards(tickets: &[TicketRecord], currency: &str) -> Vec<MetricCard> {
    let revenue: Revenue = tickets.iter().map(|t| t.fare).sum();
    let count = tickets.len() as i64;

    let mut cards = vec![
        MetricCard::new("Tickets", format_count(count)),
        MetricCard::new("Revenue", format_revenue(revenue, currency)),
        MetricCard::new("Avg. Fare", format_revenue(revenue.per(count), currency)),
    ];
    if let Some((method, used)) = top_payment_method(tickets) {
        cards.push(
            MetricCard::new("Top Payment", method).with_subtitle(format!("{used} tickets")),
        );
    }
    cards
}

fn busiest_trip(trips: &[TripRecord]) -> Option<&TripRecord> {
    // First trip wins ties
    trips.iter().fold(None, |best: Option<&TripRecord>, trip| match best {
        Some(b) if b.tickets_sold >= trip.tickets_sold => Some(b),
        _ => Some(trip),
    })
}

fn top_payment_method(tickets: &[TicketRecord]) -> Option<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for method in tickets.iter().filter_map(|t| t.payment_method.as_deref()) {
        match counts.iter_mut().find(|(m, _)| m.eq_ignore_ascii_case(method)) {
            Some((_, n)) => *n += 1,
            None => counts.push((method.to_string(), 1)),
        }
    }
    // Earliest-seen method wins ties
    counts
        .into_iter()
        .fold(None, |best: Option<(String, usize)>, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })
}

fn compare_sales(a: &BusSales, b: &BusSales) -> Ordering {
    b.revenue
        .get()
        .total_cmp(&a.revenue.get())
        .then_with(|| b.tickets.cmp(&a.tickets))
        .then_with(|| a.bus_id.cmp(&b.bus_id))
}

/// Buses ranked by revenue, then ticket count, then bus id.
#[must_use]
pub fn top_buses(summary: &FleetSummary, limit: usize) -> Vec<BusSales> {
    let mut buses = summary.buses.clone();
    buses.sort_by(compare_sales);
    buses.truncate(limit);
    buses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TripCount;

    fn bus(id: &str, tickets: i64, revenue: f64) -> BusSales {
        BusSales {
            bus_id: id.to_string(),
            plate: format!("PL-{id}"),
            trips: TripCount(1),
            tickets: TicketCount(tickets),
            revenue: Revenue(revenue),
        }
    }

    fn trip(id: &str, route: &str, tickets: i64, revenue: f64) -> TripRecord {
        TripRecord {
            trip_id: id.to_string(),
            bus_id: "B1".to_string(),
            route: route.to_string(),
            tickets_sold: TicketCount(tickets),
            revenue: Revenue(revenue),
            ..TripRecord::default()
        }
    }

    fn ticket(id: &str, fare: f64, method: Option<&str>) -> TicketRecord {
        TicketRecord {
            ticket_id: id.to_string(),
            trip_id: "T1".to_string(),
            fare: Revenue(fare),
            payment_method: method.map(String::from),
            ..TicketRecord::default()
        }
    }

    #[test]
    fn test_fleet_cards() {
        let summary = FleetSummary {
            total_trips: TripCount(12),
            total_tickets: TicketCount(1_500),
            total_revenue: Revenue(11_250.0),
            active_buses: 4,
            buses: Vec::new(),
        };
        let cards = fleet_cards(&summary, "$");
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0].value, "$11,250.00");
        assert_eq!(cards[1].value, "1,500");
        assert_eq!(cards[4].title, "Avg. Fare");
        assert_eq!(cards[4].value, "$7.50");
    }

    #[test]
    fn test_empty_fleet_has_zero_average() {
        let cards = fleet_cards(&FleetSummary::default(), "$");
        assert_eq!(cards[4].value, "$0.00");
    }

    #[test]
    fn test_bus_cards_with_busiest_trip() {
        let summary = BusSummary {
            bus_id: "B1".to_string(),
            plate: "KA-01-1234".to_string(),
            total_trips: TripCount(4),
            total_tickets: TicketCount(90),
            total_revenue: Revenue(675.0),
        };
        let trips = vec![
            trip("T1", "Central - Airport", 30, 225.0),
            trip("T2", "Airport - Central", 30, 225.0),
            trip("T3", "Central - Harbour", 10, 75.0),
        ];
        let cards = bus_cards(&summary, &trips, "$");
        assert_eq!(cards[0].subtitle.as_deref(), Some("KA-01-1234"));
        assert_eq!(cards[3].value, "22.5");
        let busiest = cards.last().unwrap();
        assert_eq!(busiest.title, "Busiest Trip");
        assert_eq!(busiest.subtitle.as_deref(), Some("Central - Airport"));
    }

    #[test]
    fn test_bus_cards_without_trips() {
        let cards = bus_cards(&BusSummary::default(), &[], "$");
        assert_eq!(cards.len(), 4);
        assert!(cards[0].subtitle.is_none());
        assert_eq!(cards[3].value, "0.0");
    }

    #[test]
    fn test_bus_cards_skip_busiest_without_sales() {
        let trips = vec![trip("T1", "Depot Run", 0, 0.0)];
        let cards = bus_cards(&BusSummary::default(), &trips, "$");
        assert_eq!(cards.len(), 4);
        assert!(cards.iter().all(|card| card.title != "Busiest Trip"));
    }

    #[test]
    fn test_trip_cards() {
        let trips = vec![trip("T1", "A - B", 10, 80.0), trip("T2", "B - A", 5, 40.0)];
        let cards = trip_cards(&trips, "$");
        assert_eq!(cards[0].value, "2");
        assert_eq!(cards[1].value, "15");
        assert_eq!(cards[2].value, "$120.00");
        assert_eq!(cards[3].value, "7.5");
    }

    #[test]
    fn test_ticket_cards_top_payment() {
        let tickets = vec![
            ticket("K1", 8.0, Some("card")),
            ticket("K2", 8.0, Some("cash")),
            ticket("K3", 6.0, Some("Card")),
            ticket("K4", 6.0, None),
        ];
        let cards = ticket_cards(&tickets, "$");
        assert_eq!(cards[0].value, "4");
        assert_eq!(cards[1].value, "$28.00");
        assert_eq!(cards[2].value, "$7.00");
        assert_eq!(cards[3].value, "card");
        assert_eq!(cards[3].subtitle.as_deref(), Some("2 tickets"));
    }

    #[test]
    fn test_ticket_cards_empty() {
        let cards = ticket_cards(&[], "$");
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2].value, "$0.00");
    }

    #[test]
    fn test_top_buses_ordering() {
        let summary = FleetSummary {
            buses: vec![
                bus("B3", 10, 100.0),
                bus("B1", 20, 300.0),
                bus("B2", 12, 100.0),
                bus("B0", 10, 100.0),
            ],
            ..FleetSummary::default()
        };
        let ranked: Vec<String> = top_buses(&summary, 3).into_iter().map(|b| b.bus_id).collect();
        assert_eq!(ranked, vec!["B1", "B2", "B0"]);
    }
}
