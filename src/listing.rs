//! Search and pagination over already-fetched records.

use crate::types::{BusSales, TicketRecord, TripRecord};

/// Records that can be matched by a free-text search box.
pub trait Searchable {
    /// Text fields the search query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for TripRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.trip_id.as_str(), self.bus_id.as_str(), self.route.as_str()]
    }
}

impl Searchable for TicketRecord {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.ticket_id.as_str(), self.trip_id.as_str()];
        fields.extend(
            [&self.passenger, &self.seat, &self.payment_method]
                .into_iter()
                .filter_map(|field| field.as_deref()),
        );
        fields
    }
}

impl Searchable for BusSales {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.bus_id.as_str(), self.plate.as_str()]
    }
}

/// Records whose fields contain `query`, ignoring case.
///
/// An empty or whitespace-only query matches everything.
pub fn search<'a, T: Searchable>(records: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// One page of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually shown.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `records` into 1-based pages of `page_size`.
///
/// Out-of-range page numbers clamp to the first or last page; a page size of
/// zero is treated as one.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = records.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = records
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(id: &str, route: &str) -> TripRecord {
        TripRecord {
            trip_id: id.to_string(),
            bus_id: "B7".to_string(),
            route: route.to_string(),
            ..TripRecord::default()
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let trips = vec![trip("T1", "Central - Airport"), trip("T2", "Harbour - Central")];
        let found = search(&trips, "  AIRPORT ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].trip_id, "T1");
    }

    #[test]
    fn test_search_empty_query_keeps_all() {
        let trips = vec![trip("T1", "A"), trip("T2", "B")];
        assert_eq!(search(&trips, "").len(), 2);
        assert_eq!(search(&trips, "   ").len(), 2);
    }

    #[test]
    fn test_search_optional_ticket_fields() {
        let tickets = vec![
            TicketRecord {
                ticket_id: "K1".to_string(),
                passenger: Some("Ada Lovelace".to_string()),
                ..TicketRecord::default()
            },
            TicketRecord {
                ticket_id: "K2".to_string(),
                ..TicketRecord::default()
            },
        ];
        let found = search(&tickets, "lovelace");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].ticket_id, "K1");
    }

    #[test]
    fn test_paginate() {
        let values: Vec<u32> = (1..=45).collect();
        let page = paginate(&values, 2, 20);
        assert_eq!(page.items.first(), Some(&21));
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 45);

        let last = paginate(&values, 3, 20);
        assert_eq!(last.items, vec![41, 42, 43, 44, 45]);
    }

    #[test]
    fn test_paginate_clamps_page() {
        let values: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(&values, 0, 2).page, 1);
        let past_end = paginate(&values, 99, 2);
        assert_eq!(past_end.page, 3);
        assert_eq!(past_end.items, vec![5]);
    }

    #[test]
    fn test_paginate_empty_and_zero_size() {
        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);

        let values = vec![1, 2, 3];
        let page = paginate(&values, 2, 0);
        assert_eq!(page.items, vec![2]);
        assert_eq!(page.total_pages, 3);
    }
}
