//! HTTP/JSON data source backed by the fleet reporting API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{DataSource, IntervalQuery};
use crate::config::BackendConfig;
use crate::error::Result;
use crate::types::{BusSummary, FleetSummary, TicketRecord, TripRecord};

/// Client for the reporting backend.
///
/// Endpoints (all `GET`, JSON responses):
/// - `sales/summary`
/// - `buses/{bus_id}/summary`
/// - `trips`
/// - `tickets`
#[derive(Debug, Clone)]
pub struct RestDataSource {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl RestDataSource {
    /// Build a client from backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()?).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &IntervalQuery) -> Result<T> {
        let url = self.endpoint(path);
        let params = query.to_params();

        debug!(
            url = %url,
            start_date = %query.start_param(),
            end_date = %query.end_param(),
            "Fetching report data"
        );

        let mut request = self.client.get(&url).query(&params);
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let value = request.send().await?.error_for_status()?.json().await?;
        Ok(value)
    }
}

#[async_trait]
impl DataSource for RestDataSource {
    async fn fleet_summary(&self, query: &IntervalQuery) -> Result<FleetSummary> {
        self.get_json("sales/summary", query).await
    }

    async fn bus_summary(&self, query: &IntervalQuery, bus_id: &str) -> Result<BusSummary> {
        let path = format!("buses/{}/summary", urlencoding::encode(bus_id));
        self.get_json(&path, query).await
    }

    async fn trips(&self, query: &IntervalQuery) -> Result<Vec<TripRecord>> {
        let trips: Vec<TripRecord> = self.get_json("trips", query).await?;
        debug!(count = trips.len(), "Fetched trips");
        Ok(trips)
    }

    async fn tickets(&self, query: &IntervalQuery) -> Result<Vec<TicketRecord>> {
        let tickets: Vec<TicketRecord> = self.get_json("tickets", query).await?;
        debug!(count = tickets.len(), "Fetched tickets");
        Ok(tickets)
    }
}
