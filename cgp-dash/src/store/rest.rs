//! PostgREST client
//!
//! Talks to `{url}/rest/v1/{table}` with the project's anon key sent both
//! as `apikey` and as a bearer token. Rows are filtered with `id=eq.<id>`.

use async_trait::async_trait;
use cgp_common::rows::Table;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{Direction, SelectQuery, StoreError, StoreResult, TableStore};

const USER_AGENT: &str = concat!("cgp-dash/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Filter matching every row, for table-wide updates
///
/// PostgREST refuses unfiltered PATCH requests; no row carries the nil UUID.
const EVERY_ROW: &str = "id=neq.00000000-0000-0000-0000-000000000000";

pub struct RestStore {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> StoreResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(status.as_u16(), error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl TableStore for RestStore {
    fn backend_name(&self) -> &'static str {
        "rest"
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> StoreResult<Vec<Value>> {
        query.validate()?;

        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some((column, direction)) = &query.order_by {
            let dir = match direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            params.push(("order".to_string(), format!("{}.{}", column, dir)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        debug!(table = %table, "Selecting rows");
        let response = self
            .send(self.http_client.get(self.table_url(table)).query(&params))
            .await?;

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    async fn insert(&self, table: Table, row: Value) -> StoreResult<Value> {
        debug!(table = %table, "Inserting row");
        let response = self
            .send(
                self.http_client
                    .post(self.table_url(table))
                    .header("Prefer", "return=representation")
                    .json(&[row]),
            )
            .await?;

        let mut rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        if rows.is_empty() {
            return Err(StoreError::Parse(format!("{} insert returned no row", table)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<()> {
        debug!(table = %table, id = id, "Updating row");
        self.send(
            self.http_client
                .patch(format!("{}?id=eq.{}", self.table_url(table), id))
                .json(&patch),
        )
        .await?;
        Ok(())
    }

    async fn update_all(&self, table: Table, patch: Value) -> StoreResult<()> {
        debug!(table = %table, "Updating every row");
        self.send(
            self.http_client
                .patch(format!("{}?{}", self.table_url(table), EVERY_ROW))
                .json(&patch),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        debug!(table = %table, id = id, "Deleting row");
        self.send(
            self.http_client
                .delete(format!("{}?id=eq.{}", self.table_url(table), id)),
        )
        .await?;
        Ok(())
    }
}
