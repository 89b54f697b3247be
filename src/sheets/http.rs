use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde_json::{json, Value};
use crate::error::AppError;
use super::{parse_append, parse_rows, SheetStore};

/// Build the store client. Timeouts are the only cancellation there is.
pub fn build_client(timeout: Duration) -> Result<Client, AppError> {
    ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))
}

#[derive(Clone)]
pub struct HttpSheetStore {
    client: Client,
    base_url: String,
}

impl HttpSheetStore {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn with_sheet(&self, builder: RequestBuilder, sheet: Option<&str>) -> RequestBuilder {
        match sheet {
            Some(name) => builder.query(&[("sheet", name)]),
            None => builder,
        }
    }

    async fn read_json(&self, builder: RequestBuilder) -> Result<Value, AppError> {
        let response = builder.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() && body.get("error").is_none() {
            return Err(AppError::remote(format!("Store returned {status}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl SheetStore for HttpSheetStore {
    async fn fetch(&self, sheet: Option<&str>) -> Result<Vec<Value>, AppError> {
        let request = self.with_sheet(self.client.get(&self.base_url), sheet);
        let body = self.read_json(request).await?;
        let rows = parse_rows(body)?;
        tracing::debug!(sheet = ?sheet, rows = rows.len(), "Fetched sheet");
        Ok(rows)
    }

    async fn append(&self, sheet: Option<&str>, rows: Vec<Value>) -> Result<usize, AppError> {
        let sent = rows.len();
        let request = self
            .with_sheet(self.client.post(&self.base_url), sheet)
            .json(&json!({ "data": rows }));
        let body = self.read_json(request).await?;
        parse_append(&body, sent)
    }

    async fn search(&self, sheet: Option<&str>, criteria: &[(&str, &str)]) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/search", self.base_url);
        let request = self.with_sheet(self.client.get(url), sheet).query(criteria);
        let body = self.read_json(request).await?;
        parse_rows(body)
    }
}
