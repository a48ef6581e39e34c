//! PostgREST client for the hosted tenders table.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    StoreError, Tender, TenderQuery, TenderStore, TenderText, SEARCH_COLUMNS, TENDER_COLUMNS,
};

pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    key: String,
    table: String,
}

impl RestStore {
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`.
    pub fn new(base_url: &str, key: &str, table: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            table: table.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        params: &[(String, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = self.table_url();
        debug!(url = %url, ?params, "querying store");
        let resp = self
            .client
            .get(&url)
            .query(params)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Query string for a list request.
pub fn list_params(query: &TenderQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), TENDER_COLUMNS.to_string())];
    if let Some(bid) = &query.bid_number {
        params.push(("bid_number".to_string(), format!("eq.{bid}")));
    }
    if !query.terms.is_empty() {
        let mut ors = Vec::with_capacity(SEARCH_COLUMNS.len() * query.terms.len());
        for word in &query.terms {
            for col in SEARCH_COLUMNS {
                ors.push(format!("{col}.ilike.*{word}*"));
            }
        }
        params.push(("or".to_string(), format!("({})", ors.join(","))));
    }
    params.push(("limit".to_string(), query.limit.to_string()));
    params
}

fn text_params(bid_number: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "full_text,department".to_string()),
        ("bid_number".to_string(), format!("eq.{bid_number}")),
        ("limit".to_string(), "1".to_string()),
    ]
}

#[async_trait]
impl TenderStore for RestStore {
    async fn list_tenders(&self, query: &TenderQuery) -> Result<Vec<Tender>, StoreError> {
        let rows: Vec<Tender> = self.select(&list_params(query)).await?;
        info!(count = rows.len(), terms = query.terms.len(), "listed tenders");
        Ok(rows)
    }

    async fn tender_text(&self, bid_number: &str) -> Result<Option<TenderText>, StoreError> {
        let rows: Vec<TenderText> = self.select(&text_params(bid_number)).await?;
        Ok(rows.into_iter().next())
    }

    async fn sample_rows(&self, limit: usize) -> Result<Vec<Value>, StoreError> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        self.select(&params).await
    }
}
