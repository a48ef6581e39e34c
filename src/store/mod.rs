pub mod rest;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::format::{format_amount, format_date};

/// Columns returned by the list endpoint, in display order.
pub const TENDER_COLUMNS: &str = "bid_number,item_category,department,organization,quantity,status,closing_date,tender_amount,city,state,source_url";

/// Columns a search phrase is matched against.
pub const SEARCH_COLUMNS: &[&str] = &[
    "item_category",
    "department",
    "organization",
    "city",
    "state",
    "status",
];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("store returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("store response parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One row of the tenders table as the gateway exposes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tender {
    pub bid_number: String,
    pub item_category: Option<String>,
    pub department: Option<String>,
    pub organization: Option<String>,
    pub quantity: Option<Value>,
    pub status: Option<String>,
    pub closing_date: Option<String>,
    pub tender_amount: Option<Value>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_amount: Option<String>,
}

impl Tender {
    /// Attaches the display fields derived from the raw closing date and amount.
    pub fn with_display_fields(mut self) -> Self {
        self.formatted_deadline = self
            .closing_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(format_date);
        self.formatted_amount = self.tender_amount.as_ref().and_then(format_amount);
        self
    }
}

/// Document body of a single tender.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderText {
    pub full_text: Option<String>,
    pub department: Option<String>,
}

/// Filters for one list request. `terms` are OR-combined across
/// [`SEARCH_COLUMNS`]; `bid_number` is ANDed with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderQuery {
    pub limit: usize,
    pub terms: Vec<String>,
    pub bid_number: Option<String>,
}

impl TenderQuery {
    pub fn new(limit: usize, phrase: Option<&str>, bid_number: Option<&str>) -> Self {
        Self {
            limit,
            terms: phrase.map(search_terms).unwrap_or_default(),
            bid_number: bid_number
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string),
        }
    }
}

/// Splits a search phrase into words, dropping characters that carry
/// meaning in the store's filter syntax.
pub fn search_terms(phrase: &str) -> Vec<String> {
    phrase
        .split(|c: char| c.is_whitespace() || c == '_')
        .map(|w| {
            w.chars()
                .filter(|c| !matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | '\\' | '*' | '%'))
                .collect::<String>()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Read access to the tenders table.
#[async_trait]
pub trait TenderStore: Send + Sync {
    async fn list_tenders(&self, query: &TenderQuery) -> Result<Vec<Tender>, StoreError>;

    /// `Ok(None)` when no row has this bid number.
    async fn tender_text(&self, bid_number: &str) -> Result<Option<TenderText>, StoreError>;

    /// Up to `limit` raw rows, for connectivity checks.
    async fn sample_rows(&self, limit: usize) -> Result<Vec<Value>, StoreError>;
}
