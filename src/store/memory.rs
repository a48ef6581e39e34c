//! In-process store used by the router tests.

use async_trait::async_trait;
use serde_json::Value;

use super::{StoreError, Tender, TenderQuery, TenderStore, TenderText};

#[derive(Default)]
pub struct MemoryStore {
    rows: Vec<(Tender, Option<String>)>,
    fail_with: Option<u16>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(mut self, tender: Tender, full_text: Option<&str>) -> Self {
        self.rows.push((tender, full_text.map(str::to_string)));
        self
    }

    /// Every call fails as if the store answered with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            rows: Vec::new(),
            fail_with: Some(status),
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.fail_with {
            Some(status) => Err(StoreError::Server {
                status,
                body: "store unavailable".to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn matches_terms(tender: &Tender, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let columns = [
        &tender.item_category,
        &tender.department,
        &tender.organization,
        &tender.city,
        &tender.state,
        &tender.status,
    ];
    terms.iter().any(|term| {
        let term = term.to_lowercase();
        columns
            .iter()
            .filter_map(|c| c.as_deref())
            .any(|v| v.to_lowercase().contains(&term))
    })
}

#[async_trait]
impl TenderStore for MemoryStore {
    async fn list_tenders(&self, query: &TenderQuery) -> Result<Vec<Tender>, StoreError> {
        self.check()?;
        Ok(self
            .rows
            .iter()
            .map(|(t, _)| t)
            .filter(|t| query.bid_number.as_deref().is_none_or(|b| t.bid_number == b))
            .filter(|t| matches_terms(t, &query.terms))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn tender_text(&self, bid_number: &str) -> Result<Option<TenderText>, StoreError> {
        self.check()?;
        Ok(self
            .rows
            .iter()
            .find(|(t, _)| t.bid_number == bid_number)
            .map(|(t, text)| TenderText {
                full_text: text.clone(),
                department: t.department.clone(),
            }))
    }

    async fn sample_rows(&self, limit: usize) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        self.rows
            .iter()
            .take(limit)
            .map(|(t, _)| serde_json::to_value(t).map_err(StoreError::from))
            .collect()
    }
}
