use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::AppState;
use crate::error::ApiError;
use crate::parser::{self, ExtractedFields};
use crate::store::{Tender, TenderQuery, TenderText};

const DIAGNOSTIC_SAMPLE: usize = 5;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    limit: Option<String>,
    q: Option<String>,
    bid_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BidParams {
    bid_number: Option<String>,
}

impl BidParams {
    fn require(&self) -> Result<&str, ApiError> {
        self.bid_number
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or(ApiError::MissingParam("bid_number"))
    }
}

#[derive(Serialize)]
pub struct ListEnvelope {
    success: bool,
    count: usize,
    data: Vec<Tender>,
}

#[derive(Serialize)]
pub struct DataEnvelope<T> {
    success: bool,
    data: T,
}

impl<T> DataEnvelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Serialize)]
pub struct EmdData {
    bid_number: String,
    emd_amount: String,
}

#[derive(Serialize)]
pub struct DetailsData {
    bid_number: String,
    #[serde(flatten)]
    fields: ExtractedFields,
}

pub async fn landing() -> &'static str {
    "Tender API is running"
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn tenders(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ListEnvelope>, ApiError> {
    let Query(params) = params?;
    let limit = state.settings.resolve_limit(params.limit.as_deref());
    let query = TenderQuery::new(limit, params.q.as_deref(), params.bid_number.as_deref());
    let data: Vec<Tender> = state
        .store
        .list_tenders(&query)
        .await?
        .into_iter()
        .map(Tender::with_display_fields)
        .collect();
    debug!(count = data.len(), limit, "tenders served");
    Ok(Json(ListEnvelope {
        success: true,
        count: data.len(),
        data,
    }))
}

async fn fetch_text(state: &AppState, bid_number: &str) -> Result<TenderText, ApiError> {
    state
        .store
        .tender_text(bid_number)
        .await?
        .ok_or(ApiError::NotFound("Tender not found"))
}

pub async fn tender_text(
    State(state): State<AppState>,
    params: Result<Query<BidParams>, QueryRejection>,
) -> Result<Json<DataEnvelope<TenderText>>, ApiError> {
    let Query(params) = params?;
    let bid_number = params.require()?;
    let text = fetch_text(&state, bid_number).await?;
    Ok(DataEnvelope::ok(text))
}

pub async fn tender_emd(
    State(state): State<AppState>,
    params: Result<Query<BidParams>, QueryRejection>,
) -> Result<Json<DataEnvelope<EmdData>>, ApiError> {
    let Query(params) = params?;
    let bid_number = params.require()?;
    let text = fetch_text(&state, bid_number).await?;
    let emd_amount = text
        .full_text
        .as_deref()
        .and_then(parser::extract_emd)
        .ok_or(ApiError::NotFound("EMD amount not found in document"))?;
    info!(bid_number = %bid_number, emd_amount = %emd_amount, "emd extracted");
    Ok(DataEnvelope::ok(EmdData {
        bid_number: bid_number.to_string(),
        emd_amount,
    }))
}

pub async fn tender_extract_details(
    State(state): State<AppState>,
    params: Result<Query<BidParams>, QueryRejection>,
) -> Result<Json<DataEnvelope<DetailsData>>, ApiError> {
    let Query(params) = params?;
    let bid_number = params.require()?;
    let text = fetch_text(&state, bid_number).await?;
    let fields = parser::extract_details(text.full_text.as_deref().unwrap_or_default());
    info!(bid_number = %bid_number, found = fields.found(), "details extracted");
    Ok(DataEnvelope::ok(DetailsData {
        bid_number: bid_number.to_string(),
        fields,
    }))
}

pub async fn test_connection(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows = state.store.sample_rows(DIAGNOSTIC_SAMPLE).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Connection successful",
        "sample_count": rows.len(),
        "data": rows,
    })))
}

pub async fn public_test(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rows = state.store.sample_rows(DIAGNOSTIC_SAMPLE).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Public endpoint working",
        "sample_count": rows.len(),
    })))
}
