// ABOUTME: Reading CRUD API handlers: create, update, delete, get one, get all.
// ABOUTME: Dispatches on the reading kind in the path and maps store results to status codes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sensord_core::{Reading, ReadingKind};
use sensord_store::{PressureCodec, ReadingStore, RowCodec, StoreError, TemperatureCodec};
use serde::Deserialize;

use crate::app_state::{SharedState, StoreSlot};

/// Sequence number carried by readings not yet in a store; the store
/// assigns the real one on add.
const DEFAULT_SEQ_NUM: i64 = 0;

/// Request body for creating or updating a reading. The timestamp is a
/// string in the kind's own format, like the rows on disk.
#[derive(Debug, Deserialize)]
pub struct ReadingBody {
    pub timestamp: String,
    pub model: String,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub status: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "no reading with that sequence number" })),
    )
        .into_response()
}

fn storage_error(err: StoreError) -> Response {
    tracing::error!("storage failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "storage failure" })),
    )
        .into_response()
}

fn parse_kind(kind: &str) -> Result<ReadingKind, Response> {
    kind.parse::<ReadingKind>()
        .map_err(|_| bad_request("unknown reading kind"))
}

fn parse_seq_num(seq_num: &str) -> Result<i64, Response> {
    seq_num
        .parse::<i64>()
        .map_err(|_| bad_request("sequence number must be an integer"))
}

/// JSON shape of one reading, timestamp formatted at the kind's precision.
fn reading_json<C: RowCodec>(codec: &C, reading: &Reading) -> serde_json::Value {
    serde_json::json!({
        "timestamp": codec.format_timestamp(reading.timestamp()),
        "sequence_num": reading.sequence_num(),
        "model": reading.sensor_model(),
        "min": reading.min_value(),
        "avg": reading.avg_value(),
        "max": reading.max_value(),
        "status": reading.status(),
    })
}

/// Build a validated reading from a request body, mapping bad fields to 400.
fn reading_from_body<C: RowCodec>(
    codec: &C,
    seq_num: i64,
    body: &ReadingBody,
) -> Result<Reading, Response> {
    let timestamp = codec
        .parse_timestamp(&body.timestamp)
        .map_err(|_| bad_request("malformed timestamp"))?;
    Reading::new(
        codec.kind(),
        timestamp,
        seq_num,
        body.model.clone(),
        body.min,
        body.avg,
        body.max,
        body.status.clone(),
    )
    .map_err(|e| bad_request(&e.to_string()))
}

/// POST /sensor/{kind}/reading - Store a reading; the store assigns its
/// sequence number.
pub async fn add_reading(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
    Json(body): Json<ReadingBody>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    match kind {
        ReadingKind::Temperature => add_kind(state.slot(kind), TemperatureCodec, &body).await,
        ReadingKind::Pressure => add_kind(state.slot(kind), PressureCodec, &body).await,
    }
}

async fn add_kind<C: RowCodec + Copy>(slot: &StoreSlot, codec: C, body: &ReadingBody) -> Response {
    let reading = match reading_from_body(&codec, DEFAULT_SEQ_NUM, body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let _guard = slot.write().await;
    let mut store = match ReadingStore::open(slot.path(), codec) {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    let mut created = reading.clone();
    let assigned = match store.add(reading) {
        Ok(seq) => seq,
        Err(e) => return storage_error(e),
    };
    created.set_sequence_num(assigned);

    (StatusCode::CREATED, Json(reading_json(&codec, &created))).into_response()
}

/// PUT /sensor/{kind}/reading/{seq_num} - Replace the reading(s) with that
/// sequence number.
pub async fn update_reading(
    State(state): State<SharedState>,
    Path((kind, seq_num)): Path<(String, String)>,
    Json(body): Json<ReadingBody>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    let seq_num = match parse_seq_num(&seq_num) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    match kind {
        ReadingKind::Temperature => {
            update_kind(state.slot(kind), TemperatureCodec, seq_num, &body).await
        }
        ReadingKind::Pressure => update_kind(state.slot(kind), PressureCodec, seq_num, &body).await,
    }
}

async fn update_kind<C: RowCodec>(
    slot: &StoreSlot,
    codec: C,
    seq_num: i64,
    body: &ReadingBody,
) -> Response {
    let reading = match reading_from_body(&codec, seq_num, body) {
        Ok(r) => r,
        Err(resp) => return resp,
    };

    let _guard = slot.write().await;
    let mut store = match ReadingStore::open(slot.path(), codec) {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    match store.update(reading) {
        Ok(0) => not_found(),
        Ok(count) => (
            StatusCode::OK,
            Json(serde_json::json!({ "updated": count })),
        )
            .into_response(),
        Err(e) => storage_error(e),
    }
}

/// DELETE /sensor/{kind}/reading/{seq_num} - Remove the reading(s) with
/// that sequence number.
pub async fn delete_reading(
    State(state): State<SharedState>,
    Path((kind, seq_num)): Path<(String, String)>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    let seq_num = match parse_seq_num(&seq_num) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    match kind {
        ReadingKind::Temperature => {
            delete_kind(state.slot(kind), TemperatureCodec, seq_num).await
        }
        ReadingKind::Pressure => delete_kind(state.slot(kind), PressureCodec, seq_num).await,
    }
}

async fn delete_kind<C: RowCodec>(slot: &StoreSlot, codec: C, seq_num: i64) -> Response {
    let _guard = slot.write().await;
    let mut store = match ReadingStore::open(slot.path(), codec) {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    match store.delete(seq_num) {
        Ok(0) => not_found(),
        Ok(count) => (
            StatusCode::OK,
            Json(serde_json::json!({ "deleted": count })),
        )
            .into_response(),
        Err(e) => storage_error(e),
    }
}

/// GET /sensor/{kind}/reading/{seq_num} - Fetch one reading.
pub async fn get_reading(
    State(state): State<SharedState>,
    Path((kind, seq_num)): Path<(String, String)>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    let seq_num = match parse_seq_num(&seq_num) {
        Ok(n) => n,
        Err(resp) => return resp,
    };
    match kind {
        ReadingKind::Temperature => get_kind(state.slot(kind), TemperatureCodec, seq_num).await,
        ReadingKind::Pressure => get_kind(state.slot(kind), PressureCodec, seq_num).await,
    }
}

async fn get_kind<C: RowCodec + Copy>(slot: &StoreSlot, codec: C, seq_num: i64) -> Response {
    let _guard = slot.read().await;
    let store = match ReadingStore::open(slot.path(), codec) {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    match store.get(seq_num) {
        Some(reading) => Json(reading_json(&codec, reading)).into_response(),
        None => not_found(),
    }
}

/// GET /sensor/{kind}/reading/all - List every reading, ordered by
/// sequence number ascending.
pub async fn get_all_readings(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(k) => k,
        Err(resp) => return resp,
    };
    match kind {
        ReadingKind::Temperature => get_all_kind(state.slot(kind), TemperatureCodec).await,
        ReadingKind::Pressure => get_all_kind(state.slot(kind), PressureCodec).await,
    }
}

async fn get_all_kind<C: RowCodec + Copy>(slot: &StoreSlot, codec: C) -> Response {
    let _guard = slot.read().await;
    let store = match ReadingStore::open(slot.path(), codec) {
        Ok(s) => s,
        Err(e) => return storage_error(e),
    };

    let readings: Vec<serde_json::Value> = store
        .readings()
        .iter()
        .map(|r| reading_json(&codec, r))
        .collect();
    Json(readings).into_response()
}
