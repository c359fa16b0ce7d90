//! HTTP front end for the toolkit.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::Error;
use crate::estimate::{Charges, Estimate, card_estimate, flex_estimate};
use crate::job::{JobReport, JobRequest, run_job};
use crate::planner::plan_sheets;
use crate::rates::{RateBook, RateStore};
use crate::types::SheetPlan;
use crate::units::Dimension;

pub struct AppState {
    rates: RateStore<RateBook>,
}

impl AppState {
    pub fn new(rate_file: impl Into<PathBuf>) -> Self {
        Self {
            rates: RateStore::new(rate_file),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

fn reject(e: Error) -> (StatusCode, String) {
    let status = match &e {
        Error::UnknownFinish { .. }
        | Error::UnknownQuantity { .. }
        | Error::UnknownFlexType { .. } => StatusCode::NOT_FOUND,
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        _ => {
            tracing::error!(error = %e, "rate storage failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, e.to_string())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/optimize", post(optimize))
        .route("/plan", post(plan))
        .route("/estimate/card", post(estimate_card))
        .route("/estimate/flex", post(estimate_flex))
        .route("/rates", get(get_rates))
        .route("/rates/card", put(put_card_rate))
        .route("/rates/flex", put(put_flex_rate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn optimize(Json(req): Json<JobRequest>) -> ApiResult<JobReport> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );
    let report = run_job(&req).map_err(reject)?;
    if report.best.is_empty() {
        tracing::info!(sheet = %req.sheet, finish = %req.finish, "finish does not fit sheet");
    }
    Ok(Json(report))
}

#[derive(Deserialize)]
struct PlanRequest {
    target_quantity: u64,
    per_sheet_yield: u64,
}

async fn plan(Json(req): Json<PlanRequest>) -> ApiResult<SheetPlan> {
    plan_sheets(req.target_quantity, req.per_sheet_yield)
        .map(Json)
        .map_err(reject)
}

#[derive(Deserialize, Serialize)]
struct CardEstimateRequest {
    finish: String,
    quantity: u32,
    #[serde(default)]
    charges: Charges,
}

async fn estimate_card(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CardEstimateRequest>,
) -> ApiResult<Estimate> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /estimate/card"
    );
    let book = state.rates.load_or_default().map_err(reject)?;
    card_estimate(&book.cards, &req.finish, req.quantity, &req.charges)
        .map(Json)
        .map_err(reject)
}

#[derive(Deserialize, Serialize)]
struct FlexEstimateRequest {
    kind: String,
    width: Dimension,
    height: Dimension,
    #[serde(default)]
    charges: Charges,
}

async fn estimate_flex(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlexEstimateRequest>,
) -> ApiResult<Estimate> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /estimate/flex"
    );
    let book = state.rates.load_or_default().map_err(reject)?;
    flex_estimate(&book.flex, &req.kind, req.width, req.height, &req.charges)
        .map(Json)
        .map_err(reject)
}

async fn get_rates(State(state): State<Arc<AppState>>) -> ApiResult<RateBook> {
    state.rates.load_or_default().map(Json).map_err(reject)
}

#[derive(Deserialize)]
struct CardRateUpdate {
    finish: String,
    quantity: u32,
    price: f64,
}

async fn put_card_rate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CardRateUpdate>,
) -> ApiResult<RateBook> {
    let mut book = state.rates.load_or_default().map_err(reject)?;
    book.cards
        .set_rate(&req.finish, req.quantity, req.price)
        .map_err(reject)?;
    state.rates.save(&book).map_err(reject)?;
    tracing::info!(finish = %req.finish, quantity = req.quantity, price = req.price, "card rate updated");
    Ok(Json(book))
}

#[derive(Deserialize)]
struct FlexRateUpdate {
    kind: String,
    rate: f64,
}

async fn put_flex_rate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FlexRateUpdate>,
) -> ApiResult<RateBook> {
    let mut book = state.rates.load_or_default().map_err(reject)?;
    book.flex.set_rate(&req.kind, req.rate).map_err(reject)?;
    state.rates.save(&book).map_err(reject)?;
    tracing::info!(kind = %req.kind, rate = req.rate, "flex rate updated");
    Ok(Json(book))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct TestApp {
        _dir: tempfile::TempDir,
        app: Router,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(dir.path().join("rates.json")));
        TestApp {
            app: router(state),
            _dir: dir,
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_up() {
        let t = test_app();
        let (status, _) = send(&t.app, "GET", "/up", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_optimize() {
        let t = test_app();
        let body = json!({
            "sheet": {"width": 330, "height": 483, "unit": "mm"},
            "finish": {"width": 210, "height": 297, "unit": "mm"},
            "quantity": 251
        });
        let (status, v) = send(&t.app, "POST", "/optimize", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["best"]["orientation"], "swapped");
        assert_eq!(v["best"]["layout"]["count"], 2);
        assert_eq!(v["best"]["runner_up_count"], 1);
        assert_eq!(v["plan"]["sheets_needed"], 126);
        assert_eq!(v["plan"]["surplus"], 1);
    }

    #[tokio::test]
    async fn test_optimize_zero_fit_is_success() {
        let t = test_app();
        let body = json!({
            "sheet": {"width": 100, "height": 100},
            "finish": {"width": 200, "height": 50}
        });
        let (status, v) = send(&t.app, "POST", "/optimize", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["best"]["layout"]["count"], 0);
        assert_eq!(v["waste_percent"], 100.0);
    }

    #[tokio::test]
    async fn test_optimize_invalid_dimension() {
        let t = test_app();
        let body = json!({
            "sheet": {"width": 0, "height": 100},
            "finish": {"width": 10, "height": 10}
        });
        let (status, _) = send(&t.app, "POST", "/optimize", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_optimize_uncountable_grid() {
        let t = test_app();
        let body = json!({
            "sheet": {"width": 1e10, "height": 1e10},
            "finish": {"width": 1e-5, "height": 1e-5}
        });
        let (status, _) = send(&t.app, "POST", "/optimize", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_plan_unfittable() {
        let t = test_app();
        let body = json!({"target_quantity": 100, "per_sheet_yield": 0});
        let (status, _) = send(&t.app, "POST", "/plan", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body = json!({"target_quantity": 250, "per_sheet_yield": 2});
        let (status, v) = send(&t.app, "POST", "/plan", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["sheets_needed"], 125);
    }

    #[tokio::test]
    async fn test_card_estimate_uses_updated_rates() {
        let t = test_app();
        let body = json!({"finish": "Gloss", "quantity": 500});
        let (status, v) = send(&t.app, "POST", "/estimate/card", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["total"], 400.0);

        let update = json!({"finish": "Gloss", "quantity": 500, "price": 450});
        let (status, v) = send(&t.app, "PUT", "/rates/card", Some(update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["cards"]["Gloss"]["500"], 450.0);

        let (_, v) = send(&t.app, "POST", "/estimate/card", Some(body)).await;
        assert_eq!(v["total"], 450.0);
    }

    #[tokio::test]
    async fn test_card_estimate_unknown_finish() {
        let t = test_app();
        let body = json!({"finish": "Foil", "quantity": 500});
        let (status, _) = send(&t.app, "POST", "/estimate/card", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_flex_estimate_and_update() {
        let t = test_app();
        let update = json!({"kind": "Normal", "rate": 10});
        let (status, _) = send(&t.app, "PUT", "/rates/flex", Some(update)).await;
        assert_eq!(status, StatusCode::OK);

        let body = json!({
            "kind": "normal",
            "width": {"value": 72, "unit": "in"},
            "height": {"value": 36, "unit": "in"},
            "charges": {"include_gst": true}
        });
        let (status, v) = send(&t.app, "POST", "/estimate/flex", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        let total = v["total"].as_f64().unwrap();
        assert!((total - 212.4).abs() < 1e-6, "total was {total}");
    }

    #[tokio::test]
    async fn test_rates_default_and_invalid_update() {
        let t = test_app();
        let (status, v) = send(&t.app, "GET", "/rates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["cards"]["Matte"]["1000"], 800.0);
        assert_eq!(v["flex"]["Star"], 18.0);

        let update = json!({"finish": "Gloss", "quantity": 500, "price": -5});
        let (status, _) = send(&t.app, "PUT", "/rates/card", Some(update)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
