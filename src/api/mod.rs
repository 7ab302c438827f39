use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{
    CalcError, CalculationInput, CalculationResult, ProjectionPoint, RiskScenario,
    project_years, solve_required_contribution,
};
use crate::history::{
    AnalysisSummary, CalculationRecord, CalculationStore, InMemoryStore, summarize,
};

pub const MAX_YEARS_TO_GOAL: u32 = 50;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRiskScenario {
    Conservative,
    Moderate,
    Aggressive,
    VeryAggressive,
    Custom,
}

impl From<CliRiskScenario> for RiskScenario {
    fn from(value: CliRiskScenario) -> Self {
        match value {
            CliRiskScenario::Conservative => RiskScenario::Conservative,
            CliRiskScenario::Moderate => RiskScenario::Moderate,
            CliRiskScenario::Aggressive => RiskScenario::Aggressive,
            CliRiskScenario::VeryAggressive => RiskScenario::VeryAggressive,
            CliRiskScenario::Custom => RiskScenario::Custom,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ApiRiskScenario {
    Conservative,
    Moderate,
    Aggressive,
    #[serde(alias = "very-aggressive", alias = "veryAggressive")]
    VeryAggressive,
    Custom,
}

impl From<ApiRiskScenario> for CliRiskScenario {
    fn from(value: ApiRiskScenario) -> Self {
        match value {
            ApiRiskScenario::Conservative => CliRiskScenario::Conservative,
            ApiRiskScenario::Moderate => CliRiskScenario::Moderate,
            ApiRiskScenario::Aggressive => CliRiskScenario::Aggressive,
            ApiRiskScenario::VeryAggressive => CliRiskScenario::VeryAggressive,
            ApiRiskScenario::Custom => CliRiskScenario::Custom,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    target_amount: Option<f64>,
    years_to_goal: Option<u32>,
    initial_investment: Option<f64>,
    risk_scenario: Option<ApiRiskScenario>,
    custom_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListQuery {
    limit: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Monthly contribution planner for a savings target"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve(ServeArgs),
    /// Solve one calculation and print it as JSON
    Calculate(CalculateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "NESTEGG_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(
        long,
        env = "NESTEGG_HISTORY_LIMIT",
        default_value_t = 20,
        help = "Default number of past calculations listed and analysed"
    )]
    pub history_limit: usize,
}

#[derive(Args, Debug, Clone)]
pub struct CalculateArgs {
    #[arg(long, help = "Amount to reach by the end of the horizon")]
    pub target_amount: f64,
    #[arg(long, help = "Horizon in whole years (1-50)")]
    pub years_to_goal: u32,
    #[arg(long, default_value_t = 0.0, help = "Lump sum invested at the start")]
    pub initial_investment: f64,
    #[arg(long, value_enum, default_value_t = CliRiskScenario::Moderate)]
    pub risk_scenario: CliRiskScenario,
    #[arg(
        long,
        help = "Annual return in percent for the custom scenario, e.g. 8.5"
    )]
    pub custom_rate: Option<f64>,
    #[arg(long, help = "Include the year-by-year projection")]
    pub projection: bool,
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn CalculationStore>,
    history_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn CalculationStore>, history_limit: usize) -> Self {
        Self {
            store,
            history_limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    calculation: CalculationRecord,
    projection: Vec<ProjectionPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliCalculationOutput {
    result: CalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<Vec<ProjectionPoint>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("calculation {0} not found")]
    NotFound(String),
    #[error("Not found")]
    UnknownRoute,
}

impl From<CalcError> for ApiError {
    fn from(value: CalcError) -> Self {
        ApiError::BadRequest(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::UnknownRoute => StatusCode::NOT_FOUND,
        };
        error_response(status, &self.to_string())
    }
}

fn build_input(args: &CalculateArgs) -> Result<CalculationInput, String> {
    if !args.target_amount.is_finite() || args.target_amount <= 0.0 {
        return Err("--target-amount must be > 0".to_string());
    }

    if !(1..=MAX_YEARS_TO_GOAL).contains(&args.years_to_goal) {
        return Err(format!(
            "--years-to-goal must be between 1 and {MAX_YEARS_TO_GOAL}"
        ));
    }

    if !args.initial_investment.is_finite() || args.initial_investment < 0.0 {
        return Err("--initial-investment must be >= 0".to_string());
    }

    let risk_scenario = RiskScenario::from(args.risk_scenario);
    let custom_rate = match (risk_scenario, args.custom_rate) {
        (RiskScenario::Custom, Some(rate)) => {
            if !(0.0..100.0).contains(&rate) {
                return Err("--custom-rate must be >= 0 and < 100".to_string());
            }
            Some(rate / 100.0)
        }
        _ => None,
    };

    Ok(CalculationInput {
        target_amount: args.target_amount,
        years_to_goal: args.years_to_goal,
        initial_investment: args.initial_investment,
        risk_scenario,
        custom_rate,
    })
}

pub fn run_calculate(args: &CalculateArgs) -> Result<String, String> {
    let input = build_input(args)?;
    let result = solve_required_contribution(&input).map_err(|e| e.to_string())?;
    let projection = args
        .projection
        .then(|| project_years(&result).collect::<Vec<_>>());
    let output = CliCalculationOutput { result, projection };
    serde_json::to_string_pretty(&output).map_err(|e| format!("Failed to encode result: {e}"))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route("/api/calculations", get(list_handler))
        .route("/api/calculations/:id", get(record_handler))
        .route("/api/calculations/:id/projection", get(projection_handler))
        .route("/api/analysis", get(analysis_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

pub async fn run_http_server(args: ServeArgs) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let state = AppState::new(Arc::new(InMemoryStore::new()), args.history_limit);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, history_limit = args.history_limit, "nestegg HTTP API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    ApiError::UnknownRoute.into_response()
}

async fn calculate_get_handler(
    State(state): State<AppState>,
    Query(payload): Query<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&state, payload)
}

async fn calculate_post_handler(
    State(state): State<AppState>,
    Json(payload): Json<CalculatePayload>,
) -> Response {
    calculate_handler_impl(&state, payload)
}

fn calculate_handler_impl(state: &AppState, payload: CalculatePayload) -> Response {
    let input = match api_input_from_payload(payload) {
        Ok(input) => input,
        Err(msg) => {
            warn!(error = %msg, "rejected calculation request");
            return ApiError::BadRequest(msg).into_response();
        }
    };

    let result = match solve_required_contribution(&input) {
        Ok(result) => result,
        Err(err) => {
            warn!(error = %err, "calculation failed");
            return ApiError::from(err).into_response();
        }
    };

    let projection = project_years(&result).collect();
    let calculation = state.store.append(result);
    info!(
        id = %calculation.id,
        scenario = calculation.result.risk_scenario.as_str(),
        annual_return = calculation.result.projected_annual_return,
        monthly_contribution = calculation.result.monthly_contribution,
        "stored calculation"
    );

    json_response(
        StatusCode::OK,
        CalculateResponse {
            calculation,
            projection,
        },
    )
}

async fn list_handler(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let limit = query.limit.unwrap_or(state.history_limit);
    json_response(StatusCode::OK, state.store.list(limit))
}

async fn record_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match find_record(&state, &id) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => err.into_response(),
    }
}

async fn projection_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match find_record(&state, &id) {
        Ok(record) => {
            let points: Vec<ProjectionPoint> = project_years(&record.result).collect();
            json_response(StatusCode::OK, points)
        }
        Err(err) => err.into_response(),
    }
}

async fn analysis_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(state.history_limit);
    let summary: AnalysisSummary = summarize(&state.store.list(limit));
    json_response(StatusCode::OK, summary)
}

fn find_record(state: &AppState, raw_id: &str) -> Result<CalculationRecord, ApiError> {
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| ApiError::BadRequest(format!("invalid calculation id: {raw_id}")))?;
    state
        .store
        .get(id)
        .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_input_from_json(json: &str) -> Result<CalculationInput, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_input_from_payload(payload)
}

fn api_input_from_payload(payload: CalculatePayload) -> Result<CalculationInput, String> {
    let Some(target_amount) = payload.target_amount else {
        return Err("targetAmount is required".to_string());
    };
    let Some(years_to_goal) = payload.years_to_goal else {
        return Err("yearsToGoal is required".to_string());
    };

    let mut args = default_args_for_api(target_amount, years_to_goal);
    if let Some(v) = payload.initial_investment {
        args.initial_investment = v;
    }
    if let Some(v) = payload.risk_scenario {
        args.risk_scenario = v.into();
    }
    if let Some(v) = payload.custom_rate {
        args.custom_rate = Some(v);
    }

    build_input(&args).map_err(|msg| flag_to_api_key(&msg))
}

fn default_args_for_api(target_amount: f64, years_to_goal: u32) -> CalculateArgs {
    CalculateArgs {
        target_amount,
        years_to_goal,
        initial_investment: 0.0,
        risk_scenario: CliRiskScenario::Moderate,
        custom_rate: None,
        projection: true,
    }
}

// Validation messages name CLI flags; API callers see their JSON keys instead.
fn flag_to_api_key(msg: &str) -> String {
    [
        ("--target-amount", "targetAmount"),
        ("--years-to-goal", "yearsToGoal"),
        ("--initial-investment", "initialInvestment"),
        ("--custom-rate", "customRate"),
    ]
    .iter()
    .fold(msg.to_string(), |acc, (flag, key)| acc.replace(flag, key))
}
