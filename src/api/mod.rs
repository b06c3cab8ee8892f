use std::collections::HashSet;
use std::net::SocketAddr;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{LumpSum, PlanParameters, PlanSummary, ProjectionSeries, run_plan};

const DEFAULT_PORT: u16 = 8080;
const PORT_ENV: &str = "FIREPLAN_PORT";
const MAX_AGE: u32 = 120;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{field} must be greater than -100, got {value}")]
    RateOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be at most {max}, got {value}")]
    AgeOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("duplicate lump sum id `{0}`")]
    DuplicateLumpSum(String),

    #[error("invalid lump sum `{0}`; expected MONTH:AMOUNT")]
    InvalidLumpSum(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "fireplan",
    about = "Deterministic savings and retirement projections with FIRE metrics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON projection API.
    Serve {
        /// Listening port; falls back to FIREPLAN_PORT, then 8080.
        port: Option<u16>,
    },
    /// Compute one projection and print it as JSON.
    Project {
        #[command(flatten)]
        plan: PlanCli,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PlanCli {
    #[arg(long, default_value_t = 35)]
    current_age: u32,
    #[arg(long, default_value_t = 50)]
    retirement_age: u32,
    #[arg(long, default_value_t = 100_000.0)]
    current_wealth: f64,
    #[arg(
        long,
        default_value_t = 2_000.0,
        allow_negative_numbers = true,
        help = "Monthly saving during accumulation; negative for a net outflow"
    )]
    monthly_saving: f64,
    #[arg(long, default_value_t = 3_000.0, help = "Monthly spend in retirement")]
    monthly_spend: f64,
    #[arg(long, default_value_t = 4.0, help = "Safe withdrawal rate in percent")]
    swr: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        allow_negative_numbers = true,
        help = "Real annual return before retirement in percent"
    )]
    accumulation_return: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        allow_negative_numbers = true,
        help = "Real annual return after retirement in percent"
    )]
    retirement_return: f64,
    #[arg(
        long = "lump-sum",
        value_name = "MONTH:AMOUNT",
        allow_hyphen_values = true,
        value_parser = parse_lump_sum_arg,
        help = "One-time contribution; repeatable"
    )]
    lump_sums: Vec<LumpSumArg>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpSumArg {
    month: i32,
    amount: f64,
}

fn parse_lump_sum_arg(raw: &str) -> Result<LumpSumArg, PlanError> {
    let invalid = || PlanError::InvalidLumpSum(raw.to_string());
    let (month, amount) = raw.split_once(':').ok_or_else(invalid)?;
    Ok(LumpSumArg {
        month: month.trim().parse().map_err(|_| invalid())?,
        amount: amount.trim().parse().map_err(|_| invalid())?,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<u32>,
    retirement_age: Option<u32>,
    current_wealth: Option<f64>,
    monthly_saving: Option<f64>,
    monthly_spend: Option<f64>,
    #[serde(alias = "swrPct")]
    swr: Option<f64>,
    #[serde(alias = "accumulationReturnPct")]
    accumulation_return: Option<f64>,
    #[serde(alias = "retirementReturnPct")]
    retirement_return: Option<f64>,
    lump_sums: Vec<LumpSum>,
}

#[derive(Debug)]
struct ApiRequest {
    params: PlanParameters,
    lump_sums: Vec<LumpSum>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    params: PlanParameters,
    lump_sums: Vec<LumpSum>,
    accumulation_months: u32,
    total_months: u32,
    series: ProjectionSeries,
    summary: PlanSummary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve { port } => {
            let env_port = std::env::var(PORT_ENV).ok();
            run_http_server(resolve_port(port, env_port.as_deref())).await?;
        }
        Command::Project { plan, pretty } => {
            let request = api_request_from_cli(plan)?;
            let response = build_project_response(request);
            let json = if pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{json}");
        }
    }
    Ok(())
}

fn resolve_port(flag: Option<u16>, env_value: Option<&str>) -> u16 {
    flag.or_else(|| env_value.and_then(|v| v.trim().parse().ok()))
        .unwrap_or(DEFAULT_PORT)
}

fn build_params(cli: &PlanCli) -> Result<PlanParameters, PlanError> {
    check_age("--current-age", cli.current_age)?;
    check_age("--retirement-age", cli.retirement_age)?;
    check_finite("--current-wealth", cli.current_wealth)?;
    check_finite("--monthly-saving", cli.monthly_saving)?;
    check_finite("--monthly-spend", cli.monthly_spend)?;
    check_finite("--swr", cli.swr)?;
    check_rate("--accumulation-return", cli.accumulation_return)?;
    check_rate("--retirement-return", cli.retirement_return)?;

    Ok(PlanParameters {
        current_age: cli.current_age,
        retirement_age: cli.retirement_age,
        current_wealth: cli.current_wealth,
        monthly_saving: cli.monthly_saving,
        monthly_spend: cli.monthly_spend,
        swr_pct: cli.swr,
        accumulation_return_pct: cli.accumulation_return,
        retirement_return_pct: cli.retirement_return,
    })
}

fn check_finite(field: &'static str, value: f64) -> Result<(), PlanError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PlanError::NonFinite { field })
    }
}

fn check_rate(field: &'static str, value: f64) -> Result<(), PlanError> {
    check_finite(field, value)?;
    if value <= -100.0 {
        return Err(PlanError::RateOutOfRange { field, value });
    }
    Ok(())
}

fn check_age(field: &'static str, value: u32) -> Result<(), PlanError> {
    if value > MAX_AGE {
        return Err(PlanError::AgeOutOfRange {
            field,
            value,
            max: MAX_AGE,
        });
    }
    Ok(())
}

fn check_lump_sums(lump_sums: &[LumpSum]) -> Result<(), PlanError> {
    let mut seen = HashSet::new();
    for lump in lump_sums {
        check_finite("lumpSums.amount", lump.amount)?;
        if !seen.insert(lump.id.as_str()) {
            return Err(PlanError::DuplicateLumpSum(lump.id.clone()));
        }
    }
    Ok(())
}

fn api_request_from_cli(cli: PlanCli) -> Result<ApiRequest, PlanError> {
    let params = build_params(&cli)?;
    let lump_sums: Vec<LumpSum> = cli
        .lump_sums
        .iter()
        .enumerate()
        .map(|(i, arg)| LumpSum {
            id: format!("cli-{}", i + 1),
            month: arg.month,
            amount: arg.amount,
        })
        .collect();
    check_lump_sums(&lump_sums)?;
    Ok(ApiRequest { params, lump_sums })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fireplan HTTP API listening");
    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler)
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload).await
}

async fn project_handler_impl(payload: ProjectPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    debug!(
        accumulation_months = request.params.accumulation_months(),
        total_months = request.params.total_months(),
        lump_sums = request.lump_sums.len(),
        "computing projection"
    );
    json_response(StatusCode::OK, build_project_response(request))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
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
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ProjectPayload) -> Result<ApiRequest, PlanError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.current_age {
        cli.current_age = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.current_wealth {
        cli.current_wealth = v;
    }
    if let Some(v) = payload.monthly_saving {
        cli.monthly_saving = v;
    }
    if let Some(v) = payload.monthly_spend {
        cli.monthly_spend = v;
    }
    if let Some(v) = payload.swr {
        cli.swr = v;
    }
    if let Some(v) = payload.accumulation_return {
        cli.accumulation_return = v;
    }
    if let Some(v) = payload.retirement_return {
        cli.retirement_return = v;
    }

    let params = build_params(&cli)?;
    check_lump_sums(&payload.lump_sums)?;
    Ok(ApiRequest {
        params,
        lump_sums: payload.lump_sums,
    })
}

fn default_cli_for_api() -> PlanCli {
    PlanCli {
        current_age: 35,
        retirement_age: 50,
        current_wealth: 100_000.0,
        monthly_saving: 2_000.0,
        monthly_spend: 3_000.0,
        swr: 4.0,
        accumulation_return: 5.0,
        retirement_return: 3.0,
        lump_sums: Vec::new(),
    }
}

fn build_project_response(request: ApiRequest) -> ProjectResponse {
    let projection = run_plan(&request.params, &request.lump_sums);
    ProjectResponse {
        params: request.params,
        lump_sums: request.lump_sums,
        accumulation_months: projection.summary.accumulation_months,
        total_months: projection.summary.total_months,
        series: projection.series,
        summary: projection.summary,
    }
}
