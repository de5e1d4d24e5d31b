mod collector;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

pub use collector::{FieldValue, RawInput, amount_arg, parse_amount, whole_years};

use crate::core::{
    DisplayResult, Field, FieldMessages, Locale, ProjectionInput, ProjectionResult, Timeline,
    ValidationError, Verdict, calculate, timeline,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliLocale {
    En,
    Th,
}

impl From<CliLocale> for Locale {
    fn from(value: CliLocale) -> Self {
        match value {
            CliLocale::En => Locale::En,
            CliLocale::Th => Locale::Th,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ApiLocale {
    #[serde(alias = "EN", alias = "en-US", alias = "en-GB")]
    En,
    #[serde(alias = "TH", alias = "th-TH")]
    Th,
}

impl From<ApiLocale> for Locale {
    fn from(value: ApiLocale) -> Self {
        match value {
            ApiLocale::En => Locale::En,
            ApiLocale::Th => Locale::Th,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "retire",
    about = "Retirement sufficiency calculator: projected savings vs. retirement spending"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one calculation and print the result
    Calc(CalcArgs),
    /// Serve the calculation API over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Current age in years; fractions are truncated"
    )]
    pub current_age: f64,
    #[arg(long, default_value = "0", value_parser = amount_arg)]
    pub retire_age: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Expected age at death; spending is funded until then"
    )]
    pub death_age: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Current salary (informational only)"
    )]
    pub current_salary: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Monthly living expense in today's money, e.g. 20,000"
    )]
    pub current_expense: f64,
    #[arg(long, default_value = "0", value_parser = amount_arg)]
    pub current_savings: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Expected annual return before retirement in percent, e.g. 7"
    )]
    pub annual_return: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Expected annual return after retirement in percent, e.g. 4"
    )]
    pub post_retirement_return: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Expected annual inflation in percent"
    )]
    pub inflation_rate: f64,
    #[arg(
        long,
        default_value = "0",
        value_parser = amount_arg,
        help = "Amount to leave behind at death"
    )]
    pub legacy: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(
        long,
        value_enum,
        default_value_t = CliLocale::En,
        help = "Language for validation messages"
    )]
    pub locale: CliLocale,
}

pub fn build_input(args: &CalcArgs) -> ProjectionInput {
    ProjectionInput {
        current_age: whole_years(args.current_age),
        retire_age: whole_years(args.retire_age),
        death_age: whole_years(args.death_age),
        current_salary: args.current_salary,
        current_expense: args.current_expense,
        current_savings: args.current_savings,
        annual_return_before_retire: args.annual_return / 100.0,
        annual_return_after_retire: args.post_retirement_return / 100.0,
        inflation_rate: args.inflation_rate / 100.0,
        legacy_target: args.legacy,
    }
}

/// Runs one calculation and renders it in the requested format.
pub fn run_calc(args: &CalcArgs) -> Result<String, ApiError> {
    let input = build_input(args);
    let result = calculate(&input)?;
    log::debug!(
        "calculated {}y saving / {}y spending: {:?}",
        result.savings_period_years,
        result.spending_period_years,
        result.verdict()
    );

    let display = DisplayResult::from_result(&result);
    match args.format {
        OutputFormat::Text => Ok(display.render_text()),
        OutputFormat::Json => {
            let body = CalculateResponse::new(result, display);
            Ok(format!("{}\n", serde_json::to_string_pretty(&body)?))
        }
    }
}

/// One message per line for every violation, in rule order.
pub fn render_violations(err: &ValidationError, locale: Locale) -> String {
    err.violations
        .iter()
        .map(|v| format!("{}: {}", field_key(v.field()), v.message(locale)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn field_key(field: Field) -> &'static str {
    match field {
        Field::CurrentAge => "currentAge",
        Field::RetireAge => "retireAge",
        Field::DeathAge => "deathAge",
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    current_age: Option<FieldValue>,
    retire_age: Option<FieldValue>,
    death_age: Option<FieldValue>,
    current_salary: Option<FieldValue>,
    current_expense: Option<FieldValue>,
    current_savings: Option<FieldValue>,
    annual_return: Option<FieldValue>,
    post_retirement_return: Option<FieldValue>,
    inflation_rate: Option<FieldValue>,
    #[serde(alias = "legacyTarget")]
    legacy: Option<FieldValue>,
    locale: Option<ApiLocale>,
}

impl CalculatePayload {
    fn into_parts(self) -> (RawInput, Locale) {
        let locale = self.locale.map(Locale::from).unwrap_or_default();
        let raw = RawInput {
            current_age: self.current_age,
            retire_age: self.retire_age,
            death_age: self.death_age,
            current_salary: self.current_salary,
            current_expense: self.current_expense,
            current_savings: self.current_savings,
            annual_return: self.annual_return,
            post_retirement_return: self.post_retirement_return,
            inflation_rate: self.inflation_rate,
            legacy: self.legacy,
        };
        (raw, locale)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    valid: bool,
    verdict: Verdict,
    result: ProjectionResult,
    display: DisplayResult,
}

impl CalculateResponse {
    fn new(result: ProjectionResult, display: DisplayResult) -> Self {
        Self {
            valid: true,
            verdict: result.verdict(),
            result,
            display,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViolationBody {
    field: Field,
    code: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RejectedResponse {
    valid: bool,
    violations: Vec<ViolationBody>,
    messages: FieldMessages,
    timeline: Timeline,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
enum Evaluation {
    Accepted(CalculateResponse),
    Rejected(RejectedResponse),
}

fn evaluate_payload(payload: CalculatePayload) -> Evaluation {
    let (raw, locale) = payload.into_parts();
    evaluate_input(&raw.collect(), locale)
}

fn evaluate_input(input: &ProjectionInput, locale: Locale) -> Evaluation {
    match calculate(input) {
        Ok(result) => Evaluation::Accepted(CalculateResponse::new(
            result,
            DisplayResult::from_result(&result),
        )),
        Err(err) => {
            let violations = err
                .violations
                .iter()
                .map(|v| ViolationBody {
                    field: v.field(),
                    code: v.code(),
                    message: v.message(locale),
                })
                .collect();
            Evaluation::Rejected(RejectedResponse {
                valid: false,
                violations,
                messages: FieldMessages::from_violations(&err.violations, locale),
                timeline: timeline(input),
            })
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    log::info!("retirement calculator API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/api/calculate");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(
    payload: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => calculate_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn calculate_post_handler(
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => calculate_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    match evaluate_payload(payload) {
        Evaluation::Accepted(body) => {
            log::debug!(
                "calculate: {}y saving / {}y spending -> {:?}",
                body.result.savings_period_years,
                body.result.spending_period_years,
                body.verdict
            );
            json_response(StatusCode::OK, body)
        }
        Evaluation::Rejected(body) => {
            let codes: Vec<&str> = body.violations.iter().map(|v| v.code).collect();
            log::info!("calculate rejected: {}", codes.join(", "));
            json_response(StatusCode::UNPROCESSABLE_ENTITY, body)
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
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
