//! Upload service: accepts one HTML statement per request and answers with
//! the converted notification document as a download. Each request builds
//! its own statement, nothing is shared between conversions.

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use clap::Parser;
use izvod::{BankStatement, HtmlData};
use serde_json::json;
use std::process;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Uploads above this size are rejected before any parsing happens.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Form field the upload page submits the statement under.
const UPLOAD_FIELD: &str = "html_file";

#[derive(Parser, Debug)]
#[command(
    name = "web_converter",
    version,
    about = "Web servis za konverziju HTML izvoda u iBank XML.",
    long_about = None,
)]
struct Args {
    /// Adresa i port na kojima servis sluša
    #[arg(long, default_value = "0.0.0.0:5000")]
    listen: String,
}

/// Errors reported to the uploading client as a JSON body.
///
/// The upload checks and the empty-statement policy are client errors; only
/// a failure inside the conversion itself maps to a 500, with the underlying
/// message attached.
#[derive(Debug, Error)]
enum ApiError {
    #[error("Fajl nije pronađen")]
    MissingFile,
    #[error("Niste odabrali fajl")]
    EmptyFilename,
    #[error("Nedozvoljen tip fajla. Dozvoljeni su samo .html i .htm fajlovi")]
    DisallowedExtension,
    #[error("Greška pri upload-u fajla: {0}")]
    Upload(String),
    #[error("HTML fajl ne sadrži validne transakcije")]
    NoTransactions,
    #[error("Greška pri konverziji: {0}")]
    Conversion(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<(), std::io::Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("web_converter=info,tower_http=info")),
        )
        .init();

    let app = Router::new()
        .route("/", get(index))
        .route("/convert", post(convert))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!("listening on {}", args.listen);

    axum::serve(listener, app).await
}

/// GET / - upload page
async fn index() -> impl IntoResponse {
    Html(include_str!("../static/index.html"))
}

/// GET /health - health check
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// POST /convert - multipart upload, answers with the XML as an attachment
async fn convert(mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))?;

        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(ApiError::MissingFile);
    };

    if file_name.is_empty() {
        return Err(ApiError::EmptyFilename);
    }
    if !has_allowed_extension(&file_name) {
        return Err(ApiError::DisallowedExtension);
    }

    let data =
        HtmlData::parse(bytes.as_slice()).map_err(|e| ApiError::Conversion(e.to_string()))?;
    let statement = BankStatement::from(data);

    if statement.transactions.is_empty() {
        return Err(ApiError::NoTransactions);
    }

    let mut xml = Vec::new();
    statement
        .write_ibank(&mut xml)
        .map_err(|e| ApiError::Conversion(e.to_string()))?;

    info!(
        file = %file_name,
        transactions = statement.transactions.len(),
        "converted statement"
    );

    let attachment = format!(
        "attachment; filename=\"{}.xml\"",
        sanitized_stem(&file_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/xml".to_string()),
            (header::CONTENT_DISPOSITION, attachment),
        ],
        xml,
    )
        .into_response())
}

fn has_allowed_extension(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// Reduces an uploaded file name to a stem safe to echo back in a
/// Content-Disposition header.
fn sanitized_stem(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map_or(file_name, |(stem, _)| stem);

    let cleaned: String = stem
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "izvod".to_string()
    } else {
        cleaned.to_string()
    }
}
