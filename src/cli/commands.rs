//! CLI command implementations

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;

use crate::config::AppConfig;
use crate::explain::OpenAiExplainer;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::notify::SmtpNotifier;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::store::{IndexedRequest, RecordStore, RequestStatus};
use crate::workflow::OutpassWorkflow;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            data_file,
        } => serve(config.as_deref(), port, data_file),
        Command::List { config, data_file } => list(config.as_deref(), data_file),
    }
}

fn resolve_config(config_path: Option<&Path>, data_file: Option<PathBuf>) -> CliResult<AppConfig> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(data_file) = data_file {
        config.data_file = data_file;
    }
    Ok(config)
}

/// Boot the workflow and serve HTTP until Ctrl-C or a listener failure
pub fn serve(
    config_path: Option<&Path>,
    port: Option<u16>,
    data_file: Option<PathBuf>,
) -> CliResult<()> {
    let mut config = resolve_config(config_path, data_file)?;
    if let Some(port) = port {
        config.port = port;
    }

    let data_file_field = config.data_file.display().to_string();
    let ai_enabled = config.openai_api_key.is_some().to_string();
    Logger::info(
        Event::ConfigLoaded,
        &[
            ("ai_enabled", ai_enabled.as_str()),
            ("approver", config.approver_email.as_str()),
            ("data_file", data_file_field.as_str()),
            ("smtp_host", config.smtp_host.as_str()),
        ],
    );

    // reqwest's blocking client must be created outside the async runtime
    let explainer = OpenAiExplainer::new(config.explain()).map_err(|e| {
        CliError::config_error(format!("Failed to initialize AI provider: {}", e))
    })?;

    let workflow = OutpassWorkflow::open(
        RecordStore::open(&config.data_file),
        Arc::new(explainer),
        Arc::new(SmtpNotifier::new(config.email())),
        config.workflow(),
    )
    .map_err(|e| {
        let error = e.to_string();
        log_event_with_fields(Event::StartupFailed, &[("error", error.as_str())]);
        CliError::from(e)
    })?;

    run_server(config.server(), Arc::new(workflow), async {
        let _ = tokio::signal::ctrl_c().await;
    })
}

/// Run the HTTP server on a fresh runtime until `shutdown` resolves.
///
/// The workflow owns a blocking HTTP client, which panics if its last
/// reference is dropped on a runtime thread. This function keeps that
/// reference and releases it only after the runtime is gone.
fn run_server<F>(
    server_config: HttpServerConfig,
    workflow: Arc<OutpassWorkflow>,
    shutdown: F,
) -> CliResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let server = HttpServer::new(server_config, workflow.clone());
    let result = rt.block_on(async move {
        server
            .start(shutdown)
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    });

    drop(rt);
    drop(workflow);
    result
}

/// Print every stored request with its index
pub fn list(config_path: Option<&Path>, data_file: Option<PathBuf>) -> CliResult<()> {
    let config = resolve_config(config_path, data_file)?;
    let store = RecordStore::open(&config.data_file);

    let records = store
        .load_all()
        .map_err(|e| CliError::store_error(e.to_string()))?;

    let pending = records
        .iter()
        .filter(|r| r.status == RequestStatus::Pending)
        .count();

    let requests: Vec<IndexedRequest> = records
        .into_iter()
        .enumerate()
        .map(|(index, request)| IndexedRequest { index, request })
        .collect();

    write_response(json!({
        "data_file": config.data_file.display().to_string(),
        "count": requests.len(),
        "pending": pending,
        "requests": requests,
    }))
}
