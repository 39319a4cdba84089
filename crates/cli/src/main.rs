use crate::{
    error::CliError,
    notify::ConsoleNotifier,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use commands::Commands;
use connectors::{
    file::input::read_input,
    http::{client::HttpTransport, token::StaticToken},
};
use engine_config::{
    env::EnvManager,
    settings::{ImportSettings, validator::SettingsValidator},
};
use engine_core::{error::SessionError, session::ImportSession, submit::Submitter};
use model::{
    execution::strategy::SubmitStrategy,
    schema::resource::{ImportSchema, Resource},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod notify;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "aims-import",
    version = "0.1.0",
    about = "Bulk CSV/JSON import for the academic records backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    match run(cli.command, &shutdown).await {
        Ok(()) => ExitCode::Success.into(),
        Err(CliError::ShutdownRequested) => {
            warn!("Import interrupted; nothing further was applied locally");
            ExitCode::ShutdownRequested.into()
        }
        Err(err) => {
            if !err.already_notified() {
                error!("{err}");
            }
            ExitCode::GeneralError.into()
        }
    }
}

async fn run(command: Commands, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    match command {
        Commands::Schemas { json } => output::print_schemas(json)?,
        Commands::Preview {
            resource,
            file,
            mime,
            limit,
            json,
        } => {
            let env = EnvManager::from_process();
            let mut settings = ImportSettings::from_env(&env)?;
            if let Some(limit) = limit {
                settings.preview_limit = limit;
            }
            SettingsValidator::new(false).validate(&settings)?;

            preview(resource, &file, mime.as_deref(), &settings, json, shutdown).await?;
        }
        Commands::Submit {
            resource,
            file,
            mime,
            strategy,
            api_url,
            token,
            env_file,
            output,
        } => {
            let settings = submit_settings(api_url, token, strategy, env_file.as_deref())?;
            let strategy = settings.strategy_for(resource);
            info!("Importing {resource} from {} ({strategy})", file.display());

            submit(
                resource,
                &file,
                mime.as_deref(),
                &settings,
                strategy,
                output,
                shutdown,
            )
            .await?;
        }
    }
    Ok(())
}

/// Process env, then the optional env file, then flags.
fn submit_settings(
    api_url: Option<String>,
    token: Option<String>,
    strategy: Option<SubmitStrategy>,
    env_file: Option<&Path>,
) -> Result<ImportSettings, CliError> {
    let mut env = EnvManager::from_process();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }

    let mut settings = ImportSettings::from_env(&env)?;
    if api_url.is_some() {
        settings.api_url = api_url;
    }
    if token.is_some() {
        settings.auth_token = token;
    }
    if strategy.is_some() {
        settings.strategy = strategy;
    }

    SettingsValidator::new(true).validate(&settings)?;
    Ok(settings)
}

fn open_session(resource: Resource, shutdown: &ShutdownCoordinator) -> ImportSession {
    ImportSession::with_token(
        ImportSchema::for_resource(resource),
        Arc::new(ConsoleNotifier),
        shutdown.session_token(),
    )
}

async fn preview(
    resource: Resource,
    file: &Path,
    mime: Option<&str>,
    settings: &ImportSettings,
    as_json: bool,
    shutdown: &ShutdownCoordinator,
) -> Result<(), CliError> {
    let input = read_input(file, mime).await?;
    let mut session = open_session(resource, shutdown);
    let summary = session.load(&input)?;

    let rejected = session
        .rejected()
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>();
    let slice = session.preview(settings.preview_limit)?;
    output::print_preview(summary, &slice, &rejected, as_json)
}

async fn submit(
    resource: Resource,
    file: &Path,
    mime: Option<&str>,
    settings: &ImportSettings,
    strategy: SubmitStrategy,
    output: Option<PathBuf>,
    shutdown: &ShutdownCoordinator,
) -> Result<(), CliError> {
    let api_url = settings.require_api_url()?;
    let transport = HttpTransport::new(
        api_url,
        settings.timeout(),
        Arc::new(StaticToken::new(settings.auth_token.clone())),
    )?;
    let submitter = Submitter::new(Arc::new(transport));

    let input = read_input(file, mime).await?;
    let mut session = open_session(resource, shutdown);
    let summary = session.load(&input)?;
    if summary.rejected > 0 {
        warn!(
            "{} row(s) failed validation and will not be sent",
            summary.rejected
        );
    }
    session.preview(settings.preview_limit)?;

    let report = match session.submit(&submitter, strategy).await {
        Ok(report) => report,
        Err(SessionError::Closed) if shutdown.is_shutdown_requested() => {
            return Err(CliError::ShutdownRequested);
        }
        Err(err) => return Err(err.into()),
    };

    match output {
        Some(path) => {
            output::write_report(report, &path).await?;
            info!("Report written to {}", path.display());
        }
        None => output::print_report(report),
    }
    Ok(())
}
