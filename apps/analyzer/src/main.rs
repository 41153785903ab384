mod backend_bridge;
mod cli;
mod controller;
mod view;

use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::load_settings, HttpPredictionClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{run_analyze, run_interactive, Cli, Command, Renderer};
use crate::controller::orchestration::Session;
use crate::view::ViewState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings()?;
    cli.options.apply(&mut settings);
    settings.validate()?;

    let endpoint = settings.endpoint_url()?;
    let client = HttpPredictionClient::new(endpoint, settings.request_timeout())
        .context("failed to build HTTP client")?;
    info!(
        endpoint = %client.endpoint(),
        timeout_secs = settings.request_timeout_secs,
        "analyzer ready"
    );

    let mut session = Session::new(
        Arc::new(client),
        settings.locale,
        settings.max_upload_bytes,
    );
    let renderer = Renderer {
        locale: settings.locale,
        max_upload_bytes: session.max_upload_bytes(),
        json: cli.options.json,
    };

    match cli.command {
        Command::Analyze { file } => {
            let view = run_analyze(&mut session, file).await;
            info!(request = ?session.state().request, "analysis cycle finished");
            println!("{}", renderer.render(&view)?);
            let succeeded = matches!(view, ViewState::Success { .. });
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Interactive => {
            run_interactive(&mut session, &renderer).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
