use std::{io::Write as _, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::config::Settings;
use shared::error::Locale;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::controller::{events::AppEvent, orchestration::Session};
use crate::view::{render_json, render_text, ViewState};

#[derive(Parser, Debug)]
#[command(name = "analyzer", about = "Upload an image to a classification service")]
pub struct Cli {
    #[command(flatten)]
    pub options: SessionOptions,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct SessionOptions {
    /// Prediction endpoint, e.g. https://host/predict
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    pub max_upload_bytes: Option<u64>,
    #[arg(long, global = true, value_parser = parse_locale)]
    pub locale: Option<Locale>,
    /// Render views as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one select, preview, analyze cycle for FILE.
    Analyze { file: PathBuf },
    /// Read `select <path>`, `analyze`, `reset`, `show`, `quit` from stdin.
    Interactive,
}

fn parse_locale(raw: &str) -> Result<Locale, String> {
    Locale::try_from(raw.to_string())
}

impl SessionOptions {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.endpoint {
            settings.endpoint = v.clone();
        }
        if let Some(v) = self.timeout_secs {
            settings.request_timeout_secs = v;
        }
        if let Some(v) = self.max_upload_bytes {
            settings.max_upload_bytes = v;
        }
        if let Some(v) = self.locale {
            settings.locale = v;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Select(PathBuf),
    Analyze,
    Reset,
    Show,
    Help,
    Quit,
}

pub fn parse_session_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "select" | "open" if !rest.is_empty() => SessionCommand::Select(PathBuf::from(rest)),
        "select" | "open" => return Err("usage: select <path>".to_string()),
        "analyze" | "analyse" => SessionCommand::Analyze,
        "reset" | "retry" | "clear" => SessionCommand::Reset,
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type `help`")),
    };
    Ok(Some(command))
}

const HELP: &str = "commands: select <path> | analyze | reset | show | help | quit";

pub struct Renderer {
    pub locale: Locale,
    pub max_upload_bytes: u64,
    pub json: bool,
}

impl Renderer {
    pub fn render(&self, view: &ViewState) -> Result<String> {
        if self.json {
            render_json(view).context("failed to serialize view")
        } else {
            Ok(render_text(view, self.locale, self.max_upload_bytes))
        }
    }

    fn print(&self, view: &ViewState) -> Result<()> {
        let rendered = self.render(view)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        stdout.flush()?;
        Ok(())
    }
}

/// One full cycle for a single file. Returns the final view.
pub async fn run_analyze(session: &mut Session, file: PathBuf) -> ViewState {
    if session.select_path(&file).await {
        session.settle().await;
        session.dispatch(AppEvent::AnalyzeRequested);
        session.settle().await;
    }
    session.view()
}

pub async fn run_interactive(session: &mut Session, renderer: &Renderer) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    renderer.print(&session.view())?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_session_command(&line) {
                    Ok(None) => continue,
                    Ok(Some(SessionCommand::Quit)) => break,
                    Ok(Some(SessionCommand::Help)) => println!("{HELP}"),
                    Ok(Some(SessionCommand::Show)) => renderer.print(&session.view())?,
                    Ok(Some(SessionCommand::Select(path))) => {
                        session.select_path(&path).await;
                        renderer.print(&session.view())?;
                    }
                    Ok(Some(SessionCommand::Analyze)) => {
                        session.dispatch(AppEvent::AnalyzeRequested);
                        renderer.print(&session.view())?;
                    }
                    Ok(Some(SessionCommand::Reset)) => {
                        session.dispatch(AppEvent::ResetRequested);
                        renderer.print(&session.view())?;
                    }
                    Err(message) => eprintln!("{message}"),
                }
            }
            Some(event) = session.next_completion() => {
                let before = session.view();
                session.dispatch(event);
                let after = session.view();
                if after != before {
                    renderer.print(&after)?;
                }
            }
        }
    }
    Ok(())
}
