//! Board Patch - command-line driver
//!
//! Keeps a board document on disk and reconciles edits against it, printing
//! the patch list each edit produced.

#![warn(missing_docs)]

mod cli;
mod document;

use anyhow::{Context, Result, bail};
use board_patch::{
    BoardConfig, BoardSession, Intent, MemoryDocument, PatchOpList, Preview, PreviewLayout,
    ResetOutcome,
};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr, patches to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

/// Runs one command against the document.
#[instrument(skip(cli), fields(document = %cli.document.display(), dry_run = cli.dry_run))]
fn run(cli: Cli) -> Result<()> {
    let open = || open_session(&cli.document, cli.config.as_deref());

    let (session, patches) = match cli.command {
        Command::Schema => return print_schema(),
        Command::Show { layout } => return show(&open()?, layout),
        Command::Init { yes } => {
            let mut session = open()?;
            let patches = init(&mut session, yes)?;
            (session, patches)
        }
        Command::Move { from, to, token } => {
            let mut session = open()?;
            let patches = session.handle(&Intent::move_token(from, to, token))?;
            (session, patches)
        }
        Command::SelectDelete { position } => {
            let mut session = open()?;
            session.handle(&Intent::select(position.as_str()))?;
            if session.selection().is_empty() {
                warn!(%position, "Square is empty; nothing to delete");
            }
            let patches = session.press_delete_key()?;
            (session, patches)
        }
        Command::Replay { intents } => {
            let mut session = open()?;
            let patches = replay(&mut session, &intents)?;
            (session, patches)
        }
    };

    println!("{}", serde_json::to_string_pretty(&patches)?);

    if cli.dry_run {
        info!(ops = patches.len(), "Dry run; document left untouched");
    } else if !patches.is_empty() {
        document::save(&cli.document, &session.into_store())?;
    }
    Ok(())
}

/// Loads the config and the document behind a new session.
fn open_session(
    document_path: &Path,
    config: Option<&Path>,
) -> Result<BoardSession<MemoryDocument>> {
    let config = match config {
        Some(path) => BoardConfig::from_file(path)?,
        None => BoardConfig::default(),
    };
    let document = document::load(document_path)?;
    Ok(BoardSession::new(config, document))
}

/// Initializes the board, replacing an existing one only with `yes`.
fn init(session: &mut BoardSession<MemoryDocument>, yes: bool) -> Result<PatchOpList> {
    match session.request_reset()? {
        ResetOutcome::Initialized(patches) => Ok(patches),
        ResetOutcome::AwaitingConfirmation if yes => Ok(session.confirm_reset()?),
        ResetOutcome::AwaitingConfirmation => {
            session.cancel_reset();
            bail!("A board already exists; pass --yes to reset it")
        }
    }
}

/// Applies every intent in `path`, in order.
#[instrument(skip(session), fields(path = %path.display()))]
fn replay(session: &mut BoardSession<MemoryDocument>, path: &Path) -> Result<PatchOpList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read intents {}", path.display()))?;
    let intents: Vec<Intent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse intents {}", path.display()))?;

    let mut patches = PatchOpList::new();
    for intent in &intents {
        patches.extend(session.handle(intent)?);
    }
    info!(intents = intents.len(), ops = patches.len(), "Replay complete");
    Ok(patches)
}

fn show(session: &BoardSession<MemoryDocument>, layout: PreviewLayout) -> Result<()> {
    let board_attribute = session.reconciler().config().board_attribute();
    match Preview::from_document(session.store().value(), board_attribute, layout)? {
        Preview::Block(block) => {
            println!("{}", block.title());
            if !block.description().is_empty() {
                println!("{}", block.description());
            }
            println!("{}", block.view().pieces().join(" "));
        }
        Preview::Default => {
            let view = session.view()?;
            println!("{} entries", view.board().len());
            println!("{}", view.pieces().join(" "));
        }
    }
    Ok(())
}

fn print_schema() -> Result<()> {
    let schema = schemars::schema_for!(PatchOpList);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
