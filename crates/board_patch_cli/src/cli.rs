//! Command-line interface for board_patch.

use board_patch::PreviewLayout;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Board Patch - reconcile board edits into document patches
#[derive(Parser, Debug)]
#[command(name = "board_patch")]
#[command(about = "Turn board edits into minimal document patches", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON document holding the board (created if it doesn't exist)
    #[arg(short, long, global = true, default_value = "board.json")]
    pub document: PathBuf,

    /// TOML config with type name, board attribute and starting lineup
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the patches without writing the document
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the starting lineup (asks for --yes if a board exists)
    Init {
        /// Replace an existing board
        #[arg(short, long)]
        yes: bool,
    },

    /// Move a token between squares
    Move {
        /// Source square
        #[arg(long)]
        from: String,

        /// Destination square
        #[arg(long)]
        to: String,

        /// Token being moved
        #[arg(long)]
        token: String,
    },

    /// Select a square and press delete
    SelectDelete {
        /// Square to clear
        #[arg(long)]
        position: String,
    },

    /// Print the board and its preview
    Show {
        /// Preview layout (block or default)
        #[arg(long, default_value = "block")]
        layout: PreviewLayout,
    },

    /// Apply a JSON array of intents in order
    Replay {
        /// File containing the intents
        #[arg(long)]
        intents: PathBuf,
    },

    /// Print the JSON schema of a patch list
    Schema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move() {
        let cli = Cli::parse_from([
            "board_patch", "--dry-run", "move", "--from", "e2", "--to", "e4", "--token", "P",
        ]);
        assert!(cli.dry_run);
        assert_eq!(cli.document, PathBuf::from("board.json"));
        match cli.command {
            Command::Move { from, to, token } => {
                assert_eq!((from.as_str(), to.as_str(), token.as_str()), ("e2", "e4", "P"));
            }
            other => panic!("Expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_show_layout() {
        let cli = Cli::parse_from(["board_patch", "show", "--layout", "default"]);
        assert!(matches!(
            cli.command,
            Command::Show {
                layout: PreviewLayout::Default
            }
        ));
    }

    #[test]
    fn test_global_document_after_subcommand() {
        let cli = Cli::parse_from(["board_patch", "init", "--yes", "--document", "game.json"]);
        assert_eq!(cli.document, PathBuf::from("game.json"));
        assert!(matches!(cli.command, Command::Init { yes: true }));
    }
}
