//! Document file persistence.

use anyhow::{Context, Result};
use board_patch::MemoryDocument;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Loads a document. A missing file is an absent (null) document.
#[instrument(fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<MemoryDocument> {
    if !path.exists() {
        debug!("No document yet");
        return Ok(MemoryDocument::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(MemoryDocument::new());
    }
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse document {}", path.display()))?;
    Ok(MemoryDocument::from_value(value))
}

/// Writes a document as pretty-printed JSON.
#[instrument(skip(document), fields(path = %path.display()))]
pub fn save(path: &Path, document: &MemoryDocument) -> Result<()> {
    let content = serde_json::to_string_pretty(document.value())?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("Failed to write document {}", path.display()))?;
    info!("Document saved");
    Ok(())
}
