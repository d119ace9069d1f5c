//! Dotenv file persistence

use std::path::{Path, PathBuf};
use crate::application::errors::StorageError;

/// A `.env` file that can have single variables written into it
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `name=value`, replacing an existing assignment or appending one
    pub async fn upsert(&self, name: &str, value: &str) -> Result<(), StorageError> {
        let updated = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => upsert_line(&content, name, value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => format!("{}={}\n", name, value),
            Err(e) => return Err(e.into()),
        };

        tokio::fs::write(&self.path, updated).await?;
        Ok(())
    }
}

/// Replace the first line assigning `name`, or append a new assignment.
///
/// Only the first match is rewritten; the rest of the file is preserved byte
/// for byte.
pub fn upsert_line(content: &str, name: &str, value: &str) -> String {
    let prefix = format!("{}=", name);
    let assignment = format!("{}={}\n", name, value);

    let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();

    match lines.iter().position(|l| l.trim().starts_with(&prefix)) {
        Some(i) => lines[i] = assignment,
        None => lines.push(format!("\n{}", assignment)),
    }

    lines.concat()
}
