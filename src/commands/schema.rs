//! Shows how the price file's header row is interpreted.

use crate::catalog::loader;
use crate::catalog::ColumnMap;
use crate::config::{Config, OutputFormat};
use crate::error::ColumnRole;
use anyhow::{Context, Result};
use std::path::Path;

/// Prints headers and the inferred column mapping.
pub struct SchemaCommand {
    config: Config,
}

impl SchemaCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads the header row of `path` and describes the mapping.
    pub fn execute(&self, path: &Path) -> Result<String> {
        let columns = loader::inspect(path, &self.config.load_options())
            .with_context(|| format!("Failed to read catalog schema: {}", path.display()))?;

        Ok(match self.config.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(&columns).unwrap_or_else(|_| "{}".to_string())
            }
            _ => describe(&columns),
        })
    }
}

fn describe(columns: &ColumnMap) -> String {
    let mut lines =
        vec![format!("{:>3}  {:<30}  {}", "#", "Header", "Role"), format!("{:-<50}", "")];

    for (i, header) in columns.headers.iter().enumerate() {
        let role = [ColumnRole::Sku, ColumnRole::Description, ColumnRole::Price]
            .into_iter()
            .find(|&r| columns.index(r) == i)
            .map(|r| r.to_string())
            .unwrap_or_default();
        lines.push(format!("{:>3}  {:<30}  {}", i + 1, header, role).trim_end().to_string());
    }

    lines.join("\n")
}
