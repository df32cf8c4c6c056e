use std::{io::ErrorKind, path::Path};

use miette::{Context, IntoDiagnostic};
use serde::{Deserialize, Serialize};

/// The name of the configuration file, looked up in the output directory.
pub const CONFIG_FILE_NAME: &str = ".zodiac.toml";

/// Configuration for Zod code generation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CodegenConfig {
    pub mode: EmitMode,
    /// Whether to export a type alias for every schema.
    pub export_types: bool,
    /// The module specifier to import `z` from.
    pub zod_import: String,
    /// The file name for [`EmitMode::Aggregated`] output.
    pub aggregate_file: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            mode: EmitMode::default(),
            export_types: true,
            zod_import: "zod".to_owned(),
            aggregate_file: "schemas.ts".to_owned(),
        }
    }
}

impl CodegenConfig {
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads the configuration file from `dir`, or returns the default
    /// configuration if there isn't one.
    pub fn load(dir: &Path) -> miette::Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err)
                    .into_diagnostic()
                    .with_context(|| format!("Failed to read `{}`", path.display()));
            }
        };
        Self::from_toml(&contents)
            .into_diagnostic()
            .with_context(|| format!("Failed to parse `{}`", path.display()))
    }
}

/// How generated schemas are laid out on disk.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmitMode {
    /// A single file with every schema, in dependency order.
    /// Fails on any reference cycle.
    Aggregated,

    /// One file per schema, plus an `index.ts` that re-exports them all.
    /// Reference cycles are emitted with `z.lazy`.
    #[default]
    PerSchema,
}
