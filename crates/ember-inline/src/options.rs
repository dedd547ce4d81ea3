use std::path::Path;

use serde::Deserialize;

/// Set to `1` to trace every inline decision regardless of the build file.
pub const TRACE_ENV_VAR: &str = "EMBER_TRACE_INLINE";

#[derive(Debug, thiserror::Error)]
pub enum InlineConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// Knobs of the inliner, read from the `[inline]` table of `ember.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineOptions {
    /// Report every call-site decision through `tracing`.
    pub trace: bool,
    /// Give every spliced copy fresh names for its value binders.
    pub freshen_binders: bool,
}

#[derive(Debug, Default, Deserialize)]
struct EmberToml {
    #[serde(default)]
    inline: InlineOptions,
}

impl InlineOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, InlineConfigError> {
        let file: EmberToml = toml::from_str(text)
            .map_err(|err| InlineConfigError::Config(format!("invalid [inline] options: {err}")))?;
        Ok(file.inline)
    }

    /// Apply `EMBER_TRACE_INLINE` on top of file settings.
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(TRACE_ENV_VAR).ok();
        self.with_trace_override(value.as_deref())
    }

    fn with_trace_override(mut self, value: Option<&str>) -> Self {
        if value == Some("1") {
            self.trace = true;
        }
        self
    }
}

pub fn read_inline_options(path: &Path) -> Result<InlineOptions, InlineConfigError> {
    let text = std::fs::read_to_string(path)?;
    InlineOptions::from_toml_str(&text).map_err(|err| match err {
        InlineConfigError::Config(msg) => {
            InlineConfigError::Config(format!("failed to parse {}: {msg}", path.display()))
        }
        other => other,
    })
}
