use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use tasklist_core::config::{LoadedConfig, StoreConfig, TuiConfig};

use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Configuration after flags, environment, and file have been merged.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub path: Option<String>,
    pub found: bool,
    pub resolved_output: &'static str,
    pub store: StoreConfig,
    pub tui: TuiConfig,
}

impl EffectiveConfig {
    pub fn new(loaded: &LoadedConfig, output: OutputMode, seed: bool) -> Self {
        Self {
            path: loaded.path.as_ref().map(|p| p.display().to_string()),
            found: loaded.found,
            resolved_output: output.name(),
            store: StoreConfig { seed },
            tui: loaded.config.tui.clone(),
        }
    }
}

fn write_effective(value: &EffectiveConfig, w: &mut dyn Write, mode: OutputMode) -> io::Result<()> {
    let path = value.path.as_deref().unwrap_or("(none)");
    match mode {
        OutputMode::Pretty => {
            pretty_section(w, "Configuration")?;
            pretty_kv(w, "File", path)?;
            pretty_kv(w, "Found", value.found)?;
            pretty_kv(w, "Output", value.resolved_output)?;
            pretty_kv(w, "Seed", value.store.seed)?;
            pretty_kv(w, "Tick", format!("{}ms", value.tui.tick_ms))?;
            pretty_kv(w, "Status TTL", format!("{}ms", value.tui.status_ttl_ms))
        }
        OutputMode::Text | OutputMode::Json => {
            writeln!(w, "path={path}")?;
            writeln!(w, "found={}", value.found)?;
            writeln!(w, "resolved_output={}", value.resolved_output)?;
            writeln!(w, "store.seed={}", value.store.seed)?;
            writeln!(w, "tui.tick_ms={}", value.tui.tick_ms)?;
            writeln!(w, "tui.status_ttl_ms={}", value.tui.status_ttl_ms)
        }
    }
}

/// Execute `tl config`.
pub fn run_config(effective: &EffectiveConfig, output: OutputMode) -> Result<()> {
    render(output, effective, |value, w| write_effective(value, w, output))
}
