use anyhow::{Context, Result};
use polyreduce::{ReduceCfg, Stats, ToleranceLevel};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What a run did, recorded next to its output.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub stats: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            stats: Value::Null,
        }
    }

    pub fn with_stats(mut self, stats: Value) -> Self {
        self.stats = stats;
        self
    }
}

/// Write `<artifact>.provenance.json` with the code revision, params, stats and outputs.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let doc = json!({
        "code_rev": current_git_rev(),
        "version": polyreduce::VERSION,
        "command": payload.command,
        "params": payload.params,
        "stats": payload.stats,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    let mut name = stem;
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Effective reduction parameters, in the units they are configured in.
pub fn cfg_json(cfg: &ReduceCfg) -> Value {
    json!({
        "max_vertex_count": cfg.max_vertex_count,
        "minimum_area_m2": cfg.minimum_area.0,
        "default_circle_radius_m": cfg.default_circle_radius.0,
        "tolerance_deg": {
            "low": cfg.ladder.low.0,
            "medium": cfg.ladder.medium.0,
            "large": cfg.ladder.large.0,
        }
    })
}

pub fn stats_json(stats: &Stats) -> Value {
    json!({
        "total_polygons": stats.total_polygons,
        "pass_through": stats.pass_through,
        "scaled_polygons": stats.scaled_polygons,
        "converted_to_circle": stats.converted_to_circle,
        "degenerate": stats.degenerate,
        "reduced_at_level": {
            "low": stats.reduced(ToleranceLevel::Low),
            "medium": stats.reduced(ToleranceLevel::Medium),
            "large": stats.reduced(ToleranceLevel::Large),
        }
    })
}

pub fn current_git_rev() -> String {
    if let Some(from_env) = option_env!("GIT_COMMIT") {
        if !from_env.is_empty() {
            return from_env.to_string();
        }
    }
    if let Ok(env_override) = std::env::var("GIT_COMMIT") {
        if !env_override.is_empty() {
            return env_override;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".to_string())
}
