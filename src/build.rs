use std::fs;
use std::path::{Path, PathBuf};

use ringlog::*;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::dashboard::common::NULL_BRIDGE_MS;
use crate::dashboard::{Dashboard, DashboardDef, LayoutError};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("dashboard '{name}': {source}")]
    Layout {
        name: &'static str,
        source: LayoutError,
    },
    #[error("failed to serialize dashboard '{name}': {source}")]
    Serialize {
        name: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to create output directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} of {total} dashboards failed", .errors.len())]
    Failed {
        total: usize,
        errors: Vec<BuildError>,
    },
}

impl BuildError {
    /// Individual failures collected into a [`BuildError::Failed`]
    pub fn failures(&self) -> &[BuildError] {
        match self {
            BuildError::Failed { errors, .. } => errors,
            _ => &[],
        }
    }
}

/// Forces the null-bridging threshold onto every time-series panel of a
/// serialized dashboard, creating the intermediate objects when missing.
/// Other panel types are left untouched.
pub fn bridge_nulls(dashboard: &mut Value) {
    let Some(panels) = dashboard.get_mut("panels").and_then(Value::as_array_mut) else {
        return;
    };

    for panel in panels {
        if panel.get("type").and_then(Value::as_str) != Some("timeseries") {
            continue;
        }

        let Some(panel) = panel.as_object_mut() else {
            continue;
        };

        let path = ["fieldConfig", "defaults", "custom"];
        let custom = path.into_iter().try_fold(panel, |object, key| {
            object
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
        });

        match custom {
            Some(custom) => {
                custom.insert("spanNulls".to_string(), json!(NULL_BRIDGE_MS));
            }
            None => warn!("panel has a malformed field config, not bridging nulls"),
        }
    }
}

/// Serializes a dashboard into the import payload written to disk
pub fn render(name: &'static str, dashboard: &Dashboard) -> Result<String, BuildError> {
    let mut model =
        serde_json::to_value(dashboard).map_err(|source| BuildError::Serialize { name, source })?;

    bridge_nulls(&mut model);

    let payload = json!({
        "dashboard": model,
        "overwrite": true,
    });

    serde_json::to_string_pretty(&payload).map_err(|source| BuildError::Serialize { name, source })
}

fn write(output_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf, BuildError> {
    let path = output_dir.join(file_name);
    fs::write(&path, contents).map_err(|source| BuildError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// A generated dashboard ready to be written
pub struct Rendered {
    pub def: &'static DashboardDef,
    pub panels: usize,
    pub contents: String,
}

/// Builds and renders every dashboard. Nothing is returned unless all of them
/// succeed, so a broken definition never produces a partial set.
pub fn render_all(defs: &'static [DashboardDef]) -> Result<Vec<Rendered>, BuildError> {
    let mut rendered = Vec::with_capacity(defs.len());
    let mut errors = Vec::new();

    for def in defs {
        let result = (def.build)()
            .map_err(|source| BuildError::Layout {
                name: def.name,
                source,
            })
            .and_then(|dashboard| {
                let contents = render(def.name, &dashboard)?;
                Ok(Rendered {
                    def,
                    panels: dashboard.panel_count(),
                    contents,
                })
            });

        match result {
            Ok(r) => rendered.push(r),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(rendered)
    } else {
        Err(BuildError::Failed {
            total: defs.len(),
            errors,
        })
    }
}

/// Writes rendered dashboards to `output_dir`. Each file is independent: a
/// failed write is recorded and the remaining files are still written.
pub fn write_all(output_dir: &Path, rendered: &[Rendered]) -> Result<Vec<PathBuf>, BuildError> {
    fs::create_dir_all(output_dir).map_err(|source| BuildError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(rendered.len());
    let mut errors = Vec::new();

    for r in rendered {
        match write(output_dir, r.def.file_name, &r.contents) {
            Ok(path) => {
                println!("Wrote {}", path.display());
                written.push(path);
            }
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(written)
    } else {
        Err(BuildError::Failed {
            total: rendered.len(),
            errors,
        })
    }
}

/// Generates the given dashboards into `output_dir`
pub fn run(output_dir: &Path, defs: &'static [DashboardDef]) -> Result<Vec<PathBuf>, BuildError> {
    println!("Building Grafana dashboards...");

    let rendered = render_all(defs)?;
    for r in &rendered {
        println!("  - {} ({} panels)", r.def.name, r.panels);
    }

    let written = write_all(output_dir, &rendered)?;

    let total: usize = rendered.iter().map(|r| r.panels).sum();
    println!(
        "Done! Generated {} dashboards with {} panels total.",
        written.len(),
        total
    );
    info!(
        "time-series panels bridge gaps shorter than {} minutes",
        NULL_BRIDGE_MS / 60_000
    );

    Ok(written)
}
