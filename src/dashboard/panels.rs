use serde_json::json;

use super::common::*;
use super::datasource::VICTORIA_METRICS;
use super::LayoutError;

/// Settings for an empty dashboard
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub title: String,
    pub uid: String,
    pub tags: Vec<String>,
    pub refresh: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Creates an empty dashboard. Defaults: refresh 30s, last 24 hours, browser
/// timezone. The marker tag is always appended after the caller's tags.
pub fn create_dashboard(config: DashboardConfig) -> Dashboard {
    let DashboardConfig {
        title,
        uid,
        mut tags,
        refresh,
        from,
        to,
    } = config;

    tags.push(MARKER_TAG.to_string());

    Dashboard {
        title,
        uid,
        tags,
        timezone: "browser".to_string(),
        editable: true,
        graph_tooltip: 0,
        time: TimeRange {
            from: from.unwrap_or_else(|| "now-24h".to_string()),
            to: to.unwrap_or_else(|| "now".to_string()),
        },
        refresh: refresh.unwrap_or_else(|| "30s".to_string()),
        schema_version: SCHEMA_VERSION,
        panels: Vec::new(),
    }
}

/// Turns a metric name into a selector. Anything that already looks like an
/// expression (contains `{`, a space, or `(`) is passed through untouched.
pub fn metric_expr(metric: &str) -> String {
    if metric.contains('{') || metric.contains(' ') || metric.contains('(') {
        metric.to_string()
    } else {
        format!("{{__name__=\"{metric}\"}}")
    }
}

fn target(ref_id: &str, expr: String, legend_format: Option<&str>) -> Target {
    Target {
        ref_id: ref_id.to_string(),
        expr,
        datasource: VICTORIA_METRICS,
        legend_format: legend_format.map(str::to_string),
    }
}

pub(crate) fn check_bounds(
    title: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), LayoutError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(LayoutError::InvertedBounds {
            title: title.to_string(),
            min,
            max,
        }),
        _ => Ok(()),
    }
}

/// A single time-series chart
#[derive(Debug, Clone)]
pub struct TimeseriesConfig {
    pub title: String,
    pub metric: String,
    pub unit: String,
    pub grid: GridPos,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Adds the same series shifted back 24 hours, drawn dashed and grey
    pub include_overlay: bool,
    pub legend_format: String,
    pub fill_opacity: u32,
}

impl Default for TimeseriesConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            metric: String::new(),
            unit: "none".to_string(),
            grid: GridPos::new(0, 0, GRID_COLUMNS, BAND_HEIGHT),
            min: None,
            max: None,
            include_overlay: false,
            legend_format: CURRENT_LEGEND.to_string(),
            fill_opacity: 10,
        }
    }
}

pub fn timeseries(config: TimeseriesConfig) -> Result<Panel, LayoutError> {
    check_bounds(&config.title, config.min, config.max)?;

    let expr = metric_expr(&config.metric);

    let legend = config.legend_format.as_str();
    let mut targets = vec![target("A", expr.clone(), Some(legend))];
    let mut overrides = Vec::new();

    if config.include_overlay {
        targets.push(target(
            "B",
            format!("{expr} offset 24h"),
            Some(OVERLAY_LEGEND),
        ));
        overrides.push(FieldOverride::by_name(
            OVERLAY_LEGEND,
            vec![
                OverrideProperty {
                    id: "custom.lineStyle".to_string(),
                    value: json!({ "dash": [10, 10], "fill": "dash" }),
                },
                OverrideProperty {
                    id: "color".to_string(),
                    value: json!({ "mode": "fixed", "fixedColor": OVERLAY_COLOR }),
                },
            ],
        ));
    }

    Ok(Panel::Timeseries(TimeseriesPanel {
        id: 0,
        title: config.title,
        datasource: VICTORIA_METRICS,
        grid_pos: config.grid,
        targets,
        field_config: TimeseriesFieldConfig {
            defaults: TimeseriesDefaults {
                unit: config.unit,
                min: config.min,
                max: config.max,
                custom: TimeseriesCustom {
                    line_width: 2,
                    fill_opacity: config.fill_opacity,
                    show_points: "never",
                    span_nulls: NULL_BRIDGE_MS,
                },
            },
            overrides,
        },
    }))
}

/// A single-value tile
#[derive(Debug, Clone)]
pub struct StatConfig {
    pub title: String,
    /// Metric name or full query expression
    pub metric: String,
    pub unit: String,
    pub grid: GridPos,
    pub graph_mode: GraphMode,
    pub mappings: Option<ValueMapping>,
}

impl Default for StatConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            metric: String::new(),
            unit: "none".to_string(),
            grid: GridPos::new(0, 0, STAT_WIDTH, BAND_HEIGHT),
            graph_mode: GraphMode::Area,
            mappings: None,
        }
    }
}

pub fn stat(config: StatConfig) -> Panel {
    Panel::Stat(StatPanel {
        id: 0,
        title: config.title,
        datasource: VICTORIA_METRICS,
        grid_pos: config.grid,
        targets: vec![target("A", metric_expr(&config.metric), None)],
        field_config: StatFieldConfig {
            defaults: StatDefaults {
                unit: config.unit,
                mappings: config.mappings.into_iter().collect(),
            },
            overrides: Vec::new(),
        },
        options: StatOptions {
            graph_mode: config.graph_mode,
            reduce_options: ReduceOptions::default(),
        },
    })
}

/// A map plotting one position from a latitude and a longitude series
#[derive(Debug, Clone)]
pub struct GeomapConfig {
    pub title: String,
    pub latitude: String,
    pub longitude: String,
    pub unit: String,
    pub grid: GridPos,
}

impl Default for GeomapConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            unit: "degrees".to_string(),
            grid: GridPos::new(0, 0, GRID_COLUMNS, 10),
        }
    }
}

pub fn geomap(config: GeomapConfig) -> Panel {
    let unit_override = |name: &str| {
        FieldOverride::by_name(
            name,
            vec![OverrideProperty {
                id: "unit".to_string(),
                value: json!(config.unit),
            }],
        )
    };

    Panel::Geomap(GeomapPanel {
        id: 0,
        title: config.title.clone(),
        datasource: VICTORIA_METRICS,
        grid_pos: config.grid,
        targets: vec![
            target("A", metric_expr(&config.latitude), None),
            target("B", metric_expr(&config.longitude), None),
        ],
        field_config: GeomapFieldConfig {
            defaults: GeomapDefaults::default(),
            overrides: vec![
                unit_override(&config.latitude),
                unit_override(&config.longitude),
            ],
        },
        options: GeomapOptions {
            view: MapView {
                id: "fit".to_string(),
            },
            layers: vec![MapLayer {
                layer_type: "markers".to_string(),
                name: "Position".to_string(),
                location: LayerLocation {
                    mode: "coords".to_string(),
                    latitude: config.latitude.clone(),
                    longitude: config.longitude.clone(),
                },
            }],
        },
    })
}
