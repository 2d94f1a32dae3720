use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::datasource::DataSourceRef;

/// Width of the dashboard grid in columns
pub const GRID_COLUMNS: u32 = 24;
/// Vertical space consumed by a row separator
pub const ROW_HEIGHT: u32 = 1;
/// Height of a time-series + stat band
pub const BAND_HEIGHT: u32 = 8;
pub const TIMESERIES_WIDTH: u32 = 18;
pub const STAT_WIDTH: u32 = 6;

/// Maximum gap, in milliseconds, that a line is still drawn across (10 minutes)
pub const NULL_BRIDGE_MS: u64 = 600_000;

pub const CURRENT_LEGEND: &str = "Current";
pub const OVERLAY_LEGEND: &str = "Previous 24h";
pub const OVERLAY_COLOR: &str = "#555555";

/// Tag appended to every generated dashboard
pub const MARKER_TAG: &str = "vic";

pub const SCHEMA_VERSION: u32 = 39;

/// Rectangle on the dashboard grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn overlaps(&self, other: &GridPos) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Same rectangle moved down by `dy` grid units
    pub fn shifted(self, dy: u32) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// A complete dashboard document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub uid: String,
    pub tags: Vec<String>,
    pub timezone: String,
    pub editable: bool,
    pub graph_tooltip: u8,
    pub time: TimeRange,
    pub refresh: String,
    pub schema_version: u32,
    pub panels: Vec<Panel>,
}

impl Dashboard {
    /// Number of non-row panels
    pub fn panel_count(&self) -> usize {
        self.panels
            .iter()
            .filter(|p| !matches!(p, Panel::Row(_)))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Panel {
    Row(RowPanel),
    Timeseries(TimeseriesPanel),
    Stat(StatPanel),
    Geomap(GeomapPanel),
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Panel::Row(p) => &p.title,
            Panel::Timeseries(p) => &p.title,
            Panel::Stat(p) => &p.title,
            Panel::Geomap(p) => &p.title,
        }
    }

    pub fn grid_pos(&self) -> GridPos {
        match self {
            Panel::Row(p) => p.grid_pos,
            Panel::Timeseries(p) => p.grid_pos,
            Panel::Stat(p) => p.grid_pos,
            Panel::Geomap(p) => p.grid_pos,
        }
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        match self {
            Panel::Row(p) => p.id = id,
            Panel::Timeseries(p) => p.id = id,
            Panel::Stat(p) => p.id = id,
            Panel::Geomap(p) => p.id = id,
        }
    }

    pub(crate) fn shift(&mut self, dy: u32) {
        let grid_pos = match self {
            Panel::Row(p) => &mut p.grid_pos,
            Panel::Timeseries(p) => &mut p.grid_pos,
            Panel::Stat(p) => &mut p.grid_pos,
            Panel::Geomap(p) => &mut p.grid_pos,
        };
        *grid_pos = grid_pos.shifted(dy);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPanel {
    pub id: u32,
    pub title: String,
    pub collapsed: bool,
    pub grid_pos: GridPos,
    pub panels: Vec<Panel>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesPanel {
    pub id: u32,
    pub title: String,
    pub datasource: DataSourceRef,
    pub grid_pos: GridPos,
    pub targets: Vec<Target>,
    pub field_config: TimeseriesFieldConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPanel {
    pub id: u32,
    pub title: String,
    pub datasource: DataSourceRef,
    pub grid_pos: GridPos,
    pub targets: Vec<Target>,
    pub field_config: StatFieldConfig,
    pub options: StatOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeomapPanel {
    pub id: u32,
    pub title: String,
    pub datasource: DataSourceRef,
    pub grid_pos: GridPos,
    pub targets: Vec<Target>,
    pub field_config: GeomapFieldConfig,
    pub options: GeomapOptions,
}

/// A single query against the datasource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub ref_id: String,
    pub expr: String,
    pub datasource: DataSourceRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeseriesFieldConfig {
    pub defaults: TimeseriesDefaults,
    pub overrides: Vec<FieldOverride>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeseriesDefaults {
    pub unit: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub min: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bound"
    )]
    pub max: Option<f64>,
    pub custom: TimeseriesCustom,
}

/// Whole-number bounds are written as integers, `0` rather than `0.0`
fn serialize_bound<S: Serializer>(bound: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match *bound {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            serializer.serialize_i64(value as i64)
        }
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeseriesCustom {
    pub line_width: u32,
    pub fill_opacity: u32,
    /// Always `"never"`, data points are not drawn
    pub show_points: &'static str,
    pub span_nulls: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatFieldConfig {
    pub defaults: StatDefaults,
    pub overrides: Vec<FieldOverride>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatDefaults {
    pub unit: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<ValueMapping>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatOptions {
    pub graph_mode: GraphMode,
    pub reduce_options: ReduceOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    /// Sparkline behind the value
    #[default]
    Area,
    /// Bare value, for categorical states
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReduceOptions {
    pub calcs: Vec<String>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            calcs: vec!["lastNotNull".to_string()],
        }
    }
}

/// Maps raw values of a categorical series to a label and color.
///
/// Entries serialize in insertion order under a single `"value"` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMapping {
    pub entries: Vec<MappedValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedValue {
    pub value: String,
    pub text: String,
    pub color: String,
}

impl ValueMapping {
    pub fn new<I, V, T, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (V, T, C)>,
        V: Into<String>,
        T: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(value, text, color)| MappedValue {
                    value: value.into(),
                    text: text.into(),
                    color: color.into(),
                })
                .collect(),
        }
    }

    /// Presence state of a device tracker: 1 is home, 0 is away
    pub fn home_away() -> Self {
        Self::new([("1", "Home", "green"), ("0", "Away", "red")])
    }
}

struct MappingOptions<'a>(&'a [MappedValue]);

#[derive(Serialize)]
struct MappingResult<'a> {
    text: &'a str,
    color: &'a str,
}

impl Serialize for MappingOptions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(
                &entry.value,
                &MappingResult {
                    text: &entry.text,
                    color: &entry.color,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for ValueMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "value")?;
        map.serialize_entry("options", &MappingOptions(&self.entries))?;
        map.end()
    }
}

/// Field override keyed on a series display name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOverride {
    pub matcher: Matcher,
    pub properties: Vec<OverrideProperty>,
}

impl FieldOverride {
    pub fn by_name(name: impl Into<String>, properties: Vec<OverrideProperty>) -> Self {
        Self {
            matcher: Matcher {
                id: "byName".to_string(),
                options: name.into(),
            },
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matcher {
    pub id: String,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideProperty {
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeomapFieldConfig {
    pub defaults: GeomapDefaults,
    pub overrides: Vec<FieldOverride>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GeomapDefaults {}

#[derive(Debug, Clone, Serialize)]
pub struct GeomapOptions {
    pub view: MapView,
    pub layers: Vec<MapLayer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapLayer {
    #[serde(rename = "type")]
    pub layer_type: String,
    pub name: String,
    pub location: LayerLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerLocation {
    pub mode: String,
    pub latitude: String,
    pub longitude: String,
}
