//! Vertical layout of dashboards.
//!
//! A dashboard is described as an ordered list of [`RowGroup`]s. Folding over
//! them with a running offset places every row separator and panel at a fixed
//! grid position:
//!
//! * a row separator takes [`ROW_HEIGHT`] units
//! * a paired chart + stat takes one [`BAND_HEIGHT`] band
//! * a standalone stat takes its own height
//! * a custom grid takes as much as its lowest panel reaches

use ringlog::*;

use super::common::*;
use super::panels::{self, GeomapConfig, StatConfig, TimeseriesConfig};
use super::LayoutError;

/// A metric shown as a time-series chart with a stat tile beside it
#[derive(Debug, Clone)]
pub struct MetricPanelSpec {
    pub title: String,
    pub metric: String,
    pub unit: String,
    /// Unit for the stat tile, falls back to `unit`
    pub stat_unit: Option<String>,
    /// Top of the band. Assigned by [`assemble`] for table entries.
    pub y_offset: u32,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub include_overlay: bool,
}

impl Default for MetricPanelSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            metric: String::new(),
            unit: "none".to_string(),
            stat_unit: None,
            y_offset: 0,
            min: None,
            max: None,
            include_overlay: true,
        }
    }
}

/// Builds the chart at `[0, 18)` and the stat at `[18, 24)`, both spanning
/// `[y_offset, y_offset + 8)`.
pub fn pair(spec: &MetricPanelSpec) -> Result<(Panel, Panel), LayoutError> {
    let timeseries = panels::timeseries(TimeseriesConfig {
        title: spec.title.clone(),
        metric: spec.metric.clone(),
        unit: spec.unit.clone(),
        grid: GridPos::new(0, spec.y_offset, TIMESERIES_WIDTH, BAND_HEIGHT),
        min: spec.min,
        max: spec.max,
        include_overlay: spec.include_overlay,
        ..Default::default()
    })?;

    let stat = panels::stat(StatConfig {
        title: spec.title.clone(),
        metric: spec.metric.clone(),
        unit: spec.stat_unit.clone().unwrap_or_else(|| spec.unit.clone()),
        grid: GridPos::new(TIMESERIES_WIDTH, spec.y_offset, STAT_WIDTH, BAND_HEIGHT),
        graph_mode: GraphMode::Area,
        mappings: None,
    });

    Ok((timeseries, stat))
}

/// A titled row and the entries laid out beneath it
#[derive(Debug, Clone)]
pub struct RowGroup {
    pub title: String,
    pub entries: Vec<RowEntry>,
}

impl RowGroup {
    pub fn new(title: impl Into<String>, entries: Vec<RowEntry>) -> Self {
        Self {
            title: title.into(),
            entries,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RowEntry {
    /// Chart + stat band; `y_offset` is overwritten
    Paired(MetricPanelSpec),
    /// A lone stat; `grid.y` is overwritten
    Stat(StatConfig),
    /// Panels positioned relative to the top of the entry
    Grid(Vec<GridPanel>),
}

#[derive(Debug, Clone)]
pub enum GridPanel {
    Timeseries(TimeseriesConfig),
    Stat(StatConfig),
    Geomap(GeomapConfig),
}

impl GridPanel {
    fn grid(&self) -> GridPos {
        match self {
            GridPanel::Timeseries(c) => c.grid,
            GridPanel::Stat(c) => c.grid,
            GridPanel::Geomap(c) => c.grid,
        }
    }

    fn build(self) -> Result<Panel, LayoutError> {
        match self {
            GridPanel::Timeseries(c) => panels::timeseries(c),
            GridPanel::Stat(c) => Ok(panels::stat(c)),
            GridPanel::Geomap(c) => Ok(panels::geomap(c)),
        }
    }
}

/// Places an entry at `offset`, returning its panels and the offset below it.
fn place(entry: &RowEntry, offset: u32) -> Result<(Vec<Panel>, u32), LayoutError> {
    match entry {
        RowEntry::Paired(spec) => {
            let spec = MetricPanelSpec {
                y_offset: offset,
                ..spec.clone()
            };
            let (timeseries, stat) = pair(&spec)?;
            Ok((vec![timeseries, stat], offset + BAND_HEIGHT))
        }
        RowEntry::Stat(config) => {
            let mut config = config.clone();
            config.grid.y = offset;
            let height = config.grid.h;
            Ok((vec![panels::stat(config)], offset + height))
        }
        RowEntry::Grid(cells) => {
            let extent = cells.iter().map(|c| c.grid().bottom()).max().unwrap_or(0);
            let mut placed = Vec::with_capacity(cells.len());
            for cell in cells {
                let mut panel = cell.clone().build()?;
                panel.shift(offset);
                placed.push(panel);
            }
            Ok((placed, offset + extent))
        }
    }
}

/// Appends the row groups to `dashboard`, starting at the top of the grid.
///
/// Panels get sequential ids. The finished layout is rejected if any panel
/// leaves the grid or overlaps another.
pub fn assemble(mut dashboard: Dashboard, groups: &[RowGroup]) -> Result<Dashboard, LayoutError> {
    let mut panels = Vec::new();

    let offset = groups.iter().try_fold(0, |offset, group| {
        debug!("row '{}' at y={}", group.title, offset);
        panels.push(Panel::Row(RowPanel {
            id: 0,
            title: group.title.clone(),
            collapsed: false,
            grid_pos: GridPos::new(0, offset, GRID_COLUMNS, ROW_HEIGHT),
            panels: Vec::new(),
        }));

        group
            .entries
            .iter()
            .try_fold(offset + ROW_HEIGHT, |offset, entry| {
                let (placed, next) = place(entry, offset)?;
                panels.extend(placed);
                Ok::<_, LayoutError>(next)
            })
    })?;

    check_layout(&panels)?;

    for (id, panel) in (1..).zip(panels.iter_mut()) {
        panel.set_id(id);
    }

    debug!(
        "dashboard '{}': {} panels, height {}",
        dashboard.title,
        panels.len(),
        offset
    );

    dashboard.panels = panels;
    Ok(dashboard)
}

/// Ensures every panel fits in the grid and no two panels share a cell.
pub fn check_layout(panels: &[Panel]) -> Result<(), LayoutError> {
    for panel in panels {
        let grid = panel.grid_pos();
        if grid.w == 0 || grid.h == 0 || grid.right() > GRID_COLUMNS {
            return Err(LayoutError::OutOfGrid {
                title: panel.title().to_string(),
                x: grid.x,
                w: grid.w,
            });
        }
    }

    for (i, first) in panels.iter().enumerate() {
        for second in &panels[i + 1..] {
            if first.grid_pos().overlaps(&second.grid_pos()) {
                return Err(LayoutError::Overlap {
                    first: first.title().to_string(),
                    second: second.title().to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::panels::{create_dashboard, DashboardConfig};
    use serde_json::Value;

    fn shell() -> Dashboard {
        create_dashboard(DashboardConfig {
            title: "Test".to_string(),
            uid: "test".to_string(),
            tags: Vec::new(),
            refresh: None,
            from: None,
            to: None,
        })
    }

    fn spec(title: &str, metric: &str, unit: &str) -> MetricPanelSpec {
        MetricPanelSpec {
            title: title.to_string(),
            metric: metric.to_string(),
            unit: unit.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pair_tiles_band() {
        for y_offset in [0, 1, 17, 100] {
            let (timeseries, stat) = pair(&MetricPanelSpec {
                y_offset,
                ..spec("Power", "x", "watt")
            })
            .unwrap();

            let left = timeseries.grid_pos();
            let right = stat.grid_pos();

            assert!(!left.overlaps(&right));
            assert_eq!((left.x, left.right()), (0, TIMESERIES_WIDTH));
            assert_eq!((right.x, right.right()), (TIMESERIES_WIDTH, GRID_COLUMNS));
            for grid in [left, right] {
                assert_eq!(grid.y, y_offset);
                assert_eq!(grid.bottom(), y_offset + BAND_HEIGHT);
            }
            assert_eq!(
                left.w * left.h + right.w * right.h,
                GRID_COLUMNS * BAND_HEIGHT
            );
        }
    }

    #[test]
    fn test_pair_shares_title_and_query() {
        let metric = "sensor.i_9psl_carbon_dioxide_value";
        let (timeseries, stat) = pair(&spec("CO₂", metric, "ppm")).unwrap();

        let (Panel::Timeseries(timeseries), Panel::Stat(stat)) = (timeseries, stat) else {
            panic!("unexpected panel kinds");
        };

        assert_eq!(timeseries.title, stat.title);
        assert_eq!(timeseries.targets[0].expr, stat.targets[0].expr);
        assert_eq!(stat.targets.len(), 1);
        assert_eq!(stat.options.graph_mode, GraphMode::Area);
        assert_eq!(stat.field_config.defaults.unit, "ppm");
    }

    #[test]
    fn test_pair_stat_unit_fallback() {
        let (_, stat) = pair(&MetricPanelSpec {
            stat_unit: Some("kwatth".to_string()),
            ..spec("Energy", "x", "watth")
        })
        .unwrap();
        let Panel::Stat(stat) = stat else {
            panic!("expected stat panel");
        };
        assert_eq!(stat.field_config.defaults.unit, "kwatth");
    }

    #[test]
    fn test_pair_overlay_toggle() {
        let (with_overlay, _) = pair(&spec("A", "x", "watt")).unwrap();
        let (without_overlay, _) = pair(&MetricPanelSpec {
            include_overlay: false,
            ..spec("A", "x", "watt")
        })
        .unwrap();

        let Panel::Timeseries(with_overlay) = with_overlay else {
            panic!("expected time-series panel");
        };
        let Panel::Timeseries(without_overlay) = without_overlay else {
            panic!("expected time-series panel");
        };

        assert_eq!(with_overlay.targets.len(), 2);
        assert_eq!(with_overlay.field_config.overrides.len(), 1);
        assert_eq!(
            with_overlay.field_config.overrides[0].matcher.options,
            OVERLAY_LEGEND
        );

        assert_eq!(without_overlay.targets.len(), 1);
        assert!(without_overlay.field_config.overrides.is_empty());
    }

    #[test]
    fn test_two_row_groups() {
        let groups = vec![
            RowGroup::new("A", vec![RowEntry::Paired(spec("X", "x", "watt"))]),
            RowGroup::new(
                "B",
                vec![RowEntry::Paired(MetricPanelSpec {
                    min: Some(0.0),
                    max: Some(100.0),
                    ..spec("Y", "y", "percent")
                })],
            ),
        ];

        let dashboard = assemble(shell(), &groups).unwrap();
        let positions: Vec<(&str, u32)> = dashboard
            .panels
            .iter()
            .map(|p| (p.title(), p.grid_pos().y))
            .collect();

        assert_eq!(
            positions,
            vec![("A", 0), ("X", 1), ("X", 1), ("B", 9), ("Y", 10), ("Y", 10)]
        );

        let ids: Vec<Value> = serde_json::to_value(&dashboard).unwrap()["panels"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].clone())
            .collect();
        assert_eq!(ids, (1..=6).map(Value::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_stat_and_grid_entries() {
        let tile = |title: &str, x: u32, y: u32| {
            GridPanel::Stat(StatConfig {
                title: title.to_string(),
                metric: title.to_string(),
                grid: GridPos::new(x, y, 6, 8),
                ..Default::default()
            })
        };

        let groups = vec![
            RowGroup::new(
                "Energy",
                vec![
                    RowEntry::Paired(spec("Import", "import", "kwatth")),
                    RowEntry::Stat(StatConfig {
                        title: "Active Tariff".to_string(),
                        metric: "tariff".to_string(),
                        graph_mode: GraphMode::None,
                        ..Default::default()
                    }),
                ],
            ),
            RowGroup::new(
                "Quality",
                vec![RowEntry::Grid(vec![
                    tile("a", 0, 0),
                    tile("b", 6, 0),
                    tile("c", 0, 8),
                    tile("d", 6, 8),
                ])],
            ),
            RowGroup::new("After", Vec::new()),
        ];

        let dashboard = assemble(shell(), &groups).unwrap();
        let find = |title: &str| {
            dashboard
                .panels
                .iter()
                .find(|p| p.title() == title)
                .map(|p| p.grid_pos())
                .unwrap()
        };

        assert_eq!(find("Active Tariff"), GridPos::new(0, 9, 6, 8));
        assert_eq!(find("Quality").y, 17);
        assert_eq!(find("a"), GridPos::new(0, 18, 6, 8));
        assert_eq!(find("d"), GridPos::new(6, 26, 6, 8));
        assert_eq!(find("After").y, 34);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let groups = vec![
            RowGroup::new(
                "Power",
                vec![
                    RowEntry::Paired(spec("P1", "p1", "watt")),
                    RowEntry::Paired(spec("P2", "p2", "watt")),
                ],
            ),
            RowGroup::new("Gas", vec![RowEntry::Paired(spec("Gas", "gas", "m3"))]),
        ];

        let first = serde_json::to_string(&assemble(shell(), &groups).unwrap()).unwrap();
        let second = serde_json::to_string(&assemble(shell(), &groups).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_overlapping_grid_rejected() {
        let groups = vec![RowGroup::new(
            "Broken",
            vec![RowEntry::Grid(vec![
                GridPanel::Stat(StatConfig {
                    title: "left".to_string(),
                    grid: GridPos::new(0, 0, 12, 4),
                    ..Default::default()
                }),
                GridPanel::Stat(StatConfig {
                    title: "right".to_string(),
                    grid: GridPos::new(6, 2, 12, 4),
                    ..Default::default()
                }),
            ])],
        )];

        match assemble(shell(), &groups) {
            Err(LayoutError::Overlap { first, second }) => {
                assert_eq!(first, "left");
                assert_eq!(second, "right");
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_grid_rejected() {
        let groups = vec![RowGroup::new(
            "Wide",
            vec![RowEntry::Stat(StatConfig {
                title: "too wide".to_string(),
                grid: GridPos::new(20, 0, 6, 8),
                ..Default::default()
            })],
        )];

        assert!(matches!(
            assemble(shell(), &groups),
            Err(LayoutError::OutOfGrid { x: 20, w: 6, .. })
        ));
    }

    #[test]
    fn test_inverted_bounds_in_table() {
        let groups = vec![RowGroup::new(
            "Climate",
            vec![RowEntry::Paired(MetricPanelSpec {
                min: Some(100.0),
                max: Some(0.0),
                ..spec("Humidity", "h", "percent")
            })],
        )];

        assert!(matches!(
            assemble(shell(), &groups),
            Err(LayoutError::InvertedBounds { .. })
        ));
    }
}
