use super::common::{GraphMode, GridPos, ValueMapping, BAND_HEIGHT, GRID_COLUMNS, STAT_WIDTH};
use super::layout::*;
use super::panels::{self, DashboardConfig, GeomapConfig, StatConfig, TimeseriesConfig};
use super::{Dashboard, LayoutError};

const TILE_HEIGHT: u32 = 4;
const MAP_HEIGHT: u32 = 10;

const CHRIS_PHONE: &str = "device_tracker.chrisphone";
const MEG_PHONE: &str = "device_tracker.meg_2";

fn tile(title: &str, metric: String, unit: &str, column: u32) -> StatConfig {
    StatConfig {
        title: title.to_string(),
        metric,
        unit: unit.to_string(),
        grid: GridPos::new(column * STAT_WIDTH, 0, STAT_WIDTH, TILE_HEIGHT),
        graph_mode: GraphMode::None,
        mappings: None,
    }
}

fn home_status(title: &str, tracker: &str, column: u32) -> GridPanel {
    GridPanel::Stat(StatConfig {
        mappings: Some(ValueMapping::home_away()),
        ..tile(title, format!("{tracker}_value"), "none", column)
    })
}

fn history(title: &str, tracker: &str, legend: &str, x: u32) -> GridPanel {
    GridPanel::Timeseries(TimeseriesConfig {
        title: title.to_string(),
        metric: format!("{tracker}_value"),
        grid: GridPos::new(x, 0, GRID_COLUMNS / 2, BAND_HEIGHT),
        legend_format: legend.to_string(),
        fill_opacity: 20,
        ..Default::default()
    })
}

/// Presence, GPS position and a week of home/away history
pub fn dashboard() -> Result<Dashboard, LayoutError> {
    let shell = panels::create_dashboard(DashboardConfig {
        title: "Location Tracking".to_string(),
        uid: "location-tracking".to_string(),
        tags: vec![
            "location".to_string(),
            "tracking".to_string(),
            "device-tracker".to_string(),
        ],
        refresh: None,
        from: Some("now-7d".to_string()),
        to: None,
    });

    let latitude = format!("{CHRIS_PHONE}_latitude");
    let longitude = format!("{CHRIS_PHONE}_longitude");

    let coordinate = |title: &str, metric: &str, unit: &str, column: u32| {
        GridPanel::Stat(tile(title, metric.to_string(), unit, column))
    };

    assemble(
        shell,
        &[
            RowGroup::new(
                "Current Location Status",
                vec![RowEntry::Grid(vec![
                    home_status("Chris - Home Status", CHRIS_PHONE, 0),
                    home_status("Meg - Home Status", MEG_PHONE, 1),
                    GridPanel::Stat(tile(
                        "Chris - Phone Battery",
                        format!("{CHRIS_PHONE}_battery_level"),
                        "percent",
                        2,
                    )),
                ])],
            ),
            RowGroup::new(
                "GPS Coordinates",
                vec![RowEntry::Grid(vec![
                    coordinate("Chris - Latitude", &latitude, "degrees", 0),
                    coordinate("Chris - Longitude", &longitude, "degrees", 1),
                    coordinate("Chris - Speed", &format!("{CHRIS_PHONE}_speed"), "mps", 2),
                    coordinate(
                        "Chris - GPS Accuracy",
                        &format!("{CHRIS_PHONE}_gps_accuracy"),
                        "meters",
                        3,
                    ),
                    GridPanel::Geomap(GeomapConfig {
                        title: "GPS Map".to_string(),
                        latitude,
                        longitude,
                        grid: GridPos::new(0, TILE_HEIGHT, GRID_COLUMNS, MAP_HEIGHT),
                        ..Default::default()
                    }),
                ])],
            ),
            RowGroup::new(
                "State History - Last 7 Days",
                vec![RowEntry::Grid(vec![
                    history("Chris - Home/Away History", CHRIS_PHONE, "Chris", 0),
                    history(
                        "Meg - Home/Away History",
                        MEG_PHONE,
                        "Meg",
                        GRID_COLUMNS / 2,
                    ),
                ])],
            ),
        ],
    )
}
