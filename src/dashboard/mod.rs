pub mod common;
pub mod datasource;
pub mod layout;
pub mod panels;

pub mod air_quality;
pub mod energy;
pub mod location;
pub mod thermostat;

use thiserror::Error;

pub use self::common::Dashboard;

/// Problems detected while laying out a dashboard
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("panel '{title}': min {min} is greater than max {max}")]
    InvertedBounds { title: String, min: f64, max: f64 },
    #[error("panel '{title}' does not fit the grid (x={x}, w={w})")]
    OutOfGrid { title: String, x: u32, w: u32 },
    #[error("panels '{first}' and '{second}' overlap")]
    Overlap { first: String, second: String },
}

/// A dashboard the build knows how to generate
pub struct DashboardDef {
    pub name: &'static str,
    pub file_name: &'static str,
    pub build: fn() -> Result<Dashboard, LayoutError>,
}

pub const DASHBOARDS: &[DashboardDef] = &[
    DashboardDef {
        name: "air-quality",
        file_name: "air-quality-dashboard.json",
        build: air_quality::dashboard,
    },
    DashboardDef {
        name: "energy",
        file_name: "energy-monitor-dashboard.json",
        build: energy::dashboard,
    },
    DashboardDef {
        name: "thermostat",
        file_name: "thermostat-dashboard.json",
        build: thermostat::dashboard,
    },
    DashboardDef {
        name: "location",
        file_name: "location-tracking-dashboard.json",
        build: location::dashboard,
    },
];

/// Look up a dashboard definition by name
pub fn get_dashboard(name: &str) -> Option<&'static DashboardDef> {
    DASHBOARDS.iter().find(|def| def.name == name)
}
