use super::common::{GraphMode, GridPos, BAND_HEIGHT, STAT_WIDTH};
use super::layout::*;
use super::panels::{create_dashboard, DashboardConfig, StatConfig, TimeseriesConfig};
use super::{Dashboard, LayoutError};

const CHART_WIDTH: u32 = 12;

struct Thermostat {
    name: &'static str,
    id: &'static str,
}

const THERMOSTATS: &[Thermostat] = &[
    Thermostat {
        name: "Bathroom",
        id: "bathroom",
    },
    Thermostat {
        name: "Bedroom",
        id: "bedroom",
    },
    Thermostat {
        name: "Living Room",
        id: "living_room",
    },
];

/// Point-in-time state, shown as a bare value
fn state_stat(
    thermostat: &Thermostat,
    title: &str,
    attribute: &str,
    unit: &str,
    x: u32,
    y: u32,
) -> GridPanel {
    GridPanel::Stat(StatConfig {
        title: format!("{} - {title}", thermostat.name),
        metric: format!("climate.{}_{attribute}", thermostat.id),
        unit: unit.to_string(),
        grid: GridPos::new(x, y, STAT_WIDTH, BAND_HEIGHT),
        graph_mode: GraphMode::None,
        mappings: None,
    })
}

/// Two bands: temperature, target and HVAC action above humidity, preset and
/// state.
fn thermostat_group(thermostat: &Thermostat) -> RowGroup {
    let Thermostat { name, id } = thermostat;
    let stat_x = CHART_WIDTH;
    let state_x = CHART_WIDTH + STAT_WIDTH;
    let lower = BAND_HEIGHT;

    RowGroup::new(
        *name,
        vec![RowEntry::Grid(vec![
            GridPanel::Timeseries(TimeseriesConfig {
                title: format!("{name} - Current Temperature"),
                metric: format!("climate.{id}_current_temperature"),
                unit: "celsius".to_string(),
                grid: GridPos::new(0, 0, CHART_WIDTH, BAND_HEIGHT),
                ..Default::default()
            }),
            state_stat(
                thermostat,
                "Target Temperature",
                "temperature",
                "celsius",
                stat_x,
                0,
            ),
            state_stat(
                thermostat,
                "HVAC Action",
                "hvac_action_str",
                "none",
                state_x,
                0,
            ),
            GridPanel::Timeseries(TimeseriesConfig {
                title: format!("{name} - Humidity"),
                metric: format!("climate.{id}_current_humidity"),
                unit: "percent".to_string(),
                grid: GridPos::new(0, lower, CHART_WIDTH, BAND_HEIGHT),
                min: Some(0.0),
                max: Some(100.0),
                legend_format: "Humidity".to_string(),
                ..Default::default()
            }),
            state_stat(
                thermostat,
                "Preset Mode",
                "preset_mode_str",
                "none",
                stat_x,
                lower,
            ),
            state_stat(thermostat, "State", "state", "none", state_x, lower),
        ])],
    )
}

/// One row per thermostat
pub fn dashboard() -> Result<Dashboard, LayoutError> {
    let shell = create_dashboard(DashboardConfig {
        title: "Thermostats".to_string(),
        uid: "thermostats-overview".to_string(),
        tags: vec!["thermostats".to_string(), "climate".to_string()],
        refresh: Some("1m".to_string()),
        from: None,
        to: None,
    });

    let groups: Vec<RowGroup> = THERMOSTATS.iter().map(thermostat_group).collect();

    assemble(shell, &groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::common::Panel;

    #[test]
    fn test_rows_are_stacked_without_gaps() {
        let dashboard = dashboard().unwrap();
        let rows: Vec<u32> = dashboard
            .panels
            .iter()
            .filter(|p| matches!(p, Panel::Row(_)))
            .map(|p| p.grid_pos().y)
            .collect();

        assert_eq!(rows, vec![0, 17, 34]);
        assert_eq!(dashboard.refresh, "1m");
    }

    #[test]
    fn test_bedroom_panels() {
        let dashboard = dashboard().unwrap();
        let find = |title: &str| {
            dashboard
                .panels
                .iter()
                .find(|p| p.title() == title)
                .unwrap()
        };

        assert_eq!(
            find("Bedroom - Current Temperature").grid_pos(),
            GridPos::new(0, 18, 12, 8)
        );
        assert_eq!(
            find("Bedroom - State").grid_pos(),
            GridPos::new(18, 26, 6, 8)
        );

        let Panel::Stat(target) = find("Bedroom - Target Temperature") else {
            panic!("expected stat panel");
        };
        assert_eq!(target.field_config.defaults.unit, "celsius");
        assert_eq!(target.options.graph_mode, GraphMode::None);
        assert_eq!(
            target.targets[0].expr,
            r#"{__name__="climate.bedroom_temperature"}"#
        );

        let Panel::Timeseries(humidity) = find("Bedroom - Humidity") else {
            panic!("expected time-series panel");
        };
        assert_eq!(humidity.targets.len(), 1);
        assert_eq!(
            humidity.targets[0].legend_format.as_deref(),
            Some("Humidity")
        );
        assert_eq!(humidity.field_config.defaults.max, Some(100.0));
    }
}
