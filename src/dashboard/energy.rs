use super::common::{GraphMode, GridPos, BAND_HEIGHT, STAT_WIDTH};
use super::layout::*;
use super::panels::{create_dashboard, DashboardConfig, StatConfig};
use super::{Dashboard, LayoutError};

fn meter(title: &str, name: &str, unit: &str) -> MetricPanelSpec {
    MetricPanelSpec {
        title: title.to_string(),
        metric: format!("sensor.p1_meter_{name}_value"),
        unit: unit.to_string(),
        min: Some(0.0),
        ..Default::default()
    }
}

/// Event counters, four tiles per band
fn power_quality() -> RowEntry {
    const COUNTERS: [(&str, &str); 8] = [
        ("Voltage Sags L1", "voltage_sags_detected_phase_1"),
        ("Voltage Sags L2", "voltage_sags_detected_phase_2"),
        ("Voltage Sags L3", "voltage_sags_detected_phase_3"),
        ("Power Failures", "power_failures_detected"),
        ("Voltage Swells L1", "voltage_swells_detected_phase_1"),
        ("Voltage Swells L2", "voltage_swells_detected_phase_2"),
        ("Voltage Swells L3", "voltage_swells_detected_phase_3"),
        ("Long Power Failures", "long_power_failures_detected"),
    ];

    RowEntry::Grid(
        (0u32..)
            .zip(COUNTERS)
            .map(|(i, (title, name))| {
                GridPanel::Stat(StatConfig {
                    title: title.to_string(),
                    metric: format!("sensor.p1_meter_{name}_value"),
                    grid: GridPos::new(
                        (i % 4) * STAT_WIDTH,
                        (i / 4) * BAND_HEIGHT,
                        STAT_WIDTH,
                        BAND_HEIGHT,
                    ),
                    ..Default::default()
                })
            })
            .collect(),
    )
}

/// P1 smart meter: power, energy, gas, costs and power quality
pub fn dashboard() -> Result<Dashboard, LayoutError> {
    let shell = create_dashboard(DashboardConfig {
        title: "Energy Monitor (P1)".to_string(),
        uid: "energy-monitor-p1".to_string(),
        tags: vec!["energy".to_string(), "p1".to_string()],
        refresh: None,
        from: None,
        to: None,
    });

    assemble(
        shell,
        &[
            RowGroup::new(
                "Real-time Power",
                vec![
                    RowEntry::Paired(meter("Total Active Power", "active_power", "watt")),
                    RowEntry::Paired(meter("Phase 1 Power", "active_power_phase_1", "watt")),
                    RowEntry::Paired(meter("Phase 2 Power", "active_power_phase_2", "watt")),
                    RowEntry::Paired(meter("Phase 3 Power", "active_power_phase_3", "watt")),
                    RowEntry::Paired(meter("Current", "current", "amp")),
                ],
            ),
            RowGroup::new(
                "Energy Consumption",
                vec![
                    RowEntry::Paired(meter(
                        "Total Energy Import",
                        "total_energy_import",
                        "kwatth",
                    )),
                    RowEntry::Paired(meter(
                        "Energy Import Tariff 1",
                        "total_energy_import_tariff_1",
                        "kwatth",
                    )),
                    RowEntry::Paired(meter(
                        "Energy Import Tariff 2",
                        "total_energy_import_tariff_2",
                        "kwatth",
                    )),
                    RowEntry::Stat(StatConfig {
                        title: "Active Tariff".to_string(),
                        metric: "sensor.p1_meter_active_tariff_value".to_string(),
                        graph_mode: GraphMode::None,
                        ..Default::default()
                    }),
                ],
            ),
            RowGroup::new(
                "Gas Consumption",
                vec![RowEntry::Paired(meter("Total Gas", "total_gas", "m3"))],
            ),
            RowGroup::new(
                "Costs",
                vec![
                    RowEntry::Paired(meter(
                        "Total Energy Cost",
                        "total_energy_import_cost",
                        "currencyEUR",
                    )),
                    RowEntry::Paired(meter("Total Gas Cost", "total_gas_cost", "currencyEUR")),
                ],
            ),
            RowGroup::new("Power Quality", vec![power_quality()]),
        ],
    )
}
