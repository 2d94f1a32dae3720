use super::layout::*;
use super::panels::{create_dashboard, DashboardConfig};
use super::{Dashboard, LayoutError};

const SENSOR: &str = "i_9psl";

fn sensor(title: &str, name: &str, unit: &str) -> MetricPanelSpec {
    MetricPanelSpec {
        title: title.to_string(),
        metric: format!("sensor.{SENSOR}_{name}_value"),
        unit: unit.to_string(),
        min: Some(0.0),
        ..Default::default()
    }
}

/// Air quality monitor: particulates, indices, gases and climate
pub fn dashboard() -> Result<Dashboard, LayoutError> {
    let shell = create_dashboard(DashboardConfig {
        title: format!("Air Quality ({SENSOR})"),
        uid: format!("air-quality-{SENSOR}"),
        tags: vec!["air-quality".to_string(), SENSOR.to_string()],
        refresh: None,
        from: None,
        to: None,
    });

    assemble(
        shell,
        &[
            RowGroup::new(
                "Particulate Matter",
                vec![
                    RowEntry::Paired(sensor("PM0.3", "pm0_3", "conμgm3")),
                    RowEntry::Paired(sensor("PM1", "pm1", "conμgm3")),
                    RowEntry::Paired(sensor("PM2.5", "pm2_5", "conμgm3")),
                    RowEntry::Paired(sensor("PM10", "pm10", "conμgm3")),
                ],
            ),
            RowGroup::new(
                "Air Quality Indices",
                vec![
                    RowEntry::Paired(sensor("VOC Index", "voc_index", "none")),
                    RowEntry::Paired(sensor("NOx Index", "nox_index", "none")),
                    RowEntry::Paired(sensor("Raw VOC", "raw_voc", "none")),
                    RowEntry::Paired(sensor("Raw NOx", "raw_nox", "none")),
                ],
            ),
            RowGroup::new(
                "Gases",
                vec![RowEntry::Paired(sensor("CO₂", "carbon_dioxide", "ppm"))],
            ),
            RowGroup::new(
                "Climate",
                vec![
                    // temperature can go below zero
                    RowEntry::Paired(MetricPanelSpec {
                        min: None,
                        ..sensor("Temperature", "temperature", "celsius")
                    }),
                    RowEntry::Paired(MetricPanelSpec {
                        max: Some(100.0),
                        ..sensor("Humidity", "humidity", "percent")
                    }),
                ],
            ),
        ],
    )
}
