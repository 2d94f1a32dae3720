use serde::Serialize;

/// Reference to the query backend a panel or target reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataSourceRef {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub uid: &'static str,
}

/// VictoriaMetrics, queried through its Prometheus-compatible API
pub const VICTORIA_METRICS: DataSourceRef = DataSourceRef {
    kind: "prometheus",
    uid: "victoriametrics",
};
