//! Chart elements.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// Structured chart configuration: category labels plus datasets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<ChartDataset>,
}

impl ChartData {
    /// Largest value across all datasets, or 0 for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Variant data of a chart element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartElement {
    #[serde(default)]
    pub chart_type: ChartKind,
    #[serde(default)]
    pub chart_data: ChartData,
}

impl ChartElement {
    pub const DEFAULT_SIZE: Size = Size::new(300.0, 200.0);
}

impl Default for ChartElement {
    /// A four-quarter bar chart.
    fn default() -> Self {
        Self {
            chart_type: ChartKind::Bar,
            chart_data: ChartData {
                labels: ["Q1", "Q2", "Q3", "Q4"].iter().map(|s| s.to_string()).collect(),
                datasets: vec![ChartDataset {
                    label: "Series 1".to_string(),
                    data: vec![12.0, 19.0, 8.0, 15.0],
                    background_color: Some("#4f46e5".to_string()),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chart_is_bar() {
        let chart = ChartElement::default();
        assert_eq!(chart.chart_type, ChartKind::Bar);
        assert_eq!(chart.chart_data.labels.len(), 4);
        assert_eq!(chart.chart_data.max_value(), 19.0);
    }

    #[test]
    fn test_chart_wire_names() {
        let json = serde_json::to_value(ChartElement::default()).unwrap();
        assert_eq!(json["chartType"], "bar");
        assert_eq!(json["chartData"]["datasets"][0]["backgroundColor"], "#4f46e5");
    }
}
