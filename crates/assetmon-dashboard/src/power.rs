//! Power chart series for one asset.

use assetmon_core::{ChartPoint, PowerHistory};
use serde::Serialize;

/// Chart-ready power data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerChart {
    pub asset_id: String,
    pub asset_name: String,
    /// History points followed by forecast points.
    pub series: Vec<ChartPoint>,
    pub mean_efficiency: Option<f64>,
    pub latest_power_kw: Option<f64>,
}

impl PowerChart {
    pub fn from_history(history: &PowerHistory) -> Self {
        Self {
            asset_id: history.asset_id.clone(),
            asset_name: history.asset_name.clone(),
            series: history.chart_series(),
            mean_efficiency: history.mean_efficiency(),
            latest_power_kw: history.latest_power_kw(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.series
            .iter()
            .filter(|p| p.power_history.is_some())
            .count()
    }

    pub fn forecast_len(&self) -> usize {
        self.series.len() - self.history_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetmon_core::PowerDataPoint;
    use std::collections::BTreeMap;

    #[test]
    fn test_from_history() {
        let point = |ts: &str, kw: f64, eff: f64| PowerDataPoint {
            timestamp: ts.to_string(),
            power_kw: kw,
            efficiency: eff,
        };
        let history = PowerHistory {
            asset_id: "AST-001".to_string(),
            asset_name: "Primary Cooling Pump".to_string(),
            asset_type: "pump".to_string(),
            history: vec![point("09:00", 40.0, 80.0), point("10:00", 44.0, 90.0)],
            forecast: vec![point("11:00", 45.0, 88.0)],
            metadata: BTreeMap::new(),
        };

        let chart = PowerChart::from_history(&history);
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.history_len(), 2);
        assert_eq!(chart.forecast_len(), 1);
        assert_eq!(chart.mean_efficiency, Some(85.0));
        assert_eq!(chart.latest_power_kw, Some(44.0));
    }
}
