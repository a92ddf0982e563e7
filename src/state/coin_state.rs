//! Coin detail screen state.

use serde::{Deserialize, Serialize};

/// Historical series from `/api/assets/{id}/chart`, each point `(epoch_ms, value)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    pub prices: Vec<(f64, f64)>,
    #[serde(alias = "marketCaps")]
    pub market_caps: Vec<(f64, f64)>,
    #[serde(alias = "totalVolumes")]
    pub total_volumes: Vec<(f64, f64)>,
}

impl ChartData {
    /// `[min, max]` of the price series, padded so a flat line stays visible.
    pub fn price_bounds(&self) -> Option<[f64; 2]> {
        let mut values = self.prices.iter().map(|(_, p)| *p);
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let pad = ((max - min) * 0.05).max(max.abs() * 0.001).max(f64::EPSILON);
        Some([min - pad, max + pad])
    }

    /// `[first, last]` timestamp of the price series.
    pub fn time_bounds(&self) -> Option<[f64; 2]> {
        let first = self.prices.first()?.0;
        let last = self.prices.last()?.0;
        Some([first, last.max(first + 1.0)])
    }

    /// Percent change from the first to the last price.
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.prices.first()?.1;
        let last = self.prices.last()?.1;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

/// Chart windows offered on the detail screen, in days.
pub const CHART_DAYS: [u32; 5] = [1, 7, 30, 90, 365];

#[derive(Debug, Default)]
pub struct CoinDetailState {
    pub coin_id: Option<String>,
    pub chart: Option<ChartData>,
    pub days: u32,
    pub loading: bool,
}

impl CoinDetailState {
    pub fn new(days: u32) -> Self {
        Self {
            days: if CHART_DAYS.contains(&days) { days } else { 7 },
            ..Self::default()
        }
    }

    /// Switch to a coin, dropping any chart of a different one.
    pub fn open(&mut self, coin_id: &str) {
        if self.coin_id.as_deref() != Some(coin_id) {
            self.coin_id = Some(coin_id.to_string());
            self.chart = None;
        }
    }

    pub fn cycle_days(&mut self) {
        let idx = CHART_DAYS.iter().position(|d| *d == self.days).unwrap_or(0);
        self.days = CHART_DAYS[(idx + 1) % CHART_DAYS.len()];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_wire_format() {
        let chart: ChartData = serde_json::from_str(
            r#"{"prices":[[1700000000000,100.0],[1700003600000,110.0]],"market_caps":[],"total_volumes":[[1700000000000,5.0]]}"#,
        )
        .unwrap();
        assert_eq!(chart.prices.len(), 2);
        assert_eq!(chart.total_volumes.len(), 1);
        let change = chart.change_percent().unwrap();
        assert!((change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds() {
        let empty = ChartData::default();
        assert!(empty.price_bounds().is_none());
        assert!(empty.time_bounds().is_none());

        let flat = ChartData {
            prices: vec![(0.0, 5.0), (1.0, 5.0)],
            ..ChartData::default()
        };
        let [lo, hi] = flat.price_bounds().unwrap();
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_days_cycle() {
        let mut state = CoinDetailState::new(7);
        let mut seen = vec![state.days];
        for _ in 0..4 {
            state.cycle_days();
            seen.push(state.days);
        }
        assert_eq!(seen, vec![7, 30, 90, 365, 1]);
        assert_eq!(CoinDetailState::new(3).days, 7);
    }

    #[test]
    fn test_open_resets_chart_for_other_coin() {
        let mut state = CoinDetailState::new(7);
        state.open("bitcoin");
        state.chart = Some(ChartData::default());
        state.open("bitcoin");
        assert!(state.chart.is_some());
        state.open("ethereum");
        assert!(state.chart.is_none());
    }
}
