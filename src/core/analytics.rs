use serde::{Deserialize, Serialize};

/// Restaurant metric tracked as a running mean
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Time spent inside the restaurant's POI radius, in seconds
    Visit,
    /// Narration playback duration, in seconds
    AudioPlay,
}

impl Metric {
    /// (counter column, average column) backing this metric
    pub fn columns(&self) -> (&'static str, &'static str) {
        match self {
            Metric::Visit => ("visit_count", "avg_visit_duration"),
            Metric::AudioPlay => ("audio_play_count", "avg_audio_duration"),
        }
    }
}

/// One observation to fold into a restaurant's analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub restaurant_id: i32,
    pub metric: Metric,
    pub value: i64,
}

impl AnalyticsEvent {
    pub fn visit(restaurant_id: i32, duration_seconds: i64) -> Self {
        Self {
            restaurant_id,
            metric: Metric::Visit,
            value: duration_seconds,
        }
    }

    pub fn audio_play(restaurant_id: i32, duration_seconds: i64) -> Self {
        Self {
            restaurant_id,
            metric: Metric::AudioPlay,
            value: duration_seconds,
        }
    }
}

/// Stored counter and integer mean
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningMean {
    pub count: i64,
    pub avg: i64,
}

impl RunningMean {
    pub fn new(count: i64, avg: i64) -> Self {
        Self {
            count: count.max(0),
            avg,
        }
    }

    /// Fold a value in: new_avg = (avg * count + value) / (count + 1)
    ///
    /// Integer division rounds half up for non-negative totals.
    pub fn record(self, value: i64) -> Self {
        let count = self.count + 1;
        let total = self.avg.saturating_mul(self.count).saturating_add(value);
        let avg = if total >= 0 {
            total.saturating_add(count / 2) / count
        } else {
            total / count
        };

        Self { count, avg }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_becomes_average() {
        let mean = RunningMean::default().record(15);
        assert_eq!(mean, RunningMean { count: 1, avg: 15 });
    }

    #[test]
    fn test_online_mean_matches_batch_mean() {
        let values = [30, 60, 90, 120];
        let mean = values
            .iter()
            .fold(RunningMean::default(), |mean, v| mean.record(*v));

        assert_eq!(mean.count, 4);
        assert_eq!(mean.avg, 75);
    }

    #[test]
    fn test_rounds_half_up() {
        // (10 * 1 + 11) / 2 = 10.5
        let mean = RunningMean::new(1, 10).record(11);
        assert_eq!(mean.avg, 11);
    }

    #[test]
    fn test_metric_columns() {
        assert_eq!(Metric::Visit.columns(), ("visit_count", "avg_visit_duration"));
        assert_eq!(Metric::AudioPlay.columns(), ("audio_play_count", "avg_audio_duration"));
    }
}
