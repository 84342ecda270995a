/// Running mean and spread of a daily quantity, updated one value at a time.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
    min: Option<i64>,
    max: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub struct StatsReport {
    pub n_days: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub worst: Option<i64>,
    pub best: Option<i64>,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, val: i64) {
        self.n_vals += 1;

        // Welford update.
        let diff_a = val as f64 - self.mean;
        self.mean += diff_a / self.n_vals as f64;
        let diff_b = val as f64 - self.mean;
        self.diff_2_sum += diff_a * diff_b;

        self.min = Some(self.min.map_or(val, |min| min.min(val)));
        self.max = Some(self.max.map_or(val, |max| max.max(val)));
    }

    pub fn report(&self) -> StatsReport {
        StatsReport {
            n_days: self.n_vals,
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
            worst: self.min,
            best: self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_report_nan() {
        let report = RunningStats::new().report();
        assert_eq!(report.n_days, 0);
        assert!(report.mean.is_nan());
        assert!(report.std_dev.is_nan());
        assert_eq!(report.best, None);
    }

    #[test]
    fn mean_and_sample_std_dev() {
        let mut stats = RunningStats::new();
        for val in [2, 4, 4, 4, 5, 5, 7, 9] {
            stats.add(val);
        }
        let report = stats.report();
        assert_eq!(report.n_days, 8);
        assert!((report.mean - 5.0).abs() < 1e-12);
        assert!((report.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(report.worst, Some(2));
        assert_eq!(report.best, Some(9));
    }
}
