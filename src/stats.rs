// src/stats.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Descriptive statistics over a list of numeric samples.
/// `stdev` is the sample standard deviation and only exists with >= 2 samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub samples: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdev: Option<f64>,
    pub max_diff: f64,
}

/// Pure function of the input samples. Returns `None` on an empty slice.
pub fn numeric_stats(data: &[f64]) -> Option<NumericStats> {
    if data.is_empty() {
        return None;
    }

    let max = data.iter().cloned().fold(f64::MIN, f64::max);
    let min = data.iter().cloned().fold(f64::MAX, f64::min);
    let mean = data.iter().sum::<f64>() / data.len() as f64;

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    let stdev = if data.len() > 1 {
        let variance =
            data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    Some(NumericStats {
        max,
        min,
        mean,
        median,
        samples: data.len(),
        stdev,
        max_diff: max - min,
    })
}

impl fmt::Display for NumericStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max: {}, min: {}, mean: {:.2}, median: {}, samples: {}",
            self.max, self.min, self.mean, self.median, self.samples
        )?;
        if let Some(stdev) = self.stdev {
            write!(f, ", stdev: {stdev:.2}")?;
        }
        write!(f, ", max_diff: {}", self.max_diff)
    }
}

/// Run-level diagnostics collector, passed explicitly through the pipeline.
/// Counters track parse misses and field presence; the accumulator vectors
/// feed the summary stats printed at the end of a `process` run.
#[derive(Debug, Default)]
pub struct RunStats {
    counters: BTreeMap<String, u64>,
    pub ratings: Vec<f64>,
    pub prices: Vec<f64>,
    distance_samples: BTreeMap<String, Vec<f64>>,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(&mut self, name: &str) {
        *self.counters.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn add_distance_sample(&mut self, place: &str, meters: f64) {
        self.distance_samples
            .entry(place.to_string())
            .or_default()
            .push(meters);
    }

    /// Print the end-of-run summary: global rating/price/distance stats,
    /// then every counter as `name count/total: pct%`.
    pub fn report(&self, total: usize) {
        println!();
        if let Some(stats) = numeric_stats(&self.ratings) {
            println!("global ratings stats: {stats}");
        }
        if let Some(stats) = numeric_stats(&self.prices) {
            println!("prices stats: {stats}");
        }
        println!();
        for (place, samples) in &self.distance_samples {
            if let Some(stats) = numeric_stats(samples) {
                println!("distance to {place} stats: {stats}");
            }
        }
        println!();
        for (name, count) in &self.counters {
            let pct = if total > 0 {
                *count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            println!("{name} {count}/{total}: {pct:.2}%");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_three_ratings() {
        let stats = numeric_stats(&[80.0, 90.0, 100.0]).unwrap();

        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.min, 80.0);
        assert_eq!(stats.mean, 90.0);
        assert_eq!(stats.median, 90.0);
        assert_eq!(stats.samples, 3);
        assert_eq!(stats.max_diff, 20.0);
        // sample stdev of [80, 90, 100] is exactly 10
        assert!((stats.stdev.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn single_sample_has_no_stdev() {
        let stats = numeric_stats(&[42.0]).unwrap();

        assert_eq!(stats.samples, 1);
        assert_eq!(stats.stdev, None);
        assert_eq!(stats.max_diff, 0.0);
    }

    #[test]
    fn even_sample_count_uses_middle_average() {
        let stats = numeric_stats(&[1.0, 2.0, 3.0, 10.0]).unwrap();

        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(numeric_stats(&[]).is_none());
    }

    #[test]
    fn counters_accumulate_by_name() {
        let mut stats = RunStats::new();

        stats.incr("rating_present");
        stats.incr("rating_present");
        stats.incr("pricelist_missing");

        assert_eq!(stats.count("rating_present"), 2);
        assert_eq!(stats.count("pricelist_missing"), 1);
        assert_eq!(stats.count("never_touched"), 0);
    }
}
