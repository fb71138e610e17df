use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
/// When every value is equal the bins span `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate, scaled to histogram count units so
/// the curve overlays bars of width `bin_width`.
///
/// Bandwidth follows Scott's rule, `σ · n^(-1/5)`.  Returns an empty curve
/// for fewer than two values or zero spread.
pub fn kde_curve(values: &[f64], bin_width: f64, points: usize) -> Vec<[f64; 2]> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sigma = var.sqrt();
    if sigma == 0.0 || !sigma.is_finite() {
        return Vec::new();
    }
    let h = sigma * (n as f64).powf(-0.2);

    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (start, end) = (lo - 3.0 * h, hi + 3.0 * h);
    let step = (end - start) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    (0..points)
        .map(|i| {
            let x = start + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [60.0, 80.0, 100.0, 120.0, 140.0, 140.0];
        let bins = histogram(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 60.0);
        assert_eq!(bins[3].end, 140.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        // max value lands in the last bin
        assert_eq!(bins[3].count, 3);
        assert_eq!(bins[0].width(), 20.0);
    }

    #[test]
    fn histogram_of_constant_values_is_centred() {
        let bins = histogram(&[120.0, 120.0], 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins[0].start, 119.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn histogram_of_nothing_is_empty() {
        assert!(histogram(&[], 20).is_empty());
    }

    #[test]
    fn kde_area_matches_count_area() {
        let values: Vec<f64> = (0..200).map(|i| 90.0 + (i % 40) as f64).collect();
        let bin_width = 2.0;
        let curve = kde_curve(&values, bin_width, 512);
        assert_eq!(curve.len(), 512);

        // Trapezoid integral of the scaled curve ≈ n · bin_width.
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        let expected = values.len() as f64 * bin_width;
        assert!((area - expected).abs() / expected < 0.01, "area {area}");
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[1.0], 1.0, 10).is_empty());
        assert!(kde_curve(&[5.0, 5.0, 5.0], 1.0, 10).is_empty());
    }
}
