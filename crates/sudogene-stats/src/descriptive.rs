/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f64` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median of the dataset; the mean of the two middle values for even counts.
    pub median: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// Returns `None` if the dataset is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use sudogene_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from values already sorted in ascending order.
    ///
    /// Returns `None` if the dataset is empty.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted_values[count / 2 - 1], sorted_values[count / 2])
        } else {
            sorted_values[count / 2]
        };
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
        })
    }

    /// Width of the value range.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
