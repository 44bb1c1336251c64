//! Statistical summaries for the Sudogene project.
//!
//! - **Descriptive statistics**: min, max, mean, median, variance and standard deviation
//!   of a dataset, used to summarize the fitness of a population
//!
//! # Examples
//!
//! ```
//! use sudogene_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [12.0, 3.0, 7.0, 3.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.min, 3.0);
//! assert_eq!(stats.mean, 6.25);
//! assert_eq!(stats.median, 5.0);
//! ```

pub mod descriptive;
