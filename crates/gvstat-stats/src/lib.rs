//! Statistical primitives for the gvstat project.
//!
//! This crate provides small, dataset-agnostic numeric tools:
//!
//! - **Histograms**: Fixed-width per-value counts over small non-negative integers
//! - **Distributions**: Zero-guarded normalization of counts
//! - **Ratios**: Zero-guarded ratios and sliding-window ratio curves
//! - **Descriptive statistics**: Min, max, mean, median and spread of integer samples
//!
//! # Modules
//!
//! - [`histogram`]: Per-value count histograms indexed by age
//! - [`distribution`]: Normalization of counts into distributions
//! - [`ratio`]: Windowed ratio curves used for survival rates
//! - [`descriptive`]: Descriptive statistics for integer samples
//!
//! # Examples
//!
//! ## Building an age histogram
//!
//! ```
//! use gvstat_stats::histogram::AgeHistogram;
//!
//! let mut histogram = AgeHistogram::new(110);
//! for age in [18, 19, 19, 150] {
//!     histogram.record(age);
//! }
//! assert_eq!(histogram.count(19), 2);
//! assert_eq!(histogram.total(), 3);
//! ```
//!
//! ## Normalizing counts
//!
//! ```
//! use gvstat_stats::distribution::normalize;
//!
//! let dist = normalize(&[1, 1, 2]);
//! assert_eq!(dist, vec![0.25, 0.25, 0.5]);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use gvstat_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([20, 30, 40]).unwrap();
//! assert_eq!(stats.mean, 30.0);
//! ```

pub mod descriptive;
pub mod distribution;
pub mod histogram;
pub mod ratio;
