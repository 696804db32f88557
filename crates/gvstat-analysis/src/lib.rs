//! Aggregations behind the gun-violence statistics dashboard
//!
//! This crate turns the decoded tables of `gvstat-data` into the artifacts the
//! dashboard plots, and caches them on disk.
//!
//! # Overview
//!
//! ## Age Statistics Workflow
//!
//! 1. **Load Role Tables** ([`gvstat_data::dataset::RoleTable`]): Victim and suspect tables
//! 2. **Configure** ([`config::AggregationConfig`]): Age bound and survival window
//! 3. **Aggregate**:
//!    - [`age_distribution::GenderAgeDistribution`]: Per-age counts and distributions
//!      for male/female victims/suspects
//!    - [`survival::SurvivalRates`]: Smoothed survival rate of victims by age
//! 4. **Cache** ([`cache::ArtifactCache`]): Reuse results while inputs and
//!    parameters are unchanged
//!
//! ## Incident Workflow
//!
//! - [`seasonal::CaseCountByDay`]: Incidents per calendar day
//! - [`location`]: City rankings, per-city incident lists and map points
//! - [`distinct`]: Vocabulary of the packed participant columns
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use gvstat_analysis::{
//!     age_distribution::GenderAgeDistribution, config::AggregationConfig,
//!     survival::SurvivalRates,
//! };
//! use gvstat_data::{
//!     dataset::{ParticipantRow, RoleTable},
//!     participant::{Gender, Participant, Role},
//! };
//!
//! let config = AggregationConfig::default();
//! config.validate().unwrap();
//!
//! let mut victims = RoleTable::new(Role::Victim);
//! victims.rows.push(ParticipantRow {
//!     date: NaiveDate::from_ymd_opt(2017, 1, 2).unwrap(),
//!     participants: vec![Participant::new(Some(25), Gender::Female, Some("Killed".into()))],
//! });
//! let suspects = RoleTable::new(Role::Suspect);
//!
//! let dist = GenderAgeDistribution::compute(&config, &victims, &suspects);
//! assert_eq!(dist.counts.female_victim[25], 1);
//!
//! let rates = SurvivalRates::compute(&config, &victims);
//! assert_eq!(rates.rate_at(&Gender::Female, 25), Some(0.0));
//! ```

pub mod age_distribution;
pub mod cache;
pub mod config;
pub mod distinct;
pub mod location;
pub mod seasonal;
pub mod survival;
