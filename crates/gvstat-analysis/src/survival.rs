//! Smoothed survival rate of victims by gender and age
//!
//! A victim survived unless their status mentions `Killed`. Victims without a
//! status count as survivors. The rate at age `a` pools every victim aged
//! within `a ± radius`:
//!
//! ```text
//! rate(a) = survived[a-r ..= a+r] / total[a-r ..= a+r]
//! ```
//!
//! An empty window yields a rate of 0.

use gvstat_data::{dataset::RoleTable, participant::Gender};
use gvstat_stats::{histogram::AgeHistogram, ratio::windowed_ratio_curve};
use serde::{Deserialize, Serialize};

use crate::config::AggregationConfig;

#[derive(Debug, Clone)]
struct SurvivalCounts {
    survived: AgeHistogram,
    total: AgeHistogram,
}

impl SurvivalCounts {
    fn new(len: usize) -> Self {
        Self {
            survived: AgeHistogram::new(len),
            total: AgeHistogram::new(len),
        }
    }

    fn record(&mut self, age: u32, survived: bool) {
        self.total.record(age);
        if survived {
            self.survived.record(age);
        }
    }

    fn curve(&self, config: &AggregationConfig) -> Vec<f64> {
        windowed_ratio_curve(
            &self.survived,
            &self.total,
            config.survival_window_radius,
            config.survival_display_ages(),
        )
        .into_iter()
        .map(|(_, rate)| rate)
        .collect()
    }
}

/// Survival rate curves for male and female victims.
///
/// `male[i]` and `female[i]` are the rates at age `ages[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRates {
    pub ages: Vec<u32>,
    pub male: Vec<f64>,
    pub female: Vec<f64>,
}

impl SurvivalRates {
    /// Computes the curves from the victim table.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use gvstat_analysis::{config::AggregationConfig, survival::SurvivalRates};
    /// use gvstat_data::{
    ///     dataset::{ParticipantRow, RoleTable},
    ///     participant::{Gender, Participant, Role},
    /// };
    ///
    /// let mut victims = RoleTable::new(Role::Victim);
    /// victims.rows.push(ParticipantRow {
    ///     date: NaiveDate::from_ymd_opt(2016, 5, 1).unwrap(),
    ///     participants: vec![
    ///         Participant::new(Some(30), Gender::Male, Some("Injured".into())),
    ///         Participant::new(Some(30), Gender::Male, Some("Killed".into())),
    ///         Participant::new(Some(31), Gender::Male, Some("Injured".into())),
    ///     ],
    /// });
    ///
    /// let rates = SurvivalRates::compute(&AggregationConfig::default(), &victims);
    /// let rate = rates.rate_at(&Gender::Male, 30).unwrap();
    /// assert!((rate - 2.0 / 3.0).abs() < 1e-12);
    /// assert_eq!(rates.rate_at(&Gender::Female, 30), Some(0.0));
    /// ```
    #[must_use]
    pub fn compute(config: &AggregationConfig, victims: &RoleTable) -> Self {
        let mut male = SurvivalCounts::new(config.bucket_count());
        let mut female = SurvivalCounts::new(config.bucket_count());

        for victim in victims.participants() {
            let Some(age) = victim.age.filter(|&age| age < config.max_age) else {
                continue;
            };
            let counts = match victim.gender {
                Gender::Male => &mut male,
                Gender::Female => &mut female,
                Gender::Other(_) => continue,
            };
            counts.record(age, !victim.is_killed());
        }

        log::info!(
            "computed survival rates from {} male and {} female victims",
            male.total.total(),
            female.total.total()
        );

        Self {
            ages: config.survival_display_ages().collect(),
            male: male.curve(config),
            female: female.curve(config),
        }
    }

    /// Rate at the given age, `None` for ages outside the curve or genders
    /// other than male and female.
    #[must_use]
    pub fn rate_at(&self, gender: &Gender, age: u32) -> Option<f64> {
        let curve = match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
            Gender::Other(_) => return None,
        };
        let idx = self.ages.iter().position(|&a| a == age)?;
        curve.get(idx).copied()
    }
}
