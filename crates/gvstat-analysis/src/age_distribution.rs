//! Gender and age distribution of victims and suspects
//!
//! Every participant with a known age below `max_age` and a gender of `Male`
//! or `Female` falls into exactly one of four [`Category`] buckets (gender ×
//! role). For each bucket the aggregation produces:
//!
//! - the raw list of ages, in input order, for histogram rendering
//! - per-age counts, indexed by age
//! - the counts normalized to a distribution (all zeros for an empty bucket)
//!
//! Participants outside the age range or with another gender are excluded from
//! all three outputs.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use gvstat_analysis::{
//!     age_distribution::{Category, GenderAgeDistribution},
//!     config::AggregationConfig,
//! };
//! use gvstat_data::{
//!     dataset::{ParticipantRow, RoleTable},
//!     participant::{Gender, Participant, Role},
//! };
//!
//! let mut victims = RoleTable::new(Role::Victim);
//! victims.rows.push(ParticipantRow {
//!     date: NaiveDate::from_ymd_opt(2016, 5, 1).unwrap(),
//!     participants: vec![
//!         Participant::new(Some(20), Gender::Male, None),
//!         Participant::new(Some(150), Gender::Male, None),
//!     ],
//! });
//! let suspects = RoleTable::new(Role::Suspect);
//!
//! let dist = GenderAgeDistribution::compute(&AggregationConfig::default(), &victims, &suspects);
//! assert_eq!(dist.counts.get(Category::MaleVictim)[20], 1);
//! assert_eq!(dist.ages.get(Category::MaleVictim), &vec![20]);
//! assert_eq!(dist.distributions.get(Category::MaleVictim)[20], 1.0);
//! ```

use std::fmt;

use gvstat_data::{
    dataset::RoleTable,
    participant::{Gender, Role},
};
use gvstat_stats::{descriptive::DescriptiveStats, histogram::AgeHistogram};
use serde::{Deserialize, Serialize};

use crate::config::AggregationConfig;

/// One of the four (gender × role) buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MaleVictim,
    FemaleVictim,
    MaleSuspect,
    FemaleSuspect,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::MaleVictim,
        Category::FemaleVictim,
        Category::MaleSuspect,
        Category::FemaleSuspect,
    ];

    /// Bucket for a participant, `None` for genders other than male and female.
    #[must_use]
    pub fn classify(role: Role, gender: &Gender) -> Option<Self> {
        match (role, gender) {
            (Role::Victim, Gender::Male) => Some(Category::MaleVictim),
            (Role::Victim, Gender::Female) => Some(Category::FemaleVictim),
            (Role::Suspect, Gender::Male) => Some(Category::MaleSuspect),
            (Role::Suspect, Gender::Female) => Some(Category::FemaleSuspect),
            (_, Gender::Other(_)) => None,
        }
    }

    #[must_use]
    pub fn role(self) -> Role {
        match self {
            Category::MaleVictim | Category::FemaleVictim => Role::Victim,
            Category::MaleSuspect | Category::FemaleSuspect => Role::Suspect,
        }
    }

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Category::MaleVictim => "male victim",
            Category::FemaleVictim => "female victim",
            Category::MaleSuspect => "male suspect",
            Category::FemaleSuspect => "female suspect",
        }
    }
}

/// One value for each [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerCategory<T> {
    pub male_victim: T,
    pub female_victim: T,
    pub male_suspect: T,
    pub female_suspect: T,
}

impl<T> PerCategory<T> {
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Category) -> T,
    {
        Self {
            male_victim: f(Category::MaleVictim),
            female_victim: f(Category::FemaleVictim),
            male_suspect: f(Category::MaleSuspect),
            female_suspect: f(Category::FemaleSuspect),
        }
    }

    #[must_use]
    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::MaleVictim => &self.male_victim,
            Category::FemaleVictim => &self.female_victim,
            Category::MaleSuspect => &self.male_suspect,
            Category::FemaleSuspect => &self.female_suspect,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::MaleVictim => &mut self.male_victim,
            Category::FemaleVictim => &mut self.female_victim,
            Category::MaleSuspect => &mut self.male_suspect,
            Category::FemaleSuspect => &mut self.female_suspect,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn map<U, F>(&self, mut f: F) -> PerCategory<U>
    where
        F: FnMut(Category, &T) -> U,
    {
        PerCategory::from_fn(|category| f(category, self.get(category)))
    }
}

/// Age lists, counts and distributions for the four categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderAgeDistribution {
    /// Exclusive upper bound of the age buckets (length of every count vector).
    pub max_age: u32,
    /// Ages of every classified participant, in input order.
    pub ages: PerCategory<Vec<u32>>,
    /// Participants per age, indexed by age.
    pub counts: PerCategory<Vec<u64>>,
    /// `counts` divided by the category total.
    pub distributions: PerCategory<Vec<f64>>,
}

impl GenderAgeDistribution {
    /// Aggregates the victim and suspect tables in one pass.
    ///
    /// The role of each participant is the role of its table.
    #[must_use]
    pub fn compute(config: &AggregationConfig, victims: &RoleTable, suspects: &RoleTable) -> Self {
        let mut ages = PerCategory::<Vec<u32>>::default();
        let mut histograms = PerCategory::from_fn(|_| AgeHistogram::new(config.bucket_count()));
        let mut excluded = 0_usize;

        for table in [victims, suspects] {
            for participant in table.participants() {
                let age = participant.age.filter(|&age| age < config.max_age);
                let category = Category::classify(table.role, &participant.gender);
                let (Some(age), Some(category)) = (age, category) else {
                    excluded += 1;
                    continue;
                };
                histograms.get_mut(category).record(age);
                ages.get_mut(category).push(age);
            }
        }

        log::info!(
            "aggregated ages: {} male victims, {} female victims, {} male suspects, {} female suspects ({excluded} excluded)",
            ages.male_victim.len(),
            ages.female_victim.len(),
            ages.male_suspect.len(),
            ages.female_suspect.len(),
        );

        Self {
            max_age: config.max_age,
            counts: histograms.map(|_, histogram| histogram.counts.clone()),
            distributions: histograms.map(|_, histogram| histogram.distribution()),
            ages,
        }
    }

    /// Descriptive statistics of each category's raw age list.
    #[must_use]
    pub fn summaries(&self) -> PerCategory<Option<DescriptiveStats>> {
        self.ages
            .map(|_, ages| DescriptiveStats::new(ages.iter().copied()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use gvstat_data::{dataset::ParticipantRow, participant::Participant};

    use super::*;

    fn table(role: Role, participants: Vec<Participant>) -> RoleTable {
        RoleTable {
            role,
            rows: vec![ParticipantRow {
                date: NaiveDate::from_ymd_opt(2017, 3, 1).unwrap(),
                participants,
            }],
        }
    }

    fn person(age: Option<u32>, gender: Gender) -> Participant {
        Participant::new(age, gender, None)
    }

    #[test]
    fn test_out_of_range_age_not_counted() {
        let victims = table(
            Role::Victim,
            vec![
                person(Some(20), Gender::Male),
                person(Some(20), Gender::Female),
                person(Some(150), Gender::Male),
            ],
        );
        let suspects = RoleTable::new(Role::Suspect);
        let dist = GenderAgeDistribution::compute(&AggregationConfig::default(), &victims, &suspects);

        assert_eq!(dist.counts.male_victim[20], 1);
        assert_eq!(dist.counts.female_victim[20], 1);
        assert_eq!(dist.counts.male_victim.iter().sum::<u64>(), 1);
        assert_eq!(dist.ages.male_victim, [20]);
        assert!(dist.ages.male_suspect.is_empty());
    }

    #[test]
    fn test_max_age_is_exclusive() {
        let config = AggregationConfig::default();
        let victims = table(
            Role::Victim,
            vec![
                person(Some(config.max_age - 1), Gender::Male),
                person(Some(config.max_age), Gender::Male),
            ],
        );
        let dist = GenderAgeDistribution::compute(&config, &victims, &RoleTable::new(Role::Suspect));
        assert_eq!(dist.ages.male_victim, [config.max_age - 1]);
        assert_eq!(dist.counts.male_victim.len(), 110);
    }

    #[test]
    fn test_unclassified_and_missing_age_excluded() {
        let suspects = table(
            Role::Suspect,
            vec![
                person(Some(30), Gender::Other(String::new())),
                person(None, Gender::Female),
                person(Some(23), Gender::Female),
            ],
        );
        let dist = GenderAgeDistribution::compute(
            &AggregationConfig::default(),
            &RoleTable::new(Role::Victim),
            &suspects,
        );
        assert_eq!(dist.ages.female_suspect, [23]);
        assert!(dist.ages.male_suspect.is_empty());
    }

    #[test]
    fn test_distributions_sum_to_one_or_zero() {
        let suspects = table(
            Role::Suspect,
            vec![
                person(Some(18), Gender::Male),
                person(Some(18), Gender::Male),
                person(Some(19), Gender::Male),
                person(Some(45), Gender::Male),
            ],
        );
        let dist = GenderAgeDistribution::compute(
            &AggregationConfig::default(),
            &RoleTable::new(Role::Victim),
            &suspects,
        );
        let sum = dist.distributions.male_suspect.iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!((dist.distributions.male_suspect[18] - 0.5).abs() < 1e-12);
        assert!(dist.distributions.female_suspect.iter().all(|&p| p == 0.0));
        assert!(dist.distributions.male_victim.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let victims = table(
            Role::Victim,
            (0..50)
                .map(|i| person(Some(i * 3 % 120), if i % 3 == 0 { Gender::Female } else { Gender::Male }))
                .collect(),
        );
        let suspects = table(Role::Suspect, vec![person(Some(17), Gender::Male)]);
        let config = AggregationConfig::default();
        let first = GenderAgeDistribution::compute(&config, &victims, &suspects);
        let second = GenderAgeDistribution::compute(&config, &victims, &suspects);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summaries() {
        let suspects = table(
            Role::Suspect,
            vec![person(Some(18), Gender::Male), person(Some(22), Gender::Male)],
        );
        let dist = GenderAgeDistribution::compute(
            &AggregationConfig::default(),
            &RoleTable::new(Role::Victim),
            &suspects,
        );
        let summaries = dist.summaries();
        let male = summaries.male_suspect.as_ref().unwrap();
        assert_eq!((male.min, male.max, male.count), (18, 22, 2));
        assert!(summaries.female_victim.is_none());
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            Category::classify(Role::Suspect, &Gender::Female),
            Some(Category::FemaleSuspect)
        );
        assert_eq!(Category::classify(Role::Victim, &Gender::Other("x".into())), None);
        for category in Category::ALL {
            assert_eq!(
                Category::classify(category.role(), &Gender::Male).map(Category::role),
                Some(category.role())
            );
        }
    }
}
