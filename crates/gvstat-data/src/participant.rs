//! Participants of an incident
//!
//! A participant is a person involved in one incident, either as a victim or
//! as a suspect. Only the attributes used by the statistics are modelled:
//! age, gender and (for victims) status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status substring marking a participant who did not survive.
pub const KILLED_MARKER: &str = "Killed";

/// Which source table a participant comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Victim,
    Suspect,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Victim, Role::Suspect];

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Role::Victim => "victim",
            Role::Suspect => "suspect",
        }
    }

    /// Name of the CSV column holding the participant list for this role.
    #[must_use]
    pub fn list_column(self) -> &'static str {
        match self {
            Role::Victim => "victim_info",
            Role::Suspect => "suspect_info",
        }
    }

    /// Classifies a raw participant-type value from the incident dataset.
    ///
    /// `Victim` maps to [`Role::Victim`]; any value mentioning `Suspect`
    /// (the dataset uses `Subject-Suspect`) maps to [`Role::Suspect`].
    ///
    /// # Examples
    ///
    /// ```
    /// use gvstat_data::participant::Role;
    ///
    /// assert_eq!(Role::from_participant_type("Victim"), Some(Role::Victim));
    /// assert_eq!(Role::from_participant_type("Subject-Suspect"), Some(Role::Suspect));
    /// assert_eq!(Role::from_participant_type("Witness"), None);
    /// ```
    #[must_use]
    pub fn from_participant_type(value: &str) -> Option<Self> {
        if value == "Victim" {
            Some(Role::Victim)
        } else if value.contains("Suspect") {
            Some(Role::Suspect)
        } else {
            None
        }
    }
}

/// Recorded gender of a participant.
///
/// The dataset nominally uses `Male` and `Female`; every other value,
/// including an empty one, is preserved in [`Gender::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            other => Gender::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other(value) => value,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Gender::parse(&value))
    }
}

/// One person involved in an incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Age in years, `None` when missing or unparseable.
    pub age: Option<u32>,
    pub gender: Gender,
    /// Free-form status such as `Injured`, `Killed` or `Unharmed, Arrested`.
    pub status: Option<String>,
}

impl Participant {
    #[must_use]
    pub fn new(age: Option<u32>, gender: Gender, status: Option<String>) -> Self {
        Self {
            age,
            gender,
            status,
        }
    }

    /// Whether the status records the participant as killed.
    ///
    /// A missing status counts as not killed.
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|status| status.contains(KILLED_MARKER))
    }
}

/// Parses an age given as text.
///
/// Accepts non-negative integers, optionally written as an integral float
/// (`"20.0"`). Everything else is `None`.
///
/// # Examples
///
/// ```
/// use gvstat_data::participant::parse_age;
///
/// assert_eq!(parse_age("20"), Some(20));
/// assert_eq!(parse_age(" 20.0 "), Some(20));
/// assert_eq!(parse_age("-3"), None);
/// assert_eq!(parse_age("twenty"), None);
/// ```
#[must_use]
pub fn parse_age(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(age) = text.parse::<u32>() {
        return Some(age);
    }
    text.parse::<f64>().ok().and_then(age_from_float)
}

/// Converts an integral, non-negative float to an age.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn age_from_float(value: f64) -> Option<u32> {
    let in_range = value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX);
    (in_range && value.fract() == 0.0).then(|| value as u32)
}

/// Converts a signed integer to an age, rejecting negatives.
#[must_use]
pub fn age_from_int(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}
