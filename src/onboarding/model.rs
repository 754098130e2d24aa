//! Employee and deliverable data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::state::OnboardingStage;
use crate::error::OnboardingError;

/// Departments offered by the roster flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Engineering,
    #[serde(rename = "HR")]
    Hr,
    Marketing,
    Sales,
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engineering => write!(f, "Engineering"),
            Self::Hr => write!(f, "HR"),
            Self::Marketing => write!(f, "Marketing"),
            Self::Sales => write!(f, "Sales"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "engineering" => Ok(Self::Engineering),
            "hr" => Ok(Self::Hr),
            "marketing" => Ok(Self::Marketing),
            "sales" => Ok(Self::Sales),
            _ => Err(OnboardingError::UnknownDepartment(s.to_string())),
        }
    }
}

/// A new hire. Built once per onboarding flow and never mutated.
///
/// The roster flow fills `email` and `department`; the staged flow fills
/// `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl Employee {
    /// Employee for the roster flow. Every field is required.
    pub fn for_roster(
        name: &str,
        email: &str,
        department: Department,
        role: &str,
    ) -> Result<Self, OnboardingError> {
        Ok(Self {
            name: required("name", name)?,
            email: Some(required("email", email)?),
            department: Some(department),
            role: required("role", role)?,
            start_date: None,
        })
    }

    /// Employee for the staged flow. Every field is required.
    pub fn for_staged(
        name: &str,
        start_date: NaiveDate,
        role: &str,
    ) -> Result<Self, OnboardingError> {
        Ok(Self {
            name: required("name", name)?,
            email: None,
            department: None,
            role: required("role", role)?,
            start_date: Some(start_date),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, OnboardingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(OnboardingError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Parse a `YYYY-MM-DD` start date.
pub fn parse_start_date(value: &str) -> Result<NaiveDate, OnboardingError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        OnboardingError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// One generated document: an output slot in the staged flow, a draft in
/// the roster flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deliverable {
    WelcomeEmail,
    ItSetupEmail,
    FirstDayChecklist,
    TrainingPlan,
    CheckInPlan,
}

impl Deliverable {
    pub const ALL: [Deliverable; 5] = [
        Deliverable::WelcomeEmail,
        Deliverable::ItSetupEmail,
        Deliverable::FirstDayChecklist,
        Deliverable::TrainingPlan,
        Deliverable::CheckInPlan,
    ];

    /// The stage whose agent produces this deliverable.
    pub fn stage(&self) -> OnboardingStage {
        match self {
            Self::WelcomeEmail | Self::ItSetupEmail => OnboardingStage::Preboarding,
            Self::FirstDayChecklist => OnboardingStage::FirstDayReady,
            Self::TrainingPlan => OnboardingStage::TrainingReady,
            Self::CheckInPlan => OnboardingStage::CheckInReady,
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::WelcomeEmail => "Welcome Email",
            Self::ItSetupEmail => "IT Setup Email",
            Self::FirstDayChecklist => "First Day Checklist",
            Self::TrainingPlan => "Training Plan",
            Self::CheckInPlan => "Check-in Plan",
        }
    }
}

impl std::fmt::Display for Deliverable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::WelcomeEmail => "welcome_email",
            Self::ItSetupEmail => "it_setup_email",
            Self::FirstDayChecklist => "first_day_checklist",
            Self::TrainingPlan => "training_plan",
            Self::CheckInPlan => "check_in_plan",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Deliverable {
    type Err = OnboardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "welcome_email" | "welcome" => Ok(Self::WelcomeEmail),
            "it_setup_email" | "it_email" | "it" => Ok(Self::ItSetupEmail),
            "first_day_checklist" | "checklist" => Ok(Self::FirstDayChecklist),
            "training_plan" | "training" => Ok(Self::TrainingPlan),
            "check_in_plan" | "checkin_plan" | "check_in" | "checkin" => Ok(Self::CheckInPlan),
            _ => Err(OnboardingError::UnknownDeliverable(s.to_string())),
        }
    }
}
