//! Onboarding stage machine and the shared state the stage agents write to.

use serde::{Deserialize, Serialize};

use super::model::{Deliverable, Employee};
use crate::error::OnboardingError;

/// The stages of an onboarding flow.
///
/// Progresses linearly: Preboarding → First Day Ready → Training Ready →
/// Check-in Ready → Complete. Never moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStage {
    Preboarding,
    FirstDayReady,
    TrainingReady,
    CheckInReady,
    Complete,
}

impl OnboardingStage {
    pub const ALL: [OnboardingStage; 5] = [
        OnboardingStage::Preboarding,
        OnboardingStage::FirstDayReady,
        OnboardingStage::TrainingReady,
        OnboardingStage::CheckInReady,
        OnboardingStage::Complete,
    ];

    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: OnboardingStage) -> bool {
        self.next() == Some(target)
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The next stage in the sequence, if any.
    pub fn next(&self) -> Option<OnboardingStage> {
        use OnboardingStage::*;
        match self {
            Preboarding => Some(FirstDayReady),
            FirstDayReady => Some(TrainingReady),
            TrainingReady => Some(CheckInReady),
            CheckInReady => Some(Complete),
            Complete => None,
        }
    }
}

impl Default for OnboardingStage {
    fn default() -> Self {
        Self::Preboarding
    }
}

impl std::fmt::Display for OnboardingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Preboarding => "Preboarding",
            Self::FirstDayReady => "First Day Ready",
            Self::TrainingReady => "Training Ready",
            Self::CheckInReady => "Check-in Ready",
            Self::Complete => "Complete",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OnboardingStage {
    type Err = String;

    /// Accepts the display label or the snake_case serde name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "preboarding" => Ok(Self::Preboarding),
            "first_day_ready" => Ok(Self::FirstDayReady),
            "training_ready" => Ok(Self::TrainingReady),
            "check_in_ready" => Ok(Self::CheckInReady),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("Unknown stage: {s}")),
        }
    }
}

/// Preboarding outputs plus the two "sent" flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreboardingOutput {
    pub welcome_email: Option<String>,
    pub it_email: Option<String>,
    pub welcome_email_sent: bool,
    pub it_email_sent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstDayOutput {
    pub checklist: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingOutput {
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInOutput {
    pub reminders: Option<String>,
}

/// Shared state for one staged onboarding flow. Lives only in memory.
///
/// Output slots start empty and are filled by the stage agents. The sent
/// flags are independent of slot contents and nothing checks one against
/// the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub stage: OnboardingStage,
    pub employee: Employee,
    pub preboarding: PreboardingOutput,
    pub first_day: FirstDayOutput,
    pub training: TrainingOutput,
    pub check_in: CheckInOutput,
}

impl OnboardingState {
    pub fn new(employee: Employee) -> Self {
        Self {
            stage: OnboardingStage::default(),
            employee,
            preboarding: PreboardingOutput::default(),
            first_day: FirstDayOutput::default(),
            training: TrainingOutput::default(),
            check_in: CheckInOutput::default(),
        }
    }

    /// Mark `stage` complete and advance to the next one.
    ///
    /// Only the current stage can be completed; anything else is rejected
    /// without touching state.
    pub fn complete_stage(
        &mut self,
        stage: OnboardingStage,
    ) -> Result<OnboardingStage, OnboardingError> {
        if self.stage.is_terminal() {
            return Err(OnboardingError::AlreadyComplete);
        }
        if stage != self.stage {
            return Err(OnboardingError::StageMismatch {
                requested: stage,
                current: self.stage,
            });
        }
        let next = self.stage.next().ok_or(OnboardingError::AlreadyComplete)?;
        self.stage = next;
        Ok(next)
    }

    /// Current text of an output slot.
    pub fn output(&self, deliverable: Deliverable) -> Option<&str> {
        match deliverable {
            Deliverable::WelcomeEmail => self.preboarding.welcome_email.as_deref(),
            Deliverable::ItSetupEmail => self.preboarding.it_email.as_deref(),
            Deliverable::FirstDayChecklist => self.first_day.checklist.as_deref(),
            Deliverable::TrainingPlan => self.training.plan.as_deref(),
            Deliverable::CheckInPlan => self.check_in.reminders.as_deref(),
        }
    }

    /// Overwrite an output slot with freshly generated text.
    pub fn set_output(&mut self, deliverable: Deliverable, text: String) {
        let slot = match deliverable {
            Deliverable::WelcomeEmail => &mut self.preboarding.welcome_email,
            Deliverable::ItSetupEmail => &mut self.preboarding.it_email,
            Deliverable::FirstDayChecklist => &mut self.first_day.checklist,
            Deliverable::TrainingPlan => &mut self.training.plan,
            Deliverable::CheckInPlan => &mut self.check_in.reminders,
        };
        *slot = Some(text);
    }

    /// Replace a slot's text with a user edit. Only slots that already hold
    /// a generated draft can be edited.
    pub fn edit_output(
        &mut self,
        deliverable: Deliverable,
        text: String,
    ) -> Result<(), OnboardingError> {
        if self.output(deliverable).is_none() {
            return Err(OnboardingError::NotGenerated(deliverable));
        }
        self.set_output(deliverable, text);
        Ok(())
    }

    /// Flip the "sent" flag for one of the preboarding emails.
    pub fn mark_sent(&mut self, deliverable: Deliverable) -> Result<(), OnboardingError> {
        match deliverable {
            Deliverable::WelcomeEmail => self.preboarding.welcome_email_sent = true,
            Deliverable::ItSetupEmail => self.preboarding.it_email_sent = true,
            other => return Err(OnboardingError::NotSendable(other)),
        }
        Ok(())
    }

    pub fn is_sent(&self, deliverable: Deliverable) -> bool {
        match deliverable {
            Deliverable::WelcomeEmail => self.preboarding.welcome_email_sent,
            Deliverable::ItSetupEmail => self.preboarding.it_email_sent,
            _ => false,
        }
    }
}
