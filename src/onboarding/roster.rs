//! Employee roster: add people, then generate department/role drafts for
//! any of them in any order.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;
use tracing::info;

use super::model::{Deliverable, Department, Employee};
use super::prompts::roster_prompt;
use crate::error::OnboardingError;
use crate::llm::{TextGenerator, respond};

/// A generated draft and whether the user marked it as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub text: String,
    pub sent: bool,
}

/// One employee and their drafts.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntry {
    pub employee: Employee,
    pub drafts: BTreeMap<Deliverable, Draft>,
}

/// In-memory list of employees, in insertion order.
#[derive(Debug, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an employee. All fields are required. Names need not be unique;
    /// lookups return the earliest match.
    pub fn add_employee(
        &mut self,
        name: &str,
        email: &str,
        department: Department,
        role: &str,
    ) -> Result<&RosterEntry, OnboardingError> {
        let employee = Employee::for_roster(name, email, department, role)?;
        info!(employee = %employee.name, %department, "Employee added to roster");
        self.entries.push(RosterEntry {
            employee,
            drafts: BTreeMap::new(),
        });
        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    pub fn get(&self, name: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.employee.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut RosterEntry, OnboardingError> {
        self.entries
            .iter_mut()
            .find(|e| e.employee.name == name)
            .ok_or_else(|| OnboardingError::EmployeeNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.employee.name.as_str()).collect()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prompt that [`generate`](Self::generate) would send for this
    /// employee and deliverable.
    pub fn prompt_for(
        &self,
        name: &str,
        deliverable: Deliverable,
    ) -> Result<String, OnboardingError> {
        let entry = self
            .get(name)
            .ok_or_else(|| OnboardingError::EmployeeNotFound(name.to_string()))?;
        let department = entry.employee.department.unwrap_or(Department::Engineering);
        Ok(roster_prompt(deliverable, department, &entry.employee.role))
    }

    /// Store freshly generated text. Replaces any previous draft and clears
    /// its sent flag.
    pub fn store_draft(
        &mut self,
        name: &str,
        deliverable: Deliverable,
        text: String,
    ) -> Result<&Draft, OnboardingError> {
        let entry = self.get_mut(name)?;
        info!(employee = name, %deliverable, "Roster draft generated");
        let draft = Draft { text, sent: false };
        Ok(match entry.drafts.entry(deliverable) {
            Entry::Vacant(slot) => slot.insert(draft),
            Entry::Occupied(mut slot) => {
                slot.insert(draft);
                slot.into_mut()
            }
        })
    }

    /// Generate (or regenerate) a draft while holding the roster.
    ///
    /// Shared front ends should call [`prompt_for`](Self::prompt_for) and
    /// [`store_draft`](Self::store_draft) around the generation call instead,
    /// so other requests are not blocked while the endpoint works.
    pub async fn generate(
        &mut self,
        name: &str,
        deliverable: Deliverable,
        generator: &dyn TextGenerator,
    ) -> Result<&Draft, OnboardingError> {
        let prompt = self.prompt_for(name, deliverable)?;
        let text = respond(generator, &prompt).await;
        self.store_draft(name, deliverable, text)
    }

    /// Replace a draft's text with the user's edit.
    pub fn edit(
        &mut self,
        name: &str,
        deliverable: Deliverable,
        text: String,
    ) -> Result<&Draft, OnboardingError> {
        let draft = self.draft_mut(name, deliverable)?;
        draft.text = text;
        Ok(draft)
    }

    /// Flag a draft as sent. Nothing is delivered.
    pub fn mark_sent(
        &mut self,
        name: &str,
        deliverable: Deliverable,
    ) -> Result<&Draft, OnboardingError> {
        let draft = self.draft_mut(name, deliverable)?;
        draft.sent = true;
        info!(employee = name, %deliverable, "Roster draft marked as sent");
        Ok(draft)
    }

    fn draft_mut(
        &mut self,
        name: &str,
        deliverable: Deliverable,
    ) -> Result<&mut Draft, OnboardingError> {
        let entry = self.get_mut(name)?;
        entry
            .drafts
            .get_mut(&deliverable)
            .ok_or_else(|| OnboardingError::NoDraft {
                employee: name.to_string(),
                deliverable,
            })
    }
}
