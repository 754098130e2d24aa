//! Fixed prompt templates for onboarding drafts.
//!
//! The roster flow keys its prompts on department and role; the staged
//! flow addresses the employee by name and start date.

use super::model::{Deliverable, Department, Employee};

/// Prompt for a roster draft, keyed on department and role.
pub fn roster_prompt(deliverable: Deliverable, department: Department, role: &str) -> String {
    let task = match deliverable {
        Deliverable::WelcomeEmail => "Write a professional welcome email for a new hire.",
        Deliverable::ItSetupEmail => "Write an IT setup email for a new hire.",
        Deliverable::FirstDayChecklist => "Write a first day checklist for a new hire.",
        Deliverable::TrainingPlan => "Write a training plan for a new hire.",
        Deliverable::CheckInPlan => "Write a check-in plan for a new hire.",
    };
    format!("{task}\nDepartment: {department}\nRole: {role}")
}

/// Prompt for a staged-flow output slot.
pub fn staged_prompt(deliverable: Deliverable, employee: &Employee) -> String {
    let name = &employee.name;
    match deliverable {
        Deliverable::WelcomeEmail => {
            let start = employee
                .start_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "their start date".to_string());
            format!("Generate a professional welcome email for {name} starting on {start}.")
        }
        Deliverable::ItSetupEmail => {
            format!("Generate a professional IT setup email for {name}.")
        }
        Deliverable::FirstDayChecklist => format!(
            "Generate a checklist for {name}'s first day, including team introductions, \
             workspace setup, and tool access verification."
        ),
        Deliverable::TrainingPlan => format!(
            "Create a training plan for {name}, working as a {}. Include orientation, \
             role-specific training, and compliance training.",
            employee.role
        ),
        Deliverable::CheckInPlan => format!(
            "Create a check-in plan for {name} that includes weekly check-ins, monthly \
             performance reviews, and feedback mechanisms."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::model::parse_start_date;

    fn staged_employee() -> Employee {
        Employee::for_staged("Marco", parse_start_date("2024-11-04").unwrap(), "Designer")
            .unwrap()
    }

    #[test]
    fn roster_prompt_lists_department_and_role() {
        let prompt = roster_prompt(Deliverable::WelcomeEmail, Department::Marketing, "SEO Lead");
        assert_eq!(
            prompt,
            "Write a professional welcome email for a new hire.\nDepartment: Marketing\nRole: SEO Lead"
        );
    }

    #[test]
    fn roster_prompts_differ_per_deliverable() {
        let prompts: std::collections::HashSet<String> = Deliverable::ALL
            .iter()
            .map(|d| roster_prompt(*d, Department::Hr, "Recruiter"))
            .collect();
        assert_eq!(prompts.len(), Deliverable::ALL.len());
        assert!(prompts.iter().all(|p| p.contains("Department: HR")));
    }

    #[test]
    fn staged_welcome_mentions_start_date() {
        let prompt = staged_prompt(Deliverable::WelcomeEmail, &staged_employee());
        assert_eq!(
            prompt,
            "Generate a professional welcome email for Marco starting on 2024-11-04."
        );
    }

    #[test]
    fn staged_checklist_is_single_line() {
        let prompt = staged_prompt(Deliverable::FirstDayChecklist, &staged_employee());
        assert!(prompt.starts_with("Generate a checklist for Marco's first day"));
        assert!(prompt.contains("team introductions, workspace setup"));
        assert!(!prompt.contains('\n'));
    }

    #[test]
    fn staged_training_mentions_role() {
        let prompt = staged_prompt(Deliverable::TrainingPlan, &staged_employee());
        assert!(prompt.contains("working as a Designer."));
        assert!(prompt.contains("compliance training"));
    }

    #[test]
    fn staged_check_in_mentions_reviews() {
        let prompt = staged_prompt(Deliverable::CheckInPlan, &staged_employee());
        assert!(prompt.contains("weekly check-ins, monthly performance reviews"));
    }
}
