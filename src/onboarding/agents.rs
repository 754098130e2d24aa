//! Stage agents and the orchestrator that dispatches to them.
//!
//! Each agent owns the deliverables of one stage and only acts while the
//! shared state sits at that stage. The orchestrator is a lookup by agent
//! name over a single [`OnboardingState`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{Deliverable, Employee};
use super::prompts::staged_prompt;
use super::state::{OnboardingStage, OnboardingState};
use crate::error::OnboardingError;
use crate::llm::{TextGenerator, respond};

/// Message returned when `run_agent` gets a name it does not know.
pub const AGENT_NOT_FOUND: &str = "Agent not found.";

/// What happened when an agent was asked to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AgentOutcome {
    /// Drafts were generated and stored.
    Completed { message: String },
    /// The state was not at the agent's stage; nothing changed.
    Skipped {
        agent: String,
        gate: OnboardingStage,
        current: OnboardingStage,
    },
    /// No agent with that name is registered.
    NotFound,
}

impl AgentOutcome {
    /// Text to show the user.
    pub fn message(&self) -> String {
        match self {
            Self::Completed { message } => message.clone(),
            Self::Skipped {
                agent,
                gate,
                current,
            } => format!("{agent} runs at {gate}; onboarding is at {current}."),
            Self::NotFound => AGENT_NOT_FOUND.to_string(),
        }
    }
}

/// An agent responsible for one onboarding stage.
#[async_trait]
pub trait StageAgent: Send + Sync {
    /// Display name, also the dispatch key.
    fn name(&self) -> &str;

    /// The stage this agent is gated on.
    fn stage(&self) -> OnboardingStage;

    /// Slots this agent fills, in generation order.
    fn deliverables(&self) -> &'static [Deliverable];

    /// Message reported after a successful run.
    fn success_message(&self) -> &'static str;

    /// Generate every deliverable for this stage and store it, overwriting
    /// previous output. Calls are made one after another.
    async fn execute(
        &self,
        state: &mut OnboardingState,
        generator: &dyn TextGenerator,
    ) -> AgentOutcome {
        if state.stage != self.stage() {
            return AgentOutcome::Skipped {
                agent: self.name().to_string(),
                gate: self.stage(),
                current: state.stage,
            };
        }

        for deliverable in self.deliverables() {
            let prompt = staged_prompt(*deliverable, &state.employee);
            debug!(agent = self.name(), %deliverable, "Generating draft");
            let text = respond(generator, &prompt).await;
            state.set_output(*deliverable, text);
        }

        AgentOutcome::Completed {
            message: self.success_message().to_string(),
        }
    }
}

/// Welcome and IT setup emails.
pub struct PreboardingAgent;

#[async_trait]
impl StageAgent for PreboardingAgent {
    fn name(&self) -> &str {
        "Preboarding Agent"
    }
    fn stage(&self) -> OnboardingStage {
        OnboardingStage::Preboarding
    }
    fn deliverables(&self) -> &'static [Deliverable] {
        &[Deliverable::WelcomeEmail, Deliverable::ItSetupEmail]
    }
    fn success_message(&self) -> &'static str {
        "Preboarding emails generated. Please send them to proceed."
    }
}

/// First day checklist.
pub struct FirstDayAgent;

#[async_trait]
impl StageAgent for FirstDayAgent {
    fn name(&self) -> &str {
        "First Day Agent"
    }
    fn stage(&self) -> OnboardingStage {
        OnboardingStage::FirstDayReady
    }
    fn deliverables(&self) -> &'static [Deliverable] {
        &[Deliverable::FirstDayChecklist]
    }
    fn success_message(&self) -> &'static str {
        "First day checklist generated. Please ensure tasks are completed."
    }
}

/// Role training plan.
pub struct TrainingAgent;

#[async_trait]
impl StageAgent for TrainingAgent {
    fn name(&self) -> &str {
        "Training Agent"
    }
    fn stage(&self) -> OnboardingStage {
        OnboardingStage::TrainingReady
    }
    fn deliverables(&self) -> &'static [Deliverable] {
        &[Deliverable::TrainingPlan]
    }
    fn success_message(&self) -> &'static str {
        "Training plan created. Please proceed with the training sessions."
    }
}

/// Check-in reminders.
pub struct CheckInAgent;

#[async_trait]
impl StageAgent for CheckInAgent {
    fn name(&self) -> &str {
        "Check-in Agent"
    }
    fn stage(&self) -> OnboardingStage {
        OnboardingStage::CheckInReady
    }
    fn deliverables(&self) -> &'static [Deliverable] {
        &[Deliverable::CheckInPlan]
    }
    fn success_message(&self) -> &'static str {
        "Check-in reminders generated. Please ensure reviews are scheduled."
    }
}

/// The four stage agents, in stage order.
pub fn default_agents() -> Vec<Box<dyn StageAgent>> {
    vec![
        Box::new(PreboardingAgent),
        Box::new(FirstDayAgent),
        Box::new(TrainingAgent),
        Box::new(CheckInAgent),
    ]
}

/// Runs one staged onboarding flow for one employee.
pub struct Orchestrator {
    id: Uuid,
    agents: Vec<Box<dyn StageAgent>>,
    generator: Arc<dyn TextGenerator>,
    state: OnboardingState,
}

impl Orchestrator {
    /// New flow with the default agents.
    pub fn new(employee: Employee, generator: Arc<dyn TextGenerator>) -> Self {
        let mut orchestrator = Self::empty(employee, generator);
        for agent in default_agents() {
            orchestrator.add_agent(agent);
        }
        orchestrator
    }

    /// New flow with no agents registered.
    pub fn empty(employee: Employee, generator: Arc<dyn TextGenerator>) -> Self {
        let id = Uuid::new_v4();
        info!(flow_id = %id, employee = %employee.name, "Onboarding flow started");
        Self {
            id,
            agents: Vec::new(),
            generator,
            state: OnboardingState::new(employee),
        }
    }

    pub fn add_agent(&mut self, agent: Box<dyn StageAgent>) {
        self.agents.push(agent);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }

    /// Name of the agent gated on the current stage, if any.
    pub fn current_agent(&self) -> Option<&str> {
        self.agents
            .iter()
            .find(|a| a.stage() == self.state.stage)
            .map(|a| a.name())
    }

    /// Run the agent registered under `name` (exact match).
    pub async fn run_agent(&mut self, name: &str) -> AgentOutcome {
        let Some(agent) = self.agents.iter().find(|a| a.name() == name) else {
            debug!(flow_id = %self.id, agent = name, "Unknown agent requested");
            return AgentOutcome::NotFound;
        };

        let outcome = agent
            .execute(&mut self.state, self.generator.as_ref())
            .await;
        match &outcome {
            AgentOutcome::Completed { .. } => {
                info!(flow_id = %self.id, agent = name, stage = %self.state.stage, "Agent finished");
            }
            AgentOutcome::Skipped { gate, current, .. } => {
                debug!(flow_id = %self.id, agent = name, %gate, %current, "Agent skipped");
            }
            AgentOutcome::NotFound => {}
        }
        outcome
    }

    /// Mark `stage` complete and advance.
    pub fn complete_stage(
        &mut self,
        stage: OnboardingStage,
    ) -> Result<OnboardingStage, OnboardingError> {
        let next = self.state.complete_stage(stage)?;
        info!(flow_id = %self.id, completed = %stage, stage = %next, "Stage completed");
        Ok(next)
    }

    pub fn mark_sent(&mut self, deliverable: Deliverable) -> Result<(), OnboardingError> {
        self.state.mark_sent(deliverable)?;
        info!(flow_id = %self.id, %deliverable, "Marked as sent (no email delivered)");
        Ok(())
    }

    /// Replace a generated slot with user-edited text.
    pub fn edit(
        &mut self,
        deliverable: Deliverable,
        text: String,
    ) -> Result<(), OnboardingError> {
        let chars = text.chars().count();
        self.state.edit_output(deliverable, text)?;
        debug!(flow_id = %self.id, %deliverable, chars, "Draft edited");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::LlmError;
    use crate::onboarding::model::parse_start_date;

    /// Returns a numbered reply per call and records prompts.
    struct CountingGenerator {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl CountingGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        fn model_name(&self) -> &str {
            "counting"
        }
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(format!("reply {n}"))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        fn model_name(&self) -> &str {
            "failing"
        }
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    fn employee() -> Employee {
        Employee::for_staged("Alice", parse_start_date("2024-10-01").unwrap(), "Engineer")
            .unwrap()
    }

    #[tokio::test]
    async fn preboarding_generates_both_emails() {
        let generator = CountingGenerator::new();
        let mut orch = Orchestrator::new(employee(), generator.clone());

        let outcome = orch.run_agent("Preboarding Agent").await;
        assert_eq!(
            outcome.message(),
            "Preboarding emails generated. Please send them to proceed."
        );
        assert_eq!(orch.state().output(Deliverable::WelcomeEmail), Some("reply 1"));
        assert_eq!(orch.state().output(Deliverable::ItSetupEmail), Some("reply 2"));

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("welcome email for Alice starting on 2024-10-01"));
        assert!(prompts[1].contains("IT setup email for Alice"));
    }

    #[tokio::test]
    async fn agent_at_wrong_stage_is_skipped() {
        let generator = CountingGenerator::new();
        let mut orch = Orchestrator::new(employee(), generator.clone());

        let outcome = orch.run_agent("Training Agent").await;
        assert!(matches!(outcome, AgentOutcome::Skipped { .. }));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(orch.state().output(Deliverable::TrainingPlan).is_none());
        assert_eq!(orch.state().stage, OnboardingStage::Preboarding);
    }

    #[tokio::test]
    async fn unknown_agent_is_reported() {
        let mut orch = Orchestrator::new(employee(), CountingGenerator::new());
        let outcome = orch.run_agent("preboarding agent").await;
        assert_eq!(outcome, AgentOutcome::NotFound);
        assert_eq!(outcome.message(), "Agent not found.");
    }

    #[tokio::test]
    async fn running_an_agent_never_advances_the_stage() {
        let mut orch = Orchestrator::new(employee(), CountingGenerator::new());
        orch.run_agent("Preboarding Agent").await;
        orch.mark_sent(Deliverable::WelcomeEmail).unwrap();
        orch.mark_sent(Deliverable::ItSetupEmail).unwrap();
        assert_eq!(orch.state().stage, OnboardingStage::Preboarding);
    }

    #[tokio::test]
    async fn rerun_overwrites_output() {
        let mut orch = Orchestrator::new(employee(), CountingGenerator::new());
        orch.complete_stage(OnboardingStage::Preboarding).unwrap();

        orch.run_agent("First Day Agent").await;
        assert_eq!(orch.state().output(Deliverable::FirstDayChecklist), Some("reply 1"));
        orch.run_agent("First Day Agent").await;
        assert_eq!(orch.state().output(Deliverable::FirstDayChecklist), Some("reply 2"));
    }

    #[tokio::test]
    async fn full_flow_reaches_complete() {
        let mut orch = Orchestrator::new(employee(), CountingGenerator::new());
        for name in ["Preboarding Agent", "First Day Agent", "Training Agent", "Check-in Agent"] {
            assert_eq!(orch.current_agent(), Some(name));
            let outcome = orch.run_agent(name).await;
            assert!(matches!(outcome, AgentOutcome::Completed { .. }), "{name}");
            let stage = orch.state().stage;
            orch.complete_stage(stage).unwrap();
        }
        assert_eq!(orch.state().stage, OnboardingStage::Complete);
        assert!(orch.current_agent().is_none());
        assert!(orch.state().output(Deliverable::CheckInPlan).is_some());
    }

    #[tokio::test]
    async fn edit_before_generation_is_rejected() {
        let generator = CountingGenerator::new();
        let mut orch = Orchestrator::new(employee(), generator.clone());

        let err = orch
            .edit(Deliverable::CheckInPlan, "typed by user".to_string())
            .unwrap_err();
        assert!(matches!(err, OnboardingError::NotGenerated(Deliverable::CheckInPlan)));
        assert!(orch.state().output(Deliverable::CheckInPlan).is_none());
        assert_eq!(orch.state().stage, OnboardingStage::Preboarding);

        orch.run_agent("Preboarding Agent").await;
        orch.edit(Deliverable::WelcomeEmail, "Hi Alice!".to_string()).unwrap();
        assert_eq!(orch.state().output(Deliverable::WelcomeEmail), Some("Hi Alice!"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn generation_errors_land_in_the_slot() {
        let mut orch = Orchestrator::new(employee(), Arc::new(FailingGenerator));
        let outcome = orch.run_agent("Preboarding Agent").await;
        assert!(matches!(outcome, AgentOutcome::Completed { .. }));
        assert_eq!(
            orch.state().output(Deliverable::WelcomeEmail),
            Some("API Error 500: boom")
        );
    }

    #[test]
    fn default_agents_cover_each_working_stage_once() {
        let agents = default_agents();
        let stages: Vec<OnboardingStage> = agents.iter().map(|a| a.stage()).collect();
        assert_eq!(
            stages,
            [
                OnboardingStage::Preboarding,
                OnboardingStage::FirstDayReady,
                OnboardingStage::TrainingReady,
                OnboardingStage::CheckInReady,
            ]
        );
    }
}
