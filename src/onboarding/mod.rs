//! Employee onboarding: drafts generated per stage, tracked in memory.
//!
//! Two flows share the same prompts and generation client:
//! - the staged flow, where an [`Orchestrator`] walks one employee through
//!   Preboarding → First Day Ready → Training Ready → Check-in Ready →
//!   Complete and each stage's agent only runs at its own stage;
//! - the [`Roster`], where any draft can be generated for any employee at
//!   any time.
//!
//! "Send" and "mark complete" only flip local flags. Nothing is emailed and
//! nothing outlives the process.

pub mod agents;
pub mod model;
pub mod prompts;
pub mod roster;
pub mod routes;
pub mod state;

pub use agents::{AgentOutcome, Orchestrator, StageAgent, default_agents};
pub use model::{Deliverable, Department, Employee, parse_start_date};
pub use roster::{Draft, Roster, RosterEntry};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::{OnboardingStage, OnboardingState};
