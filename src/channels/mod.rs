//! Front ends that drive an onboarding flow.

pub mod cli;

pub use cli::{CliSession, Command, parse_command, run_cli};
