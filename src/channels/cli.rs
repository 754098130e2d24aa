//! CLI channel: stdin/stdout session driving one staged onboarding flow.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use crate::error;
use crate::llm::TextGenerator;
use crate::onboarding::{Deliverable, Employee, Orchestrator, parse_start_date};

const HELP: &str = "\
Commands:
  status                     show stage, employee and drafts
  agents                     list agents
  run [agent]                run an agent (defaults to the current stage's agent)
  show <deliverable>         print a draft
  edit <deliverable> <text>  replace a draft with your own text
  send <deliverable>         mark welcome_email / it_setup_email as sent
  complete                   mark the current stage complete
  help                       this text
  quit                       exit
Deliverables: welcome_email, it_setup_email, first_day_checklist, training_plan, check_in_plan";

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Agents,
    Run(Option<String>),
    Show(Deliverable),
    Edit(Deliverable, String),
    Send(Deliverable),
    Complete,
    Help,
    Quit,
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let deliverable = |arg: &str| -> Result<Deliverable, String> {
        if arg.is_empty() {
            return Err(format!("Usage: {verb} <deliverable>"));
        }
        arg.parse::<Deliverable>().map_err(|e| e.to_string())
    };

    match verb.to_ascii_lowercase().as_str() {
        "status" => Ok(Command::Status),
        "agents" => Ok(Command::Agents),
        "run" => Ok(Command::Run((!rest.is_empty()).then(|| rest.to_string()))),
        "show" => Ok(Command::Show(deliverable(rest)?)),
        "send" => Ok(Command::Send(deliverable(rest)?)),
        "edit" => {
            let (target, text) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "Usage: edit <deliverable> <text>".to_string())?;
            Ok(Command::Edit(deliverable(target)?, text.trim().to_string()))
        }
        "complete" => Ok(Command::Complete),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "/quit" => Ok(Command::Quit),
        other => Err(format!("Unknown command: {other}. Type 'help' for a list.")),
    }
}

/// Interactive session state.
pub struct CliSession {
    orchestrator: Orchestrator,
}

impl CliSession {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Render the onboarding progress block.
    pub fn status(&self) -> String {
        let state = self.orchestrator.state();
        let employee = &state.employee;
        let mut out = vec![
            "### Onboarding Progress".to_string(),
            format!("Status: {}", state.stage),
            format!(
                "Employee: {} ({}), starting {}",
                employee.name,
                employee.role,
                employee
                    .start_date
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            ),
        ];
        for deliverable in Deliverable::ALL {
            let filled = if state.output(deliverable).is_some() {
                "ready"
            } else {
                "empty"
            };
            let sent = if state.is_sent(deliverable) { ", sent" } else { "" };
            out.push(format!("- {}: {filled}{sent}", deliverable.title()));
        }
        if let Some(agent) = self.orchestrator.current_agent() {
            out.push(format!("Next: run '{agent}', review, then 'complete'."));
        }
        out.join("\n")
    }

    /// Match user input against agent names, case-insensitively, by prefix.
    fn resolve_agent(&self, input: &str) -> Option<String> {
        let wanted = input.trim().to_ascii_lowercase();
        self.orchestrator
            .agent_names()
            .into_iter()
            .find(|name| name.to_ascii_lowercase().starts_with(&wanted))
            .map(str::to_string)
    }

    /// Apply a command and return the text to print.
    pub async fn handle(&mut self, command: Command) -> String {
        match command {
            Command::Status => self.status(),
            Command::Agents => self.orchestrator.agent_names().join("\n"),
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
            Command::Run(name) => {
                let target = match name {
                    Some(input) => self.resolve_agent(&input).unwrap_or(input),
                    None => match self.orchestrator.current_agent() {
                        Some(agent) => agent.to_string(),
                        None => return "Onboarding is complete; no agent to run.".to_string(),
                    },
                };
                eprintln!("⏳ Running {target}...");
                let outcome = self.orchestrator.run_agent(&target).await;
                outcome.message()
            }
            Command::Show(deliverable) => {
                match self.orchestrator.state().output(deliverable) {
                    Some(text) => format!("### {}\n{text}", deliverable.title()),
                    None => format!("{} has not been generated yet.", deliverable.title()),
                }
            }
            Command::Edit(deliverable, text) => match self.orchestrator.edit(deliverable, text) {
                Ok(()) => format!("{} updated.", deliverable.title()),
                Err(e) => e.to_string(),
            },
            Command::Send(deliverable) => match self.orchestrator.mark_sent(deliverable) {
                Ok(()) => format!("{} sent successfully.", deliverable.title()),
                Err(e) => e.to_string(),
            },
            Command::Complete => {
                let stage = self.orchestrator.state().stage;
                match self.orchestrator.complete_stage(stage) {
                    Ok(next) => format!("{stage} marked as complete. Status: {next}"),
                    Err(e) => e.to_string(),
                }
            }
        }
    }
}

/// Prompt for the employee's details until all three are valid.
/// Returns `None` on end of input.
pub async fn read_employee<R>(lines: &mut Lines<R>) -> error::Result<Option<Employee>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        eprint!("Employee name: ");
        let Some(name) = lines.next_line().await? else {
            return Ok(None);
        };
        eprint!("Start date (YYYY-MM-DD): ");
        let Some(start) = lines.next_line().await? else {
            return Ok(None);
        };
        eprint!("Role: ");
        let Some(role) = lines.next_line().await? else {
            return Ok(None);
        };

        match parse_start_date(&start).and_then(|date| Employee::for_staged(&name, date, &role)) {
            Ok(employee) => return Ok(Some(employee)),
            Err(e) => {
                eprintln!("⚠️  {e}. Please fill in all the employee details to proceed.");
            }
        }
    }
}

/// Run the interactive session on stdin/stdout until `quit` or EOF.
pub async fn run_cli(generator: Arc<dyn TextGenerator>) -> error::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(employee) = read_employee(&mut lines).await? else {
        return Ok(());
    };
    let mut session = CliSession::new(Orchestrator::new(employee, generator));
    println!("\n{}\n", session.status());
    eprint!("> ");

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    eprint!("> ");
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => println!("\n{}\n", session.handle(command).await),
                    Err(msg) => eprintln!("{msg}"),
                }
                eprint!("> ");
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::LlmError;
    use crate::onboarding::OnboardingStage;

    struct StubGenerator;

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn model_name(&self) -> &str {
            "stub"
        }
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok("generated text".to_string())
        }
    }

    fn session() -> CliSession {
        let employee =
            Employee::for_staged("Ana", parse_start_date("2024-10-07").unwrap(), "QA").unwrap();
        CliSession::new(Orchestrator::new(employee, Arc::new(StubGenerator)))
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("status").unwrap(), Command::Status);
        assert_eq!(parse_command("run").unwrap(), Command::Run(None));
        assert_eq!(
            parse_command("run Training Agent").unwrap(),
            Command::Run(Some("Training Agent".to_string()))
        );
        assert_eq!(
            parse_command("show welcome_email").unwrap(),
            Command::Show(Deliverable::WelcomeEmail)
        );
        assert_eq!(
            parse_command("edit training_plan  Week 1: shadowing").unwrap(),
            Command::Edit(Deliverable::TrainingPlan, "Week 1: shadowing".to_string())
        );
        assert_eq!(parse_command("QUIT").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("dance").is_err());
        assert!(parse_command("show").is_err());
        assert!(parse_command("send resume").is_err());
        assert!(parse_command("edit training_plan").is_err());
    }

    #[tokio::test]
    async fn run_defaults_to_current_agent() {
        let mut session = session();
        let out = session.handle(Command::Run(None)).await;
        assert!(out.starts_with("Preboarding emails generated"));
        let shown = session.handle(Command::Show(Deliverable::WelcomeEmail)).await;
        assert!(shown.contains("generated text"));
    }

    #[tokio::test]
    async fn run_resolves_agent_prefix() {
        let mut session = session();
        let out = session.handle(Command::Run(Some("training".to_string()))).await;
        assert_eq!(out, "Training Agent runs at Training Ready; onboarding is at Preboarding.");
        let out = session.handle(Command::Run(Some("payroll".to_string()))).await;
        assert_eq!(out, "Agent not found.");
    }

    #[tokio::test]
    async fn complete_advances_one_stage() {
        let mut session = session();
        let out = session.handle(Command::Complete).await;
        assert_eq!(out, "Preboarding marked as complete. Status: First Day Ready");
        assert_eq!(
            session.orchestrator().state().stage,
            OnboardingStage::FirstDayReady
        );
    }

    #[tokio::test]
    async fn send_only_applies_to_emails() {
        let mut session = session();
        let out = session.handle(Command::Send(Deliverable::ItSetupEmail)).await;
        assert_eq!(out, "IT Setup Email sent successfully.");
        let out = session.handle(Command::Send(Deliverable::TrainingPlan)).await;
        assert_eq!(out, "training_plan cannot be sent");
        assert!(session.status().contains("- IT Setup Email: empty, sent"));
    }

    #[tokio::test]
    async fn edit_requires_generated_draft() {
        let mut session = session();
        let out = session
            .handle(Command::Edit(Deliverable::WelcomeEmail, "Hi Ana".to_string()))
            .await;
        assert_eq!(
            out,
            "welcome_email has not been generated yet; it is drafted at Preboarding"
        );

        session.handle(Command::Run(None)).await;
        let out = session
            .handle(Command::Edit(Deliverable::WelcomeEmail, "Hi Ana".to_string()))
            .await;
        assert_eq!(out, "Welcome Email updated.");
        let shown = session.handle(Command::Show(Deliverable::WelcomeEmail)).await;
        assert_eq!(shown, "### Welcome Email\nHi Ana");
    }

    #[tokio::test]
    async fn read_employee_retries_until_valid() {
        let input: &[u8] = b"Ana\nnot-a-date\nQA\nAna\n2024-10-07\nQA\n";
        let mut lines = BufReader::new(input).lines();
        let employee = read_employee(&mut lines).await.unwrap().unwrap();
        assert_eq!(employee.name, "Ana");
        assert_eq!(employee.start_date.unwrap().to_string(), "2024-10-07");
    }

    #[tokio::test]
    async fn read_employee_stops_at_eof() {
        let input: &[u8] = b"Ana\n";
        let mut lines = BufReader::new(input).lines();
        assert!(read_employee(&mut lines).await.unwrap().is_none());
    }
}
