//! CLI channel — stdin/stdout consultation for local use.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::consultation::catalog;
use crate::consultation::engine::Event;
use crate::consultation::manager::{ConsultationManager, Rejection};
use crate::consultation::model::{Dimensions, Product, ProductCategory, ProjectType, Step};
use crate::consultation::presentation::{SceneView, SettleDelays, Speaker, speaker_during};
use crate::consultation::session::ConsultationSession;
use crate::error::Result;

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Forward an event to the consultation.
    Event(Event),
    /// Print the receipt.
    Summary,
    /// Redraw the current step.
    Scene,
    Help,
    Quit,
    /// Line could not be understood; carries a hint.
    Invalid(String),
}

/// Parses terminal lines into commands.
pub struct CommandParser;

impl CommandParser {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        match head.as_str() {
            "/quit" | "/exit" | "quit" | "exit" => Command::Quit,
            "/help" | "help" | "?" => Command::Help,
            "summary" | "receipt" => Command::Summary,
            "scene" | "look" => Command::Scene,
            "restart" => Command::Event(Event::Restart),
            "start" => Command::Event(Event::Start),
            "meeting" => Command::Event(Event::CompleteMeeting),
            "demolition" => Command::Event(Event::CompleteDemolition),
            "support" => Command::Event(Event::CompleteSupportCheck),
            "project" => match rest.to_lowercase().parse::<ProjectType>() {
                Ok(project) => Command::Event(Event::SelectProject { project }),
                Err(e) => Command::Invalid(e),
            },
            "diagnosis" if !rest.is_empty() => Command::Event(Event::SubmitDiagnosis {
                value: rest.to_string(),
            }),
            "product" if !rest.is_empty() => Command::Event(Event::SelectProduct {
                product: catalog::product(rest).unwrap_or_else(|| unlisted_product(rest)),
            }),
            "measure" => parse_measure(rest),
            "color" if !rest.is_empty() => Command::Event(Event::SelectColor {
                color: rest.to_string(),
            }),
            "install" => Command::Event(Event::SubmitInstallationItems {
                items: if rest.is_empty() {
                    catalog::installation_items()
                } else {
                    split_list(rest)
                },
            }),
            "tools" => Command::Event(Event::SubmitTools {
                items: split_list(rest),
            }),
            "services" => Command::Event(Event::SubmitServices {
                services: rest
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_lowercase())
                    .collect(),
            }),
            _ if trimmed.starts_with('{') => match serde_json::from_str::<Event>(trimmed) {
                Ok(event) => Command::Event(event),
                Err(e) => Command::Invalid(format!("Invalid event JSON: {e}")),
            },
            _ => Command::Invalid(format!("Unknown command '{trimmed}'. Type help.")),
        }
    }
}

fn parse_measure(rest: &str) -> Command {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    let usage = || Command::Invalid("Usage: measure <length> <width> [layers]".to_string());

    let (Some(length), Some(width)) = (parts.first(), parts.get(1)) else {
        return usage();
    };
    let (Ok(length), Ok(width)) = (length.parse::<f64>(), width.parse::<f64>()) else {
        return usage();
    };
    let mut dimensions = Dimensions::new(length, width);
    if let Some(layers) = parts.get(2) {
        match layers.parse::<u8>() {
            Ok(layers) => dimensions = dimensions.with_layers(layers),
            Err(_) => return usage(),
        }
    }
    if parts.len() > 3 {
        return usage();
    }
    Command::Event(Event::SubmitMeasurement { dimensions })
}

fn split_list(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Placeholder for an id the catalog does not stock; the engine rejects it.
fn unlisted_product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: id.to_string(),
        category: ProductCategory::Floor,
        description: String::new(),
        price: Decimal::ZERO,
        unit: String::new(),
        features: Vec::new(),
    }
}

/// Text printed for one input line.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// Terminal front end over a [`ConsultationManager`].
pub struct CliChannel {
    manager: Arc<ConsultationManager>,
    settle: SettleDelays,
}

impl CliChannel {
    pub fn new(manager: Arc<ConsultationManager>, settle: SettleDelays) -> Self {
        Self { manager, settle }
    }

    /// Read commands from stdin until EOF or `/quit`.
    pub async fn run(&self) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let intro = render_step(&self.manager.snapshot().await);
        stdout.write_all(format!("{intro}\n> ").as_bytes()).await?;
        stdout.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                stdout.write_all(b"> ").await?;
                stdout.flush().await?;
                continue;
            }
            let reply = self.handle_line(&line).await;
            stdout.write_all(format!("\n{}\n", reply.text).as_bytes()).await?;
            if reply.quit {
                break;
            }
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
        }

        stdout.flush().await?;
        Ok(())
    }

    /// Handle one line and describe the outcome.
    pub async fn handle_line(&self, line: &str) -> Reply {
        match CommandParser::parse(line) {
            Command::Quit => Reply {
                text: "Goodbye.".to_string(),
                quit: true,
            },
            Command::Help => Reply::text(HELP),
            Command::Invalid(hint) => Reply::text(hint),
            Command::Scene => Reply::text(render_step(&self.manager.snapshot().await)),
            Command::Summary => match self.manager.summary().await {
                Some(summary) => Reply::text(summary.render_text()),
                None => Reply::text("The receipt is ready once the consultation is finished."),
            },
            Command::Event(event) => {
                let kind = event.kind();
                match self.manager.try_submit(event).await {
                    Ok(transition) => {
                        // The client has the floor while the settle delay runs.
                        if speaker_during(kind, &self.settle) == Speaker::Client {
                            tokio::time::sleep(self.settle.for_event(kind)).await;
                        }
                        let mut text = String::new();
                        if let Some(ack) = transition.acknowledgement {
                            text.push_str(&format!("Consultant: {ack}\n\n"));
                        }
                        text.push_str(&render_step(&transition.session));
                        Reply::text(text)
                    }
                    Err(Rejection { error: e, session }) => {
                        tracing::debug!(error = %e, "CLI event rejected");
                        match e.acknowledgement() {
                            Some(ack) => Reply::text(format!(
                                "Consultant: {ack} Please pick one of the options.\n\n{}",
                                render_step(&session)
                            )),
                            None => Reply::text(format!("Not now: {e}")),
                        }
                    }
                }
            }
        }
    }
}

const HELP: &str = "\
Commands:
  start                         leave the entrance
  project <flooring|painting|garden>
  meeting                       finish the flooring meeting
  diagnosis <value>             answer the assessment question
  demolition                    take the demolition tools
  support                       take the screed materials
  product <id>                  choose a flooring product
  measure <length> <width> [layers]
  color <name>                  choose a paint shade
  install [item, item, ...]     take installation items (all by default)
  tools <item>, <item>          choose tools (replaces the cart)
  services <id> ...             choose services (transport, installation)
  summary                       print the receipt
  scene                         show the current step again
  restart                       start over
  /quit                         leave";

/// Describe the current step and what can be answered there.
fn render_step(session: &ConsultationSession) -> String {
    let view = SceneView::for_session(session);
    let mut out = format!("[{}]", view.step);
    if let Some(prompt) = view.prompt {
        out.push_str(&format!("\nConsultant: {prompt}"));
    }

    let options: Vec<String> = match (view.step, view.project) {
        (Step::ProjectSelect, _) => ProjectType::ALL
            .iter()
            .map(|p| format!("{p}: {}", catalog::project_label(*p)))
            .collect(),
        (Step::Meeting, _) => vec!["meeting: we have an appointment".to_string()],
        (Step::Assessment, Some(project)) => catalog::diagnosis_options(project)
            .into_iter()
            .map(|o| format!("{}: {} ({})", o.value, o.label, o.description))
            .collect(),
        (Step::Demolition, _) => catalog::DEMOLITION_TOOLS
            .iter()
            .map(|t| t.to_string())
            .collect(),
        (Step::SupportCheck, _) => {
            let (advice, items) = catalog::support_checklist(session.floor_diagnosis());
            std::iter::once(advice)
                .chain(items.iter().map(|i| format!("{}: {}", i.label, i.note)))
                .collect()
        }
        (Step::ProductSelect, _) => catalog::products()
            .into_iter()
            .map(|p| format!("{}: {} ({}, {} per {})", p.id, p.name, p.description, p.price, p.unit))
            .collect(),
        (Step::Calculator, _) => vec![format!("current measurement: {}", session.measurement())],
        (Step::Installation, _) => catalog::INSTALLATION_STEPS
            .iter()
            .map(|s| s.to_string())
            .chain(
                catalog::INSTALLATION_TOOLS
                    .iter()
                    .chain(catalog::INSTALLATION_MATERIALS)
                    .map(|i| format!("{}: {}", i.label, i.note)),
            )
            .collect(),
        (Step::ColorMixer, _) => catalog::PALETTE
            .iter()
            .map(|c| format!("{} {}", c.name, c.hex))
            .collect(),
        (Step::ToolsGeneric, Some(project)) => catalog::generic_tools(project)
            .iter()
            .map(|i| format!("{}: {}", i.label, i.note))
            .collect(),
        (Step::Services, _) => catalog::SERVICES
            .iter()
            .map(|s| format!("{}: {} ({})", s.id, s.title, s.description))
            .collect(),
        (Step::Summary, _) => vec!["type summary for your receipt".to_string()],
        _ => Vec::new(),
    };

    for option in options {
        out.push_str(&format!("\n  - {option}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consultation::engine::TransitionEngine;

    fn channel() -> CliChannel {
        let manager = ConsultationManager::with_receipt_seed(TransitionEngine::default(), Some(1));
        CliChannel::new(Arc::new(manager), SettleDelays::none())
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(CommandParser::parse("start"), Command::Event(Event::Start));
        assert_eq!(CommandParser::parse("  /quit "), Command::Quit);
        assert_eq!(CommandParser::parse("RESTART"), Command::Event(Event::Restart));
        assert_eq!(CommandParser::parse("summary"), Command::Summary);
    }

    #[test]
    fn parse_project() {
        assert_eq!(
            CommandParser::parse("project Painting"),
            Command::Event(Event::SelectProject {
                project: ProjectType::Painting
            })
        );
        assert!(matches!(
            CommandParser::parse("project kitchen"),
            Command::Invalid(_)
        ));
    }

    #[test]
    fn parse_measure_with_and_without_layers() {
        assert_eq!(
            CommandParser::parse("measure 4 3.5"),
            Command::Event(Event::SubmitMeasurement {
                dimensions: Dimensions::new(4.0, 3.5)
            })
        );
        assert_eq!(
            CommandParser::parse("measure 4 3.5 3"),
            Command::Event(Event::SubmitMeasurement {
                dimensions: Dimensions::new(4.0, 3.5).with_layers(3)
            })
        );
        assert!(matches!(CommandParser::parse("measure 4"), Command::Invalid(_)));
        assert!(matches!(
            CommandParser::parse("measure four 3"),
            Command::Invalid(_)
        ));
    }

    #[test]
    fn parse_lists() {
        assert_eq!(
            CommandParser::parse("tools Roller Set, Masking Tape"),
            Command::Event(Event::SubmitTools {
                items: vec!["Roller Set".into(), "Masking Tape".into()]
            })
        );
        assert_eq!(
            CommandParser::parse("services transport, Installation"),
            Command::Event(Event::SubmitServices {
                services: vec!["transport".into(), "installation".into()]
            })
        );
        assert_eq!(
            CommandParser::parse("install"),
            Command::Event(Event::SubmitInstallationItems {
                items: catalog::installation_items()
            })
        );
    }

    #[test]
    fn parse_product_uses_catalog_record() {
        let Command::Event(Event::SelectProduct { product }) = CommandParser::parse("product krono")
        else {
            panic!("expected product selection");
        };
        assert_eq!(product.name, "Krono Original");
    }

    #[test]
    fn parse_raw_json_event() {
        assert_eq!(
            CommandParser::parse(r#"{"event": "submit_diagnosis", "value": "old"}"#),
            Command::Event(Event::SubmitDiagnosis {
                value: "old".into()
            })
        );
    }

    #[tokio::test]
    async fn handle_line_walks_a_flooring_consultation() {
        let cli = channel();
        for line in [
            "start",
            "project flooring",
            "meeting",
            "diagnosis squeaky",
            "demolition",
            "support",
            "product egger",
            "measure 4 3.5",
            "install",
            "services transport",
        ] {
            let reply = cli.handle_line(line).await;
            assert!(!reply.text.starts_with("Not now"), "{line}: {}", reply.text);
        }
        let receipt = cli.handle_line("summary").await;
        assert!(receipt.text.contains("PARQUET: 15.4 m²"));
        assert!(receipt.text.contains("PRODUCT: Egger Pro Parquet"));
        assert!(receipt.text.contains("Project code: HB-"));
    }

    #[tokio::test]
    async fn diagnosis_reply_carries_acknowledgement() {
        let cli = channel();
        cli.handle_line("start").await;
        cli.handle_line("project flooring").await;
        cli.handle_line("meeting").await;
        let reply = cli.handle_line("diagnosis squeaky").await;
        assert!(reply.text.contains("self-leveling"));
        assert!(reply.text.contains("[demolition]"));
    }

    #[tokio::test]
    async fn unknown_answer_keeps_the_step() {
        let cli = channel();
        cli.handle_line("start").await;
        cli.handle_line("project garden").await;
        let reply = cli.handle_line("diagnosis swamp").await;
        assert!(reply.text.contains("Understood."));
        assert!(reply.text.contains("[assessment]"));
    }

    #[tokio::test]
    async fn off_graph_command_is_refused() {
        let cli = channel();
        let reply = cli.handle_line("meeting").await;
        assert!(reply.text.starts_with("Not now"));
        assert!(!reply.quit);
    }

    #[tokio::test]
    async fn quit_ends_the_loop() {
        let reply = channel().handle_line("/quit").await;
        assert!(reply.quit);
    }
}
