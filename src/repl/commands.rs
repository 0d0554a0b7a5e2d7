//! Command handler for REPL built-in commands

use anyhow::Result;
use colored::*;

use crate::knowledge::KnowledgeBase;
use crate::milestones::MilestoneQueryEngine;
use crate::repl::display::{format_entries, format_skipped, DisplayManager};

/// Words that end the session when typed on their own
pub const EXIT_TOKENS: [&str; 3] = ["exit", "end", "quit"];

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Milestones { question: String },
    Entries { limit: Option<usize> },
    Skipped,
    Verbose { enable: bool },
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check if input is a slash command
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// `exit`, `end` or `quit`, ignoring case and surrounding whitespace
pub fn is_exit_token(input: &str) -> bool {
    let word = input.trim().to_lowercase();
    EXIT_TOKENS.contains(&word.as_str())
}

/// Command handler for parsing and executing REPL commands
pub struct CommandHandler {
    verbose: bool,
}

impl CommandHandler {
    /// Create new command handler
    pub fn new() -> Self {
        CommandHandler { verbose: false }
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        let Some(body) = trimmed.strip_prefix('/') else {
            return Command::Unknown { input: input.to_string() };
        };

        let mut parts = body.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().map(str::trim).unwrap_or("");

        match name.as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "milestones" | "m" if !rest.is_empty() => Command::Milestones {
                question: rest.to_string(),
            },
            "entries" => Command::Entries {
                limit: rest.parse().ok(),
            },
            "skipped" => Command::Skipped,
            "verbose" => {
                let enable = match rest.to_lowercase().as_str() {
                    "" | "on" | "1" | "true" => true,
                    _ => false,
                };
                Command::Verbose { enable }
            }
            "clear" | "cls" => Command::Clear,
            _ => Command::Unknown { input: input.to_string() },
        }
    }

    /// Execute a command
    ///
    /// Returns true if REPL should continue, false if should exit
    pub fn execute(
        &mut self,
        command: Command,
        knowledge: &KnowledgeBase,
        display: &DisplayManager,
    ) -> Result<bool> {
        match command {
            Command::Help => {
                self.show_help();
                Ok(true)
            }
            Command::Exit => Ok(false),
            Command::Milestones { question } => {
                let report = MilestoneQueryEngine::new().query(knowledge.entries(), &question);
                println!("\n{}\n", report);
                Ok(true)
            }
            Command::Entries { limit } => {
                display.show_listing(&format_entries(knowledge, Some(limit.unwrap_or(20))));
                Ok(true)
            }
            Command::Skipped => {
                display.show_listing(&format_skipped(knowledge));
                Ok(true)
            }
            Command::Verbose { enable } => {
                self.verbose = enable;
                let status = if enable { "enabled" } else { "disabled" };
                println!("{}", format!("Verbose mode {}", status).cyan());
                Ok(true)
            }
            Command::Clear => {
                display.clear_screen()?;
                Ok(true)
            }
            Command::Unknown { input } => {
                println!("{}", format!("Unknown command: {}", input).red());
                println!("Type {} for available commands", "/help".cyan());
                Ok(true)
            }
        }
    }

    /// Display help information
    fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/milestones <question>", "Milestones for an age, e.g. /milestones 6 months"),
            ("/entries [n]", "List the first n knowledge base entries (default: 20)"),
            ("/skipped", "List knowledge base nodes skipped while loading"),
            ("/verbose [on|off]", "Show the entries behind each answer"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, /quit, /q", "Exit"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<24} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Type your question directly (no / prefix)");
        println!("  - Questions mentioning milestones get the milestone report");
        println!("  - Use {} for question history", "UP/DOWN arrows".cyan());
        println!(
            "  - Enter {}, {} or {} (or press {}) to exit",
            "exit".cyan(),
            "end".cyan(),
            "quit".cyan(),
            "Ctrl-D".cyan()
        );
        println!();
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Set verbose mode
    pub fn set_verbose(&mut self, enable: bool) {
        self.verbose = enable;
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Entry;

    #[test]
    fn test_exit_tokens() {
        for input in ["exit", "end", "quit", "  QUIT ", "End\n"] {
            assert!(is_exit_token(input), "{input:?} should exit");
        }
        for input in ["exit now", "ending", "/exit", "", "q"] {
            assert!(!is_exit_token(input), "{input:?} should not exit");
        }
    }

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command("  /entries 5"));
        assert!(!is_command("when do babies crawl?"));
    }

    #[test]
    fn test_parse_basic_commands() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/help"), Command::Help);
        assert_eq!(handler.parse("/H"), Command::Help);
        assert_eq!(handler.parse("/quit"), Command::Exit);
        assert_eq!(handler.parse("/skipped"), Command::Skipped);
        assert_eq!(handler.parse("/cls"), Command::Clear);
    }

    #[test]
    fn test_parse_milestones_keeps_question() {
        let handler = CommandHandler::new();
        assert_eq!(
            handler.parse("/milestones what about 9 months?"),
            Command::Milestones {
                question: "what about 9 months?".to_string()
            }
        );
        assert!(matches!(handler.parse("/milestones"), Command::Unknown { .. }));
    }

    #[test]
    fn test_parse_entries_limit() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/entries"), Command::Entries { limit: None });
        assert_eq!(handler.parse("/entries 5"), Command::Entries { limit: Some(5) });
        assert_eq!(handler.parse("/entries lots"), Command::Entries { limit: None });
    }

    #[test]
    fn test_parse_verbose() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/verbose"), Command::Verbose { enable: true });
        assert_eq!(handler.parse("/verbose on"), Command::Verbose { enable: true });
        assert_eq!(handler.parse("/verbose off"), Command::Verbose { enable: false });
    }

    #[test]
    fn test_parse_unknown() {
        let handler = CommandHandler::new();
        assert!(matches!(handler.parse("/bogus"), Command::Unknown { .. }));
        assert!(matches!(handler.parse("/"), Command::Unknown { .. }));
        assert!(matches!(handler.parse("no slash"), Command::Unknown { .. }));
    }

    #[test]
    fn test_execute_flow() {
        let mut handler = CommandHandler::new();
        let display = DisplayManager::new();
        let knowledge = KnowledgeBase::from_entries(vec![Entry::new(
            "milestones - 2 months - cognitive",
            "Watches you as you move",
        )]);

        assert!(handler.execute(Command::Help, &knowledge, &display).unwrap());
        assert!(handler
            .execute(
                Command::Milestones {
                    question: "2 months".to_string()
                },
                &knowledge,
                &display
            )
            .unwrap());
        assert!(handler
            .execute(Command::Entries { limit: Some(1) }, &knowledge, &display)
            .unwrap());
        assert!(!handler.execute(Command::Exit, &knowledge, &display).unwrap());
    }

    #[test]
    fn test_verbose_toggle() {
        let mut handler = CommandHandler::new();
        let display = DisplayManager::new();
        let knowledge = KnowledgeBase::default();
        assert!(!handler.is_verbose());

        handler
            .execute(Command::Verbose { enable: true }, &knowledge, &display)
            .unwrap();
        assert!(handler.is_verbose());

        handler.set_verbose(false);
        assert!(!handler.is_verbose());
    }
}
