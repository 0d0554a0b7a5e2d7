//! REPL (Read-Eval-Print Loop) module for the interactive assistant
//!
//! Reads questions, routes them through the [`Assistant`] and handles the
//! built-in slash commands.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::path::PathBuf;

use crate::assistant::{Assistant, Route};
use crate::repl::commands::{is_command, is_exit_token, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::InputHandler;

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    display_manager: DisplayManager,
    questions_answered: usize,
}

impl ReplSession {
    /// Create new REPL session
    pub fn new() -> Result<Self> {
        Ok(Self::from_input(InputHandler::new()?))
    }

    /// Create REPL session with persistent history
    pub fn with_history(history_path: PathBuf) -> Result<Self> {
        Ok(Self::from_input(InputHandler::with_history(history_path)?))
    }

    fn from_input(input_handler: InputHandler) -> Self {
        ReplSession {
            input_handler,
            command_handler: CommandHandler::new(),
            display_manager: DisplayManager::new(),
            questions_answered: 0,
        }
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str, entries: usize) {
        self.display_manager.show_banner(version, entries);
    }

    /// Read a line of input; `None` on Ctrl-D
    pub fn read_input(&mut self) -> Result<Option<String>> {
        self.input_handler.read_line()
    }

    /// Run until the user exits
    pub async fn run(&mut self, assistant: &Assistant) -> Result<()> {
        while let Some(input) = self.read_input()? {
            match self.handle_input(&input, assistant).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.display_manager.show_error(&e.to_string()),
            }
        }
        self.display_manager.show_goodbye();
        self.save()
    }

    /// Handle user input (command, exit word or question)
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str, assistant: &Assistant) -> Result<bool> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(true);
        }

        if is_exit_token(input) {
            return Ok(false);
        }

        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self
                .command_handler
                .execute(command, assistant.knowledge(), &self.display_manager);
        }

        self.answer(input, assistant).await;
        Ok(true)
    }

    async fn answer(&mut self, question: &str, assistant: &Assistant) {
        let route = Route::for_question(question);
        let _spinner = (route == Route::Answer)
            .then(|| self.display_manager.start_thinking("Looking that up..."));

        let reply = assistant.reply_via(route, question).await;
        self.display_manager.show_answer(&reply.to_string());
        if self.command_handler.is_verbose() {
            self.display_manager.show_sources(reply.sources());
        }
        self.questions_answered += 1;
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.command_handler.is_verbose()
    }

    /// Set verbose mode
    pub fn set_verbose(&mut self, enable: bool) {
        self.command_handler.set_verbose(enable);
    }

    /// Number of questions answered this session
    pub fn questions_answered(&self) -> usize {
        self.questions_answered
    }

    /// Get display manager
    pub fn display(&self) -> &DisplayManager {
        &self.display_manager
    }

    /// Save session state
    pub fn save(&mut self) -> Result<()> {
        self.input_handler.save_history()
    }
}
