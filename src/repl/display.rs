//! Display manager for the interactive terminal UI
//!
//! Manages the spinner, colored output and knowledge base listings.

use colored::*;
use crossterm::{
    cursor,
    execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

use crate::knowledge::KnowledgeBase;
use crate::rag::RetrievedEntry;

/// Introduction shown when interactive mode starts
pub const INTRO_LINES: [&str; 5] = [
    "Welcome to the New Parent AI Assistant!",
    "This application is designed to help answer questions for new parents.",
    "This is the initial version of the application, so it only contains information about developmental milestones, feeding, and sleep for babies in their first year.",
    "Future releases of this application will include more categories of baby care.",
    "If you wish to end the program at any time, enter 'exit', 'end', or 'quit'",
];

/// Display manager for REPL UI
pub struct DisplayManager {
    spinner: Option<ProgressBar>,
    update_interval: Duration,
}

impl DisplayManager {
    /// Create new display manager
    pub fn new() -> Self {
        DisplayManager {
            spinner: None,
            update_interval: Duration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, entries: usize) {
        let width = 64;
        let rule = "=".repeat(width);

        println!("\n{}", rule.cyan());
        println!("{}", format!("  ParentBuddy {}", version).bold().cyan());
        println!("{}", format!("  Knowledge base: {} entries", entries).dimmed());
        println!("{}\n", rule.cyan());
        for line in INTRO_LINES {
            println!("{}", line);
        }
        println!("\nType your question (or {} for commands)\n", "/help".green());
    }

    /// Start a spinner while a question is being answered
    pub fn start_thinking(&mut self, message: &str) -> ProgressBar {
        self.finish_current();

        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.update_interval);

        self.spinner = Some(pb.clone());
        pb
    }

    /// Finish current spinner
    pub fn finish_current(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.spinner.is_some()
    }

    /// Display an answer or report
    pub fn show_answer(&mut self, answer: &str) {
        self.finish_current();
        println!("\n{}\n", answer);
    }

    /// Display the entries an answer was built from
    pub fn show_sources(&self, sources: &[RetrievedEntry]) {
        if sources.is_empty() {
            return;
        }
        println!("{}", "Sources:".dimmed());
        for source in sources {
            println!(
                "  {} {}",
                format!("[{:.3}]", source.score).dimmed(),
                source.entry.label().dimmed()
            );
        }
        println!();
    }

    /// Display a knowledge base listing
    pub fn show_listing(&self, listing: &str) {
        println!("{}", listing);
    }

    /// Display error message
    pub fn show_error(&mut self, error: &str) {
        self.finish_current();
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }

    pub fn show_goodbye(&self) {
        println!("{}", "Goodbye!".green());
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbered `label: text` lines, at most `limit` of them
pub fn format_entries(knowledge: &KnowledgeBase, limit: Option<usize>) -> String {
    let entries = knowledge.entries();
    let shown = limit.unwrap_or(entries.len()).min(entries.len());

    let mut lines: Vec<String> = entries
        .iter()
        .take(shown)
        .enumerate()
        .map(|(i, entry)| format!("{:>4}. {}", i + 1, entry.rendered()))
        .collect();
    if shown < entries.len() {
        lines.push(format!("      ... {} more", entries.len() - shown));
    }
    if lines.is_empty() {
        lines.push("No entries loaded.".to_string());
    }
    lines.join("\n")
}

/// One line per node dropped while flattening
pub fn format_skipped(knowledge: &KnowledgeBase) -> String {
    if knowledge.skipped().is_empty() {
        return "No nodes were skipped.".to_string();
    }
    knowledge
        .skipped()
        .iter()
        .map(|node| format!("{} (found {})", node.path, node.found))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::Entry;

    fn knowledge() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![
            Entry::new("sleeping - newborn", "Sleeps 14 to 17 hours a day"),
            Entry::new("feeding - 6 months", "Introduce solids"),
            Entry::new("feeding - 6 months", "Offer water in a cup"),
        ])
    }

    #[test]
    fn test_display_manager_creation() {
        let manager = DisplayManager::new();
        assert!(!manager.is_busy());
        assert_eq!(manager.update_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_spinner_lifecycle() {
        let mut manager = DisplayManager::new();
        let _pb = manager.start_thinking("Looking that up");
        assert!(manager.is_busy());

        manager.show_answer("Around 6 months.");
        assert!(!manager.is_busy());
    }

    #[test]
    fn test_error_clears_spinner() {
        let mut manager = DisplayManager::new();
        let _pb = manager.start_thinking("Looking that up");
        manager.show_error("model offline");
        assert!(!manager.is_busy());
    }

    #[test]
    fn test_intro_mentions_exit_words() {
        let last = INTRO_LINES[INTRO_LINES.len() - 1];
        for word in ["'exit'", "'end'", "'quit'"] {
            assert!(last.contains(word));
        }
    }

    #[test]
    fn test_format_entries_with_limit() {
        let listing = format_entries(&knowledge(), Some(2));
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   1. sleeping - newborn: Sleeps 14 to 17 hours a day");
        assert_eq!(lines[2], "      ... 1 more");
    }

    #[test]
    fn test_format_entries_all_and_empty() {
        assert_eq!(format_entries(&knowledge(), None).lines().count(), 3);
        assert_eq!(format_entries(&knowledge(), Some(50)).lines().count(), 3);
        assert_eq!(format_entries(&KnowledgeBase::default(), None), "No entries loaded.");
    }

    #[test]
    fn test_format_skipped() {
        assert_eq!(format_skipped(&knowledge()), "No nodes were skipped.");

        let loaded = KnowledgeBase::from_json_str(r#"{"sleeping": {"newborn": 42}}"#).unwrap();
        assert_eq!(format_skipped(&loaded), "sleeping - newborn (found number)");
    }
}
