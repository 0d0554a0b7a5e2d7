//! Structured milestone queries
//!
//! Extracts an age from the question, selects `milestones - <age> - <area>`
//! entries and renders them grouped by developmental area. Every outcome is
//! a user-facing string; nothing here fails.

pub mod age;
pub mod report;

use std::fmt;

use tracing::debug;

use crate::knowledge::types::{Entry, LABEL_SEPARATOR};

pub use age::Age;
pub use report::{readable_category, MilestoneReport};

/// Top-level category that holds milestone data
pub const MILESTONES_CATEGORY: &str = "milestones";

/// Result of evaluating a milestone question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MilestoneOutcome {
    /// No age in months could be read from the question
    AgeNotFound,
    /// The age was understood but no entries exist for it
    NoData { age: Age, skipped_labels: usize },
    /// Grouped milestones
    Report(MilestoneReport),
}

impl fmt::Display for MilestoneOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MilestoneOutcome::AgeNotFound => write!(
                f,
                "Sorry, I couldn't determine an age from your question. \
                 Note that the age should be specified in months."
            ),
            MilestoneOutcome::NoData { age, .. } => write!(
                f,
                "No milestone data found for {}. \
                 Note that the milestone data is from the American Academy of Pediatrics (AAP), \
                 which specifies milestones at 2, 4, 6, 9, and 12 months.",
                age
            ),
            MilestoneOutcome::Report(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Rule-based milestone lookup over flattened entries
#[derive(Debug, Clone, Copy, Default)]
pub struct MilestoneQueryEngine;

impl MilestoneQueryEngine {
    pub fn new() -> Self {
        MilestoneQueryEngine
    }

    /// Answer a milestone question with a formatted report or a failure message
    pub fn query(&self, entries: &[Entry], question: &str) -> String {
        self.evaluate(entries, question).to_string()
    }

    /// Same as [`MilestoneQueryEngine::query`] but keeps the structured outcome
    pub fn evaluate(&self, entries: &[Entry], question: &str) -> MilestoneOutcome {
        let Some(age) = Age::extract(question) else {
            return MilestoneOutcome::AgeNotFound;
        };
        let age_label = age.to_string();

        let mut report = MilestoneReport::new(age);
        for entry in entries {
            let segments: Vec<&str> = entry.label().split(LABEL_SEPARATOR).collect();
            let [main_category, entry_age, sub_category] = segments[..] else {
                report.skipped_labels += 1;
                continue;
            };
            if main_category == MILESTONES_CATEGORY && entry_age == age_label {
                report.push(sub_category, entry.text());
            }
        }

        debug!(
            age = %age,
            items = report.item_count(),
            skipped_labels = report.skipped_labels,
            "milestone query evaluated"
        );

        if report.is_empty() {
            MilestoneOutcome::NoData {
                age,
                skipped_labels: report.skipped_labels,
            }
        } else {
            MilestoneOutcome::Report(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb(pairs: &[(&str, &str)]) -> Vec<Entry> {
        pairs.iter().map(|(l, t)| Entry::new(*l, *t)).collect()
    }

    #[test]
    fn test_age_not_found() {
        let engine = MilestoneQueryEngine::new();
        let result = engine.query(&[], "What milestones should my baby reach?");

        assert!(result.contains("Sorry, I couldn't determine an age from your question"));
        assert!(result.contains("Note that the age should be specified in months"));
    }

    #[test]
    fn test_no_milestones_for_valid_age() {
        let entries = kb(&[
            ("milestones - 4 months - social_emotional", "Smiles on his own to get your attention"),
            ("milestones - 6 months - movement_physical", "Rolls from tummy to back"),
        ]);

        let result = MilestoneQueryEngine::new().query(&entries, "What are milestones for a 5 month old?");

        assert!(result.contains("No milestone data found for 5 months"));
        assert!(result.contains("Note that the milestone data is from the American Academy of Pediatrics (AAP),"));
        assert!(result.contains("which specifies milestones at 2, 4, 6, 9, and 12 months"));
    }

    #[test]
    fn test_milestone_extraction_success() {
        let entries = kb(&[
            ("milestones - 6 months - social_emotional", "Smiles at people"),
            ("milestones - 6 months - movement_physical", "Sits without support"),
            ("milestones - 4 months - movement_physical", "Holds head steady"),
            ("feeding - 6 months - solids", "Introduce purees"),
        ]);

        let result = MilestoneQueryEngine::new().query(&entries, "milestones for a 6 month old");

        assert!(result.contains("Developmental milestones for 6 months:"));
        assert!(result.contains("Social/Emotional:"));
        assert!(result.contains("Movement/Physical:"));
        assert!(result.contains("- Smiles at people"));
        assert!(result.contains("- Sits without support"));
        assert!(!result.contains("Introduce purees"));
        assert!(!result.contains("Holds head steady"));
    }

    #[test]
    fn test_age_after_non_ascii_digit_is_found() {
        let entries = kb(&[("milestones - 6 months - cognitive", "Looks around at things nearby")]);

        let result = MilestoneQueryEngine::new().query(&entries, "\u{0666} months? I mean 6 months");

        assert!(result.starts_with("Developmental milestones for 6 months:"));
        assert!(result.contains("- Looks around at things nearby"));
    }

    #[test]
    fn test_skips_malformed_labels() {
        let entries = kb(&[
            ("milestones - 6 months", "Invalid label format"),
            ("milestones - 6 months - movement_physical", "Rolls from tummy to back"),
        ]);

        let outcome = MilestoneQueryEngine::new().evaluate(&entries, "What are the milestones for a 6 month old?");
        let MilestoneOutcome::Report(report) = &outcome else {
            panic!("expected a report, got {:?}", outcome);
        };
        assert_eq!(report.skipped_labels, 1);

        let result = outcome.to_string();
        assert!(result.contains("Rolls from tummy to back"));
        assert!(!result.contains("Invalid label format"));
    }

    #[test]
    fn test_four_segment_labels_are_skipped() {
        let entries = kb(&[("milestones - 6 months - movement_physical - extra", "Too deep")]);
        let outcome = MilestoneQueryEngine::new().evaluate(&entries, "6 months");
        assert_eq!(
            outcome,
            MilestoneOutcome::NoData {
                age: Age::months(6),
                skipped_labels: 1
            }
        );
    }

    #[test]
    fn test_multiple_items_grouped_under_same_category() {
        let entries = kb(&[
            ("milestones - 6 months - movement_physical", "Rolls from tummy to back"),
            ("milestones - 6 months - movement_physical", "Pushes up with straight arms when on tummy"),
        ]);

        let result = MilestoneQueryEngine::new().query(&entries, "What are the milestones for a 6 month old?");

        assert!(result.contains("- Rolls from tummy to back"));
        assert!(result.contains("- Pushes up with straight arms when on tummy"));
        assert_eq!(result.matches("Movement/Physical:").count(), 1);
    }

    #[test]
    fn test_exact_success_output() {
        let entries = kb(&[
            ("milestones - 2 months - language_communication", "Makes sounds other than crying"),
            ("sleeping - newborn", "Sleeps 14 to 17 hours a day"),
            ("milestones - 2 months - cognitive", "Watches you as you move"),
            ("milestones - 2 months - language_communication", "Reacts to loud sounds"),
        ]);

        let result = MilestoneQueryEngine::new().query(&entries, "2 MONTHS milestones");
        assert_eq!(
            result,
            "Developmental milestones for 2 months:\n\n\
             Language/Communication:\n\
             - Makes sounds other than crying\n\
             - Reacts to loud sounds\n\n\
             Cognitive:\n\
             - Watches you as you move\n"
        );
    }

    #[test]
    fn test_query_is_idempotent() {
        let entries = kb(&[
            ("milestones - 9 months - cognitive", "Looks for objects when dropped out of sight"),
            ("milestones - 9 months - social_emotional", "Is shy, clingy, or fearful around strangers"),
        ]);
        let engine = MilestoneQueryEngine::new();
        let question = "9 month milestones";
        assert_eq!(engine.query(&entries, question), engine.query(&entries, question));
    }
}
