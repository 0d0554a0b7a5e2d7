//! Milestone report grouping and formatting

use std::fmt;

use crate::milestones::age::Age;

/// Milestones for one age, grouped by developmental area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneReport {
    pub age: Age,
    /// `(sub_category, items)` in first-seen order
    pub groups: Vec<(String, Vec<String>)>,
    /// Entries ignored because their label did not have three segments
    pub skipped_labels: usize,
}

impl MilestoneReport {
    pub fn new(age: Age) -> Self {
        Self {
            age,
            groups: Vec::new(),
            skipped_labels: 0,
        }
    }

    /// Append `item` under `sub_category`, creating the group on first use
    pub fn push(&mut self, sub_category: &str, item: &str) {
        match self.groups.iter_mut().find(|(name, _)| name == sub_category) {
            Some((_, items)) => items.push(item.to_string()),
            None => self
                .groups
                .push((sub_category.to_string(), vec![item.to_string()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|(_, items)| items.len()).sum()
    }
}

impl fmt::Display for MilestoneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![format!("Developmental milestones for {}:\n", self.age)];
        for (category, items) in &self.groups {
            lines.push(format!("{}:", readable_category(category)));
            lines.extend(items.iter().map(|item| format!("- {}", item)));
            lines.push(String::new());
        }
        f.write_str(&lines.join("\n"))
    }
}

/// `movement_physical` → `Movement/Physical`
///
/// Underscores become slashes, then every letter that follows a non-letter
/// is upper-cased and every other letter lower-cased.
pub fn readable_category(category: &str) -> String {
    let mut readable = String::with_capacity(category.len());
    let mut previous_is_letter = false;
    for ch in category.chars().map(|c| if c == '_' { '/' } else { c }) {
        if ch.is_alphabetic() {
            if previous_is_letter {
                readable.extend(ch.to_lowercase());
            } else {
                readable.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            readable.push(ch);
            previous_is_letter = false;
        }
    }
    readable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_category() {
        assert_eq!(readable_category("movement_physical"), "Movement/Physical");
        assert_eq!(readable_category("social_emotional"), "Social/Emotional");
        assert_eq!(readable_category("language_communication"), "Language/Communication");
        assert_eq!(readable_category("cognitive"), "Cognitive");
        assert_eq!(readable_category("fine motor"), "Fine Motor");
        assert_eq!(readable_category("GROSS_motor"), "Gross/Motor");
    }

    #[test]
    fn test_push_groups_by_first_seen_order() {
        let mut report = MilestoneReport::new(Age::months(6));
        report.push("social_emotional", "Knows familiar people");
        report.push("movement_physical", "Rolls from tummy to back");
        report.push("social_emotional", "Likes to look at self in a mirror");

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].0, "social_emotional");
        assert_eq!(report.groups[0].1.len(), 2);
        assert_eq!(report.item_count(), 3);
    }

    #[test]
    fn test_display_exact_layout() {
        let mut report = MilestoneReport::new(Age::months(6));
        report.push("social_emotional", "Smiles at people");
        report.push("movement_physical", "Sits without support");
        report.push("movement_physical", "Rolls from tummy to back");

        assert_eq!(
            report.to_string(),
            "Developmental milestones for 6 months:\n\
             \n\
             Social/Emotional:\n\
             - Smiles at people\n\
             \n\
             Movement/Physical:\n\
             - Sits without support\n\
             - Rolls from tummy to back\n"
        );
    }
}
