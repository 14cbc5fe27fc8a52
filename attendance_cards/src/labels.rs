//! Recognition of the reserved rows of the label column.
//!
//! Labels are free text typed by people, so they are normalized first and
//! then run through an ordered table of rules. The first rule that matches
//! decides what the row means.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::LabelVocabulary;

/// Lowercases, strips accents and collapses whitespace.
///
/// "  Línea   TM " becomes "linea tm".
pub fn normalize_label(label: &str) -> String {
    let folded: String = label
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    folded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// What a recognized row contributes to the day record.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RowAction {
    LineTm,
    LineTt,
    /// The value lists the absent identifiers directly.
    ExplicitRoster,
    /// The value is a count, the identifiers follow in unlabelled rows.
    AggregateAbsences,
}

/// A predicate over a normalized label.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LabelMatch {
    Contains(String),
    Equals(String),
    /// At least one keyword of each group appears in the label.
    ContainsOneOfEach(Vec<String>, Vec<String>),
}

impl LabelMatch {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            LabelMatch::Contains(kw) => label.contains(kw.as_str()),
            LabelMatch::Equals(kw) => label == kw,
            LabelMatch::ContainsOneOfEach(left, right) => {
                left.iter().any(|kw| label.contains(kw.as_str()))
                    && right.iter().any(|kw| label.contains(kw.as_str()))
            }
        }
    }

    /// Whether a matching row is kept out of the visible metrics.
    ///
    /// A KPI keyword only hides the row spelled exactly like it, so
    /// "Linea TM (objetivo)" still feeds the KPI and stays visible.
    pub fn hides(&self, label: &str) -> bool {
        match self {
            LabelMatch::Contains(kw) => label == kw,
            LabelMatch::Equals(_) | LabelMatch::ContainsOneOfEach(_, _) => self.matches(label),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LabelRule {
    pub matcher: LabelMatch,
    pub action: RowAction,
}

/// The rule table, in evaluation order: KPIs, explicit roster, aggregate.
pub fn label_rules(vocabulary: &LabelVocabulary) -> Vec<LabelRule> {
    let mut rules: Vec<LabelRule> = Vec::new();
    for kw in vocabulary.line_tm.iter() {
        rules.push(LabelRule {
            matcher: LabelMatch::Contains(normalize_label(kw)),
            action: RowAction::LineTm,
        });
    }
    for kw in vocabulary.line_tt.iter() {
        rules.push(LabelRule {
            matcher: LabelMatch::Contains(normalize_label(kw)),
            action: RowAction::LineTt,
        });
    }
    rules.push(LabelRule {
        matcher: LabelMatch::ContainsOneOfEach(
            vocabulary
                .roster_keywords
                .iter()
                .map(|kw| normalize_label(kw))
                .collect(),
            vocabulary
                .absence_keywords
                .iter()
                .map(|kw| normalize_label(kw))
                .collect(),
        ),
        action: RowAction::ExplicitRoster,
    });
    for kw in vocabulary.aggregate_absences.iter() {
        rules.push(LabelRule {
            matcher: LabelMatch::Equals(normalize_label(kw)),
            action: RowAction::AggregateAbsences,
        });
    }
    rules
}

/// The first rule matching the normalized label.
pub fn classify<'a>(rules: &'a [LabelRule], label: &str) -> Option<&'a LabelRule> {
    rules.iter().find(|r| r.matcher.matches(label))
}

pub fn is_suppressed(rules: &[LabelRule], label: &str) -> bool {
    rules.iter().any(|r| r.matcher.hides(label))
}
