//! Lexical quality heuristics.
//!
//! Each sub-score is one named predicate with a pass and a fail value. These are
//! surface-marker checks only and say nothing about whether the prompt is any good.

use crate::types::QualityScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreField {
    Clarity,
    Specificity,
    Executability,
    AmbiguityControl,
    Structure,
}

struct Rule {
    field: ScoreField,
    predicate: fn(&str) -> bool,
    pass: u8,
    fail: u8,
}

const OBJECTIVE_HEADER: &str = "# OBJETIVO";
const STEPS_HEADER: &str = "# PASSOS";
const SPECIFIC_LENGTH: usize = 500;
const STRUCTURED_MARKERS: usize = 5;

const RULES: [Rule; 5] = [
    Rule {
        field: ScoreField::Clarity,
        predicate: has_objective,
        pass: 9,
        fail: 6,
    },
    Rule {
        field: ScoreField::Specificity,
        predicate: is_long_enough,
        pass: 8,
        fail: 5,
    },
    Rule {
        field: ScoreField::Executability,
        predicate: has_execution_steps,
        pass: 9,
        fail: 5,
    },
    // TODO: a `?` lowers the score; flip once clients accept clarifying questions.
    Rule {
        field: ScoreField::AmbiguityControl,
        predicate: has_no_open_questions,
        pass: 8,
        fail: 6,
    },
    Rule {
        field: ScoreField::Structure,
        predicate: has_enough_markers,
        pass: 9,
        fail: 5,
    },
];

fn has_objective(text: &str) -> bool {
    text.contains(OBJECTIVE_HEADER)
}

fn is_long_enough(text: &str) -> bool {
    text.chars().count() > SPECIFIC_LENGTH
}

fn has_execution_steps(text: &str) -> bool {
    text.contains(STEPS_HEADER)
}

fn has_no_open_questions(text: &str) -> bool {
    !text.contains('?')
}

fn has_enough_markers(text: &str) -> bool {
    text.matches('#').count() >= STRUCTURED_MARKERS
}

impl QualityScore {
    fn set(&mut self, field: ScoreField, value: u8) {
        match field {
            ScoreField::Clarity => self.clarity = value,
            ScoreField::Specificity => self.specificity = value,
            ScoreField::Executability => self.executability = value,
            ScoreField::AmbiguityControl => self.ambiguity_control = value,
            ScoreField::Structure => self.structure = value,
        }
    }

    #[cfg(test)]
    fn get(&self, field: ScoreField) -> u8 {
        match field {
            ScoreField::Clarity => self.clarity,
            ScoreField::Specificity => self.specificity,
            ScoreField::Executability => self.executability,
            ScoreField::AmbiguityControl => self.ambiguity_control,
            ScoreField::Structure => self.structure,
        }
    }
}

/// Score any candidate prompt text. Total: empty or malformed text takes the fail value
/// of every rule except the question-mark check.
pub fn score(text: &str) -> QualityScore {
    let mut score = QualityScore::default();
    for rule in &RULES {
        let value = if (rule.predicate)(text) {
            rule.pass
        } else {
            rule.fail
        };
        score.set(rule.field, value);
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::generate_template;

    #[test]
    fn empty_text_takes_low_branches() {
        let score = score("");
        assert_eq!(score.clarity, 6);
        assert_eq!(score.specificity, 5);
        assert_eq!(score.executability, 5);
        assert_eq!(score.ambiguity_control, 8);
        assert_eq!(score.structure, 5);
        assert!((score.final_score() - 5.8).abs() < 1e-9);
    }

    #[test]
    fn question_mark_always_lowers_ambiguity_control() {
        assert_eq!(score("?").ambiguity_control, 6);
        assert_eq!(score("# OBJETIVO\nWhat should the agent do?").ambiguity_control, 6);

        let mut template = generate_template("x", "general");
        template.push('?');
        assert_eq!(score(&template).ambiguity_control, 6);
        assert_eq!(score("no questions here").ambiguity_control, 8);
    }

    #[test]
    fn clarity_requires_objective_header() {
        assert_eq!(score("# OBJETIVO\nship it").clarity, 9);
        assert_eq!(score("OBJETIVO without hash").clarity, 6);
        assert_eq!(score("# OBJECTIVE").clarity, 6);
    }

    #[test]
    fn executability_matches_steps_prefix() {
        assert_eq!(score("# PASSOS DE EXECUÇÃO").executability, 9);
        assert_eq!(score("# PASSOS").executability, 9);
        assert_eq!(score("# STEPS").executability, 5);
    }

    #[test]
    fn specificity_threshold_is_strictly_greater_than_500_chars() {
        assert_eq!(score(&"a".repeat(500)).specificity, 5);
        assert_eq!(score(&"a".repeat(501)).specificity, 8);
        // Multi-byte characters count once.
        assert_eq!(score(&"ç".repeat(300)).specificity, 5);
    }

    #[test]
    fn structure_counts_hash_characters_anywhere() {
        assert_eq!(score("####").structure, 5);
        assert_eq!(score("#####").structure, 9);
        assert_eq!(score("# a # b # c # d # e").structure, 9);
    }

    #[test]
    fn template_output_scores_high() {
        let template = generate_template("design a database schema for a library", "coding");
        let score = score(&template);

        assert_eq!(score.clarity, 9);
        assert_eq!(score.specificity, 8);
        assert_eq!(score.executability, 9);
        assert_eq!(score.ambiguity_control, 8);
        assert_eq!(score.structure, 9);
        assert!((score.final_score() - 8.6).abs() < 1e-9);
    }

    #[test]
    fn get_reads_back_each_field() {
        let score = score("");
        assert_eq!(score.get(ScoreField::Clarity), 6);
        assert_eq!(score.get(ScoreField::AmbiguityControl), 8);
        assert_eq!(score.get(ScoreField::Structure), 5);
    }
}
