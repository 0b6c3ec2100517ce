//! Quiz grading: maps a multiple-choice score to a review outcome.

use serde::{Deserialize, Serialize};

/// Minimum share of correct answers that counts as a successful review.
pub const QUIZ_PASS_PERCENT: u64 = 70;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// Counts how many picked options match the correct answer indices.
/// Missing answers count as wrong.
pub fn score_quiz(questions: &[QuizQuestion], answers: &[usize]) -> usize {
    questions
        .iter()
        .zip(answers.iter())
        .filter(|(q, a)| q.correct_answer_index == **a)
        .count()
}

/// True when `score` out of `total` clears the 70% pass threshold.
/// Integer arithmetic, so the boundary is exact: 7/10 passes, 3/5 does not.
pub fn quiz_passed(score: u64, total: u64) -> bool {
    total > 0 && score * 100 >= total * QUIZ_PASS_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_of_five_fails() {
        // 60% is below the 70% cutoff
        assert!(!quiz_passed(3, 5));
    }

    #[test]
    fn test_four_of_five_passes() {
        // 80% clears the cutoff
        assert!(quiz_passed(4, 5));
    }

    #[test]
    fn test_exact_threshold_passes() {
        assert!(quiz_passed(7, 10));
        assert!(!quiz_passed(6, 10));
    }

    #[test]
    fn test_empty_quiz_never_passes() {
        assert!(!quiz_passed(0, 0));
    }

    #[test]
    fn test_score_quiz_counts_matches() {
        let questions = vec![
            QuizQuestion {
                question: "What does `mut` mean?".to_string(),
                options: vec!["mutable".to_string(), "mutex".to_string()],
                correct_answer_index: 0,
            },
            QuizQuestion {
                question: "What is a slice?".to_string(),
                options: vec!["a view".to_string(), "a copy".to_string()],
                correct_answer_index: 0,
            },
            QuizQuestion {
                question: "Does Rust have GC?".to_string(),
                options: vec!["yes".to_string(), "no".to_string()],
                correct_answer_index: 1,
            },
        ];

        assert_eq!(score_quiz(&questions, &[0, 1, 1]), 2);
        // Unanswered trailing questions count as wrong
        assert_eq!(score_quiz(&questions, &[0]), 1);
    }
}
