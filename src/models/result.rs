use serde::{Deserialize, Serialize};

/// Fixed weight of one correctly answered question.
pub const POINTS_PER_QUESTION: u32 = 100;

/// Scored outcome of a session, in the shape the backend returns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub points_earned: u32,
}

impl QuizResult {
    pub fn new(score: u32, total_questions: u32) -> Self {
        Self {
            score,
            total_questions,
            points_earned: score.saturating_mul(POINTS_PER_QUESTION),
        }
    }

    /// Percentage of correct answers, 0 for an empty quiz.
    pub fn percentage(&self) -> f64 {
        if self.total_questions > 0 {
            (self.score as f64 / self.total_questions as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Whether the numbers are internally consistent.
    pub fn is_consistent(&self) -> bool {
        self.score <= self.total_questions
            && self.score.checked_mul(POINTS_PER_QUESTION) == Some(self.points_earned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_follow_score() {
        let result = QuizResult::new(2, 3);
        assert_eq!(result.points_earned, 200);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_empty_quiz_percentage() {
        assert_eq!(QuizResult::new(0, 0).percentage(), 0.0);
    }

    #[test]
    fn test_response_field_names() {
        let result: QuizResult =
            serde_json::from_str(r#"{"score":1,"totalQuestions":4,"pointsEarned":100}"#).unwrap();
        assert_eq!(result, QuizResult::new(1, 4));

        let inconsistent = QuizResult {
            score: 5,
            total_questions: 4,
            points_earned: 500,
        };
        assert!(!inconsistent.is_consistent());
    }

    #[test]
    fn test_huge_score_is_inconsistent() {
        let result = QuizResult {
            score: 50_000_000,
            total_questions: 50_000_000,
            points_earned: 0,
        };
        assert!(!result.is_consistent());

        let result = QuizResult {
            score: u32::MAX,
            total_questions: u32::MAX,
            points_earned: u32::MAX,
        };
        assert!(!result.is_consistent());
    }
}
