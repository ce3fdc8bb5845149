use crate::models::{Quiz, QuizResult};

/// Score `answers` against the quiz's correct options.
///
/// Position `i` counts when `answers[i]` equals the correct option of question `i`.
/// Missing, surplus and unknown answers never count.
pub fn score(quiz: &Quiz, answers: &[Option<String>]) -> QuizResult {
    let correct = quiz
        .questions
        .iter()
        .zip(answers.iter())
        .filter(|(question, answer)| {
            answer
                .as_deref()
                .is_some_and(|answer| question.is_correct(answer))
        })
        .count();

    QuizResult::new(correct as u32, quiz.total_questions() as u32)
}

/// Per-position correctness, for the result breakdown.
pub fn breakdown(quiz: &Quiz, answers: &[Option<String>]) -> Vec<bool> {
    quiz.questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            answers
                .get(index)
                .and_then(|answer| answer.as_deref())
                .is_some_and(|answer| question.is_correct(answer))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuizId};

    fn quiz(correct: &[&str]) -> Quiz {
        Quiz {
            id: QuizId::new("1"),
            title: "Scoring".to_string(),
            questions: correct
                .iter()
                .enumerate()
                .map(|(index, correct)| Question {
                    id: index.to_string(),
                    text: format!("Question {}", index + 1),
                    options: vec!["A".into(), "B".into(), "C".into(), "X".into()],
                    correct_option: correct.to_string(),
                })
                .collect(),
        }
    }

    fn answers(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_scores_matching_positions() {
        let quiz = quiz(&["A", "B", "C"]);
        let result = score(&quiz, &answers(&[Some("A"), Some("B"), Some("X")]));

        assert_eq!(result, QuizResult::new(2, 3));
        assert_eq!(result.points_earned, 200);
    }

    #[test]
    fn test_all_correct() {
        let quiz = quiz(&["A", "B", "C"]);
        let result = score(&quiz, &answers(&[Some("A"), Some("B"), Some("C")]));
        assert_eq!(result.score, 3);
    }

    #[test]
    fn test_unanswered_scores_zero() {
        let quiz = quiz(&["A", "B"]);
        assert_eq!(score(&quiz, &answers(&[None, None])).score, 0);
        assert_eq!(score(&quiz, &[]).score, 0);
    }

    #[test]
    fn test_surplus_answers_are_ignored() {
        let quiz = quiz(&["A"]);
        let result = score(&quiz, &answers(&[Some("A"), Some("A"), Some("A")]));
        assert_eq!(result, QuizResult::new(1, 1));
    }

    #[test]
    fn test_empty_quiz() {
        let quiz = quiz(&[]);
        let result = score(&quiz, &[]);
        assert_eq!(result, QuizResult::new(0, 0));
    }

    #[test]
    fn test_score_bounds_hold_for_mixed_answers() {
        let quiz = quiz(&["A", "B", "C", "A"]);
        let options = [None, Some("A"), Some("B"), Some("C"), Some("X")];

        for first in options {
            for second in options {
                let given = answers(&[first, second, first, second]);
                let result = score(&quiz, &given);
                assert!(result.score <= 4);
                assert_eq!(result.points_earned, result.score * 100);
                assert_eq!(result, score(&quiz, &given));
            }
        }
    }

    #[test]
    fn test_breakdown_marks_positions() {
        let quiz = quiz(&["A", "B", "C"]);
        let marks = breakdown(&quiz, &answers(&[Some("A"), None]));
        assert_eq!(marks, vec![true, false, false]);
    }
}
