use std::collections::{HashMap, HashSet};

pub(crate) struct SubmittedAnswer {
    pub(crate) question_id: String,
    pub(crate) selected_option_ids: Vec<String>,
}

pub(crate) struct AnswerVerdict {
    pub(crate) question_id: String,
    pub(crate) selected_option_ids: Vec<String>,
    pub(crate) is_correct: bool,
}

pub(crate) struct GradingOutcome {
    pub(crate) verdicts: Vec<AnswerVerdict>,
    pub(crate) correct_count: usize,
    pub(crate) total_questions: usize,
    pub(crate) score_percentage: i32,
    pub(crate) is_passed: bool,
    pub(crate) skipped_question_ids: Vec<String>,
}

/// Grades a submission against the quiz's correct-option sets.
///
/// An answer is correct iff its selected option ids equal the question's
/// correct set exactly. Answers referencing a question outside the quiz are
/// skipped rather than rejected; they never count toward the score. The
/// denominator is always the quiz's own question count, so questions the
/// student left unanswered count as wrong.
pub(crate) fn grade(
    correct_sets: &HashMap<String, HashSet<String>>,
    answers: Vec<SubmittedAnswer>,
    passing_percentage: i32,
) -> GradingOutcome {
    let total_questions = correct_sets.len();

    let mut verdicts = Vec::with_capacity(answers.len());
    let mut skipped_question_ids = Vec::new();
    let mut correct_count = 0usize;

    for answer in answers {
        let Some(correct) = correct_sets.get(&answer.question_id) else {
            skipped_question_ids.push(answer.question_id);
            continue;
        };

        let selected: HashSet<&str> =
            answer.selected_option_ids.iter().map(String::as_str).collect();
        let expected: HashSet<&str> = correct.iter().map(String::as_str).collect();
        let is_correct = selected == expected;

        if is_correct {
            correct_count += 1;
        }

        verdicts.push(AnswerVerdict {
            question_id: answer.question_id,
            selected_option_ids: answer.selected_option_ids,
            is_correct,
        });
    }

    let score_percentage = if total_questions == 0 {
        0
    } else {
        ((correct_count as f64 / total_questions as f64) * 100.0).round() as i32
    };

    GradingOutcome {
        verdicts,
        correct_count,
        total_questions,
        score_percentage,
        is_passed: score_percentage >= passing_percentage,
        skipped_question_ids,
    }
}
