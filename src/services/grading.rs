//! Automatic grading for submitted answers.
//!
//! Objective questions (multiple choice, true/false) are scored here;
//! short-answer and essay questions are left at zero marks for a human
//! grader. Scoring is all-or-nothing per question.

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Answer, Question, QuestionType},
};

/// Structural checks applied before a quiz or assignment is saved. A
/// question that cannot be answered (or auto-graded as declared) is
/// rejected here rather than discovered at submission time.
pub fn validate_questions(questions: &[Question]) -> AppResult<()> {
    for question in questions {
        if question.marks <= 0 {
            return Err(AppError::ValidationError(format!(
                "Question '{}' must carry positive marks",
                question.question_text
            )));
        }

        match question.question_type {
            QuestionType::MultipleChoice => {
                if question.options.len() < 2 {
                    return Err(AppError::ValidationError(format!(
                        "Multiple choice question '{}' needs at least two options",
                        question.question_text
                    )));
                }
                if !question.options.iter().any(|o| o.is_correct) {
                    return Err(AppError::ValidationError(format!(
                        "Multiple choice question '{}' has no correct option",
                        question.question_text
                    )));
                }
            }
            QuestionType::TrueFalse => {
                if question.correct_answer.is_none() {
                    return Err(AppError::ValidationError(format!(
                        "True/false question '{}' has no correct answer",
                        question.question_text
                    )));
                }
            }
            QuestionType::ShortAnswer | QuestionType::Essay => {}
        }
    }

    Ok(())
}

/// Grades `answers` against `questions`, returning the graded answers and
/// the total marks obtained.
///
/// Answers referencing an unknown question id pass through untouched; their
/// pre-set marks still count towards the total.
pub fn grade_answers(questions: &[Question], answers: Vec<Answer>) -> (Vec<Answer>, i32) {
    let graded: Vec<Answer> = answers
        .into_iter()
        .map(|answer| match find_question(questions, &answer.question_id) {
            Some(question) => grade_one(question, answer),
            None => answer,
        })
        .collect();

    let total = graded.iter().map(|a| a.marks_obtained).sum();
    (graded, total)
}

/// Percentage of `total_marks` earned, rounded to two decimal places.
/// Zero total marks yields zero rather than dividing.
pub fn percentage(marks_obtained: i32, total_marks: i32) -> f64 {
    if total_marks <= 0 {
        return 0.0;
    }
    let raw = f64::from(marks_obtained) / f64::from(total_marks) * 100.0;
    (raw * 100.0).round() / 100.0
}

fn find_question<'a>(questions: &'a [Question], question_id: &str) -> Option<&'a Question> {
    questions.iter().find(|q| q.id == question_id)
}

fn grade_one(question: &Question, mut answer: Answer) -> Answer {
    match question.question_type {
        QuestionType::MultipleChoice => {
            let correct = answer
                .selected_option
                .as_deref()
                .and_then(|selected| question.options.iter().find(|o| o.id == selected))
                .map(|option| option.is_correct)
                .unwrap_or(false);

            answer.is_correct = Some(correct);
            answer.marks_obtained = if correct { question.marks } else { 0 };
        }
        QuestionType::TrueFalse => {
            let correct = question
                .correct_answer
                .as_deref()
                .map(|expected| expected.eq_ignore_ascii_case(answer.answer.trim()))
                .unwrap_or(false);

            answer.is_correct = Some(correct);
            answer.marks_obtained = if correct { question.marks } else { 0 };
        }
        QuestionType::ShortAnswer | QuestionType::Essay => {
            answer.is_correct = None;
            answer.marks_obtained = 0;
        }
    }

    answer
}
