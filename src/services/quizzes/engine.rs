//! 测验自动评分
//!
//! 纯函数：给定题库与学生答案，计算每题得分与整份作答的百分制分数。

use std::collections::{BTreeSet, HashMap};

use crate::models::quizzes::entities::{
    AnswerValue, GradedAnswer, GradedAttempt, QuestionType, QuizQuestion,
};

/// 按题库评分；题库外的答案被忽略，未作答的题目按错误处理
pub fn grade_attempt(
    questions: &[QuizQuestion],
    answers: &HashMap<i64, AnswerValue>,
) -> GradedAttempt {
    let mut graded = Vec::with_capacity(questions.len());
    let mut awarded_total = 0.0;
    let mut points_total = 0.0;
    let mut needs_review = false;

    for question in questions {
        let answer = answers.get(&question.id).cloned().unwrap_or_default();

        if !question.question_type.is_auto_gradable() {
            // 主观题不计入分子分母，等待人工复核
            needs_review = true;
            graded.push(GradedAnswer {
                question_id: question.id,
                answer,
                is_correct: false,
                points_awarded: 0.0,
                needs_review: true,
            });
            continue;
        }

        let is_correct = !answer.is_blank() && is_match(question, &answer);
        let points_awarded = if is_correct { question.points } else { 0.0 };

        awarded_total += points_awarded;
        points_total += question.points;

        graded.push(GradedAnswer {
            question_id: question.id,
            answer,
            is_correct,
            points_awarded,
            needs_review: false,
        });
    }

    let (score, ungraded_basis) = if points_total > 0.0 {
        (100.0 * awarded_total / points_total, false)
    } else {
        (0.0, true)
    };

    GradedAttempt {
        answers: graded,
        score,
        ungraded_basis,
        needs_review,
    }
}

fn is_match(question: &QuizQuestion, given: &AnswerValue) -> bool {
    let expected = &question.correct_answer;

    match question.question_type {
        QuestionType::MultipleChoice => text_pair(expected, given).is_some_and(|(e, g)| e == g),
        QuestionType::TrueFalse | QuestionType::ShortAnswer => {
            text_pair(expected, given).is_some_and(|(e, g)| e.to_lowercase() == g.to_lowercase())
        }
        QuestionType::MultiSelect => choice_set(expected) == choice_set(given),
        QuestionType::Numeric => text_pair(expected, given).is_some_and(|(e, g)| {
            match (e.parse::<f64>(), g.parse::<f64>()) {
                (Ok(a), Ok(b)) => a == b,
                _ => e == g,
            }
        }),
        QuestionType::FreeText => false,
    }
}

fn text_pair<'a>(expected: &'a AnswerValue, given: &'a AnswerValue) -> Option<(&'a str, &'a str)> {
    Some((expected.as_text()?.trim(), given.as_text()?.trim()))
}

fn choice_set(value: &AnswerValue) -> BTreeSet<&str> {
    value
        .items()
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}
