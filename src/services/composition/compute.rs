//! 课程成绩合成
//!
//! 测验部分占 40 分，手动评分部分占 60 分，总分为两者之和。

use crate::models::courses::entities::{FINAL_MAX, MANUAL_WEIGHT, QUIZ_WEIGHT, ScoreBreakdown};

/// 由已作答测验的百分制分数与手动评分合成课程成绩
///
/// 未作答的测验不在输入中，因此不计入平均；没有任何作答时测验部分为 0。
pub fn compose(quiz_percentages: &[f64], manual: f64) -> ScoreBreakdown {
    let quiz_score = if quiz_percentages.is_empty() {
        0.0
    } else {
        let sum: f64 = quiz_percentages
            .iter()
            .map(|p| clamp_finite(*p, 100.0))
            .sum();
        let average = sum / quiz_percentages.len() as f64;
        // 先乘后除，60% 恰好得到 24
        average * QUIZ_WEIGHT / 100.0
    };

    let manual_score = clamp_manual(manual);
    let final_score = clamp_finite(quiz_score + manual_score, FINAL_MAX);

    ScoreBreakdown {
        quiz_score,
        manual_score,
        final_score,
    }
}

/// 手动评分截断到 [0, 60]
pub fn clamp_manual(manual: f64) -> f64 {
    clamp_finite(manual, MANUAL_WEIGHT)
}

fn clamp_finite(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}
