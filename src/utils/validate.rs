use std::collections::HashSet;

use crate::models::evaluations::requests::SubmitEvaluationRequest;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;
pub const MIN_WEIGHT: i32 = 0;
pub const MAX_WEIGHT: i32 = 100;
/// 一次评估的类别权重之和
pub const WEIGHT_TOTAL: i64 = 100;

/// 评分提交校验结果
#[derive(Debug, Clone)]
pub struct SubmissionValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl SubmissionValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 校验评分提交（不访问数据库）
///
/// 规则：
/// - 评分与权重均不能为空
/// - 评分为 1..=5 的整数，子指标不可重复
/// - 权重为 0..=100 的整数，类别不可重复，总和必须恰好为 100
/// - 所有 ID 为正数
///
/// 所有违反的规则一并返回。
pub fn validate_submission(submission: &SubmitEvaluationRequest) -> SubmissionValidationResult {
    let mut errors = Vec::new();

    if submission.scores.is_empty() {
        errors.push("At least one score is required".to_string());
    }
    if submission.weights.is_empty() {
        errors.push("At least one category weight is required".to_string());
    }

    let mut seen_subcriteria = HashSet::new();
    for score in &submission.scores {
        if score.subcriteria_id <= 0 {
            errors.push(format!(
                "Subcriterion id must be positive (got {})",
                score.subcriteria_id
            ));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&score.score) {
            errors.push(format!(
                "Score for subcriterion {} must be between {MIN_SCORE} and {MAX_SCORE} (got {})",
                score.subcriteria_id, score.score
            ));
        }
        if !seen_subcriteria.insert(score.subcriteria_id) {
            errors.push(format!(
                "Subcriterion {} is scored more than once",
                score.subcriteria_id
            ));
        }
    }

    let mut seen_categories = HashSet::new();
    for weight in &submission.weights {
        if weight.category_id <= 0 {
            errors.push(format!(
                "Category id must be positive (got {})",
                weight.category_id
            ));
        }
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight.weight_num) {
            errors.push(format!(
                "Weight for category {} must be between {MIN_WEIGHT} and {MAX_WEIGHT} (got {})",
                weight.category_id, weight.weight_num
            ));
        }
        if !seen_categories.insert(weight.category_id) {
            errors.push(format!(
                "Category {} is weighted more than once",
                weight.category_id
            ));
        }
    }

    if !submission.weights.is_empty() {
        let total: i64 = submission
            .weights
            .iter()
            .map(|w| i64::from(w.weight_num))
            .sum();
        if total != WEIGHT_TOTAL {
            errors.push(format!(
                "Category weights must sum to exactly {WEIGHT_TOTAL} (got {total})"
            ));
        }
    }

    SubmissionValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::requests::{ScoreInput, WeightInput};
    use rand::Rng;

    fn score(subcriteria_id: i64, score: i32) -> ScoreInput {
        ScoreInput {
            subcriteria_id,
            score,
            comment: None,
        }
    }

    fn weights(values: &[i32]) -> Vec<WeightInput> {
        values
            .iter()
            .enumerate()
            .map(|(i, &weight_num)| WeightInput {
                category_id: i as i64 + 1,
                weight_num,
            })
            .collect()
    }

    fn submission(scores: Vec<ScoreInput>, weights: Vec<WeightInput>) -> SubmitEvaluationRequest {
        SubmitEvaluationRequest {
            scores,
            weights,
            general_comments: None,
        }
    }

    #[test]
    fn test_valid_submission() {
        let result = validate_submission(&submission(
            vec![score(1, 5), score(2, 3), score(3, 2)],
            weights(&[60, 40]),
        ));
        assert!(result.is_valid, "{}", result.error_message());
    }

    #[test]
    fn test_empty_lists() {
        let result = validate_submission(&submission(vec![], vec![]));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_score_range_is_inclusive() {
        for (value, ok) in [(0, false), (1, true), (5, true), (6, false), (-3, false)] {
            let result = validate_submission(&submission(vec![score(1, value)], weights(&[100])));
            assert_eq!(result.is_valid, ok, "score {value}");
        }
    }

    #[test]
    fn test_weight_range() {
        let result = validate_submission(&submission(vec![score(1, 3)], weights(&[110, -10])));
        assert!(!result.is_valid);
        assert!(result.error_message().contains("between 0 and 100"));

        let result = validate_submission(&submission(vec![score(1, 3)], weights(&[100, 0])));
        assert!(result.is_valid, "{}", result.error_message());
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut dup_weights = weights(&[50, 50]);
        dup_weights[1].category_id = 1;
        let result = validate_submission(&submission(vec![score(1, 3), score(1, 4)], dup_weights));
        assert!(!result.is_valid);
        let message = result.error_message();
        assert!(message.contains("Subcriterion 1 is scored more than once"));
        assert!(message.contains("Category 1 is weighted more than once"));
    }

    #[test]
    fn test_non_positive_ids() {
        let result = validate_submission(&submission(
            vec![score(0, 3)],
            vec![WeightInput {
                category_id: -1,
                weight_num: 100,
            }],
        ));
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_all_errors_reported_together() {
        let result = validate_submission(&submission(vec![score(1, 9)], weights(&[30, 30])));
        assert_eq!(result.errors.len(), 2);
        assert!(result.error_message().contains("; "));
        assert!(result.error_message().contains("got 60"));
    }

    #[test]
    fn test_weight_sum_property() {
        let mut rng = rand::rng();

        for _ in 0..2_000 {
            let count = rng.random_range(1..=6);
            let values: Vec<i32> = if rng.random_bool(0.5) {
                // 随机切分 100
                let mut cuts: Vec<i32> = (0..count - 1).map(|_| rng.random_range(0..=100)).collect();
                cuts.push(0);
                cuts.push(100);
                cuts.sort_unstable();
                cuts.windows(2).map(|w| w[1] - w[0]).collect()
            } else {
                (0..count).map(|_| rng.random_range(0..=100)).collect()
            };

            let sum: i32 = values.iter().sum();
            let result = validate_submission(&submission(vec![score(1, 4)], weights(&values)));
            assert_eq!(
                result.is_valid,
                sum == 100,
                "weights {values:?} (sum {sum}): {}",
                result.error_message()
            );
        }
    }
}
