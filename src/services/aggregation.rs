//! 评估聚合计算
//!
//! 纯函数：由评分与类别权重得到加权合规百分比与 0~5 的等级。
//! 所有读取路径（评估员汇总、管理员详情、报告导出）都只调用 [`aggregate`]。

use std::collections::BTreeMap;

use crate::models::evaluations::entities::{CategoryWeight, ScoreLine};
use crate::models::evaluations::responses::{CategorySummary, EvaluationSummary};
use crate::utils::validate::MAX_SCORE;

/// 按等级索引的标签
pub const RATING_LABELS: [&str; 6] = [
    "No cumple",
    "Muy bajo",
    "Bajo",
    "Regular",
    "Bueno",
    "Excelente",
];

/// 等级阈值（含上界）：≤16→0, ≤32→1, ≤48→2, ≤64→3, ≤80→4，其余为 5
const RATING_THRESHOLDS: [f64; 5] = [16.0, 32.0, 48.0, 64.0, 80.0];

/// 精确分数，分子分母始终为最简形式且分母为正
///
/// 评分、满分、权重都是整数，百分比在分数上精确累加，
/// 只在最后一步舍入到两位小数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fraction {
    num: i128,
    den: i128,
}

impl Fraction {
    const ZERO: Self = Self { num: 0, den: 1 };

    fn new(num: i128, den: i128) -> Self {
        if den == 0 {
            return Self::ZERO;
        }
        let sign = if den < 0 { -1 } else { 1 };
        let g = gcd(num, den);
        Self {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    fn plus(self, other: Self) -> Self {
        let g = gcd(self.den, other.den);
        let den = self.den / g * other.den;
        Self::new(
            self.num * (other.den / g) + other.num * (self.den / g),
            den,
        )
    }

    /// 四舍五入（远离零）到两位小数
    fn round2(self) -> f64 {
        let scaled = self.num * 100;
        let hundredths = (2 * scaled.abs() + self.den) / (2 * self.den);
        let hundredths = if scaled < 0 { -hundredths } else { hundredths };
        hundredths as f64 / 100.0
    }
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// 百分比（已保留两位小数）映射为等级
pub fn rating_for(percentage: f64) -> u8 {
    RATING_THRESHOLDS
        .iter()
        .position(|&limit| percentage <= limit)
        .unwrap_or(RATING_THRESHOLDS.len()) as u8
}

/// 聚合一次评估的评分
///
/// - 评分按类别分组，每个权重对应一个类别
/// - 没有评分的类别贡献 0%，其权重仍计入 100% 的分母
/// - 类别按 ID 升序累加，结果与输入顺序无关
pub fn aggregate(scores: &[ScoreLine], weights: &[CategoryWeight]) -> EvaluationSummary {
    let mut by_category: BTreeMap<i64, Vec<i32>> = BTreeMap::new();
    for line in scores {
        by_category
            .entry(line.criteria_id)
            .or_default()
            .push(line.score);
    }

    let mut ordered: Vec<&CategoryWeight> = weights.iter().collect();
    ordered.sort_by_key(|w| w.category_id);

    let mut global = Fraction::ZERO;
    let mut total_score = 0_i64;
    let mut total_max = 0_i64;
    let mut categories = Vec::with_capacity(ordered.len());

    for weight in ordered {
        let items = by_category
            .get(&weight.category_id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let sum: i64 = items.iter().map(|&s| i64::from(s)).sum();
        let max = items.len() as i64 * i64::from(MAX_SCORE);
        // 类别百分比 = sum * 100 / max；max 为 0 时为 0
        let pct = Fraction::new(i128::from(sum) * 100, i128::from(max));

        global = global.plus(Fraction::new(
            pct.num * i128::from(weight.weight_num),
            pct.den * 100,
        ));
        total_score += sum;
        total_max += max;

        categories.push(CategorySummary {
            category_id: weight.category_id,
            weight_num: weight.weight_num,
            score: sum,
            max,
            percentage: pct.round2(),
        });
    }

    let percentage = global.round2();
    let rating = rating_for(percentage);

    EvaluationSummary {
        total_score,
        total_max,
        percentage,
        rating,
        label: RATING_LABELS[rating as usize].to_string(),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    fn line(criteria_id: i64, subcriteria_id: i64, score: i32) -> ScoreLine {
        ScoreLine {
            criteria_id,
            criteria_name: format!("C{criteria_id}"),
            subcriteria_id,
            subcriteria_name: format!("S{subcriteria_id}"),
            score,
            comment: None,
        }
    }

    fn weight(category_id: i64, weight_num: i32) -> CategoryWeight {
        CategoryWeight {
            category_id,
            category_name: format!("C{category_id}"),
            weight_num,
        }
    }

    #[test]
    fn test_two_category_example() {
        let scores = vec![line(1, 1, 5), line(1, 2, 3), line(2, 3, 2)];
        let weights = vec![weight(1, 60), weight(2, 40)];

        let summary = aggregate(&scores, &weights);
        assert_eq!(summary.percentage, 64.0);
        assert_eq!(summary.rating, 3);
        assert_eq!(summary.label, "Regular");
        assert_eq!(summary.total_score, 10);
        assert_eq!(summary.total_max, 15);

        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].score, 8);
        assert_eq!(summary.categories[0].max, 10);
        assert_eq!(summary.categories[0].percentage, 80.0);
        assert_eq!(summary.categories[1].percentage, 40.0);
    }

    #[test]
    fn test_rating_thresholds_are_inclusive() {
        assert_eq!(rating_for(0.0), 0);
        assert_eq!(rating_for(16.0), 0);
        assert_eq!(rating_for(16.01), 1);
        assert_eq!(rating_for(32.0), 1);
        assert_eq!(rating_for(48.0), 2);
        assert_eq!(rating_for(64.0), 3);
        assert_eq!(rating_for(80.0), 4);
        assert_eq!(rating_for(80.01), 5);
        assert_eq!(rating_for(100.0), 5);
    }

    #[test]
    fn test_boundary_percentages_from_scores() {
        // 20 × 80% = 16.00
        let summary = aggregate(&[line(1, 1, 4)], &[weight(1, 20), weight(2, 80)]);
        assert_eq!(summary.percentage, 16.0);
        assert_eq!(summary.rating, 0);
        assert_eq!(summary.label, "No cumple");

        let summary = aggregate(&[line(1, 1, 4)], &[weight(1, 100)]);
        assert_eq!(summary.percentage, 80.0);
        assert_eq!(summary.rating, 4);
        assert_eq!(summary.label, "Bueno");
    }

    #[test]
    fn test_unscored_category_dilutes() {
        let scores = vec![line(1, 1, 5), line(1, 2, 5)];
        let summary = aggregate(&scores, &[weight(1, 50), weight(2, 50)]);
        assert_eq!(summary.percentage, 50.0);
        assert_eq!(summary.total_max, 10);

        let empty = &summary.categories[1];
        assert_eq!((empty.score, empty.max, empty.percentage), (0, 0, 0.0));
    }

    #[test]
    fn test_empty_inputs() {
        let summary = aggregate(&[], &[]);
        assert_eq!(summary.total_score, 0);
        assert_eq!(summary.total_max, 0);
        assert_eq!(summary.percentage, 0.0);
        assert_eq!(summary.rating, 0);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_scores_without_weight_are_ignored() {
        let scores = vec![line(1, 1, 5), line(9, 2, 1)];
        let summary = aggregate(&scores, &[weight(1, 100)]);
        assert_eq!(summary.percentage, 100.0);
        assert_eq!(summary.total_score, 5);
        assert_eq!(summary.rating, 5);
        assert_eq!(summary.label, "Excelente");
    }

    #[test]
    fn test_repeating_fraction_is_rounded() {
        // 4 / 15 = 26.666...%
        let scores = vec![line(1, 1, 1), line(1, 2, 1), line(1, 3, 2)];
        let summary = aggregate(&scores, &[weight(1, 100)]);
        assert_eq!(summary.percentage, 26.67);
        assert_eq!(summary.categories[0].percentage, 26.67);
        assert_eq!(summary.rating, 1);
    }

    #[test]
    fn test_fraction_rounding_half_away_from_zero() {
        assert_eq!(Fraction::new(1, 8).round2(), 0.13);
        assert_eq!(Fraction::new(-1, 8).round2(), -0.13);
        assert_eq!(Fraction::new(64, 1).round2(), 64.0);
        assert_eq!(Fraction::new(100, 3).round2(), 33.33);
        assert_eq!(Fraction::new(5, 0), Fraction::ZERO);
        assert_eq!(Fraction::new(1, 6).plus(Fraction::new(1, 3)), Fraction::new(1, 2));
    }

    #[test]
    fn test_half_cent_tie_rounds_up() {
        // 31 / 40 = 77.5%，× 89% = 68.975
        let scores: Vec<ScoreLine> = [4, 4, 4, 4, 4, 3, 5, 3]
            .iter()
            .enumerate()
            .map(|(i, &s)| line(1, i as i64 + 1, s))
            .collect();
        let summary = aggregate(&scores, &[weight(1, 89), weight(2, 11)]);
        assert_eq!(summary.percentage, 68.98);
        assert_eq!(summary.categories[0].percentage, 77.5);
        assert_eq!(summary.rating, 4);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut scores = vec![
            line(1, 1, 5),
            line(1, 2, 3),
            line(2, 3, 2),
            line(3, 4, 4),
            line(3, 5, 1),
        ];
        let mut weights = vec![weight(1, 33), weight(2, 33), weight(3, 34)];
        let expected = aggregate(&scores, &weights);

        let mut rng = rand::rng();
        for _ in 0..50 {
            scores.shuffle(&mut rng);
            weights.shuffle(&mut rng);
            assert_eq!(aggregate(&scores, &weights), expected);
        }
    }
}
