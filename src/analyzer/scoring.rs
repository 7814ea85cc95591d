//! Aggregation of category rollups into the overall score, grade and summary

use crate::{percentage, Categories, CategoryKey, Grade, Issue, IssueSummary, Severity};

/// Number of categories surfaced by `recommendations`
const MAX_RECOMMENDATIONS: usize = 3;

/// Calculator for overall page scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// round(100 * sum of scores / sum of maximums) over all categories
    pub fn overall(categories: &Categories) -> u8 {
        let (score, max) = categories
            .iter()
            .fold((0u32, 0u32), |(s, m), (_, c)| (s + c.score, m + c.max_score));
        percentage(score, max)
    }

    /// Count every issue by severity
    pub fn summarize<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> IssueSummary {
        issues
            .into_iter()
            .fold(IssueSummary::default(), |mut summary, issue| {
                match issue.severity {
                    Severity::Critical => summary.critical += 1,
                    Severity::Warning => summary.warning += 1,
                    Severity::Info => summary.info += 1,
                    Severity::Success => summary.success += 1,
                }
                summary
            })
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::APlus => "Outstanding - The page follows nearly every best practice",
            Grade::A => "Excellent - Only minor refinements remain",
            Grade::B => "Good - Solid foundation with room for improvement",
            Grade::C => "Fair - Several issues are holding the page back",
            Grade::D => "Poor - Significant problems affect visibility",
            Grade::F => "Failing - The page needs major SEO work",
        }
    }

    /// Advice for the weakest categories, lowest percentage first.
    /// Each line names the category and the fix for its costliest issue.
    pub fn recommendations(categories: &Categories) -> Vec<String> {
        let mut weak: Vec<_> = categories
            .iter()
            .filter(|(_, c)| c.percentage < 100)
            .collect();
        weak.sort_by_key(|(key, c)| (c.percentage, category_rank(*key)));

        let recs: Vec<String> = weak
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|(_, c)| {
                let advice = c
                    .issues
                    .iter()
                    .filter(|i| i.points < i.max_points)
                    .max_by_key(|i| i.max_points - i.points)
                    .map(|i| {
                        i.fix_guidance
                            .clone()
                            .unwrap_or_else(|| i.title.clone())
                    })
                    .unwrap_or_default();
                format!("{} {} ({}%): {}", c.icon, c.name, c.percentage, advice)
            })
            .collect();

        if recs.is_empty() {
            vec!["Every category is at full marks. Keep monitoring after content changes.".to_string()]
        } else {
            recs
        }
    }
}

fn category_rank(key: CategoryKey) -> usize {
    CategoryKey::ALL
        .iter()
        .position(|k| *k == key)
        .unwrap_or(CategoryKey::ALL.len())
}
