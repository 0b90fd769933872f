//! Rule-based insight fallback.
//!
//! Used when no generative provider is configured. Derives the same shape of
//! output from the same facts, deterministically, so the insights endpoint
//! keeps working in development and tests.

use async_trait::async_trait;

use moneta_core::errors::Result;
use moneta_core::insights::{FinancialFacts, Insight, InsightGeneratorTrait, InsightKind};

/// Deterministic generator derived from the facts alone.
pub struct FallbackInsightGenerator;

#[async_trait]
impl InsightGeneratorTrait for FallbackInsightGenerator {
    async fn generate(&self, facts: &FinancialFacts) -> Result<Vec<Insight>> {
        Ok(derive_insights(facts))
    }
}

fn derive_insights(facts: &FinancialFacts) -> Vec<Insight> {
    let mut insights = Vec::new();

    if facts.month_expense > 0.0 && facts.month_expense > facts.month_income {
        insights.push(Insight {
            title: "Spending outpaces income".to_string(),
            description: format!(
                "You've spent {:.0} against {:.0} of income this month",
                facts.month_expense, facts.month_income
            ),
            kind: InsightKind::Suggestion,
        });
    } else if facts.month_income > 0.0 {
        insights.push(Insight {
            title: "Great job!".to_string(),
            description: "You're spending less than you earn this month".to_string(),
            kind: InsightKind::Positive,
        });
    }

    if facts.due_charge_count > 0 {
        insights.push(Insight {
            title: "Bills due".to_string(),
            description: format!(
                "{} unpaid bill(s) are past their due date",
                facts.due_charge_count
            ),
            kind: InsightKind::Reminder,
        });
    }

    // Call out the jar closest to (but not at) its target.
    let closest = facts
        .jars
        .iter()
        .filter(|j| j.goal_amount > 0.0 && j.amount_saved < j.goal_amount)
        .max_by(|a, b| {
            let ra = a.amount_saved / a.goal_amount;
            let rb = b.amount_saved / b.goal_amount;
            ra.total_cmp(&rb)
        });
    if let Some(jar) = closest {
        let percent = (jar.amount_saved / jar.goal_amount * 100.0).round();
        insights.push(Insight {
            title: format!("{} is {percent:.0}% there", jar.jar_name),
            description: format!(
                "{:.0} more to reach your {:.0} target",
                jar.goal_amount - jar.amount_saved,
                jar.goal_amount
            ),
            kind: InsightKind::Tip,
        });
    }

    let completed = facts.goals.iter().filter(|g| g.completed).count();
    if completed > 0 {
        insights.push(Insight {
            title: "Goal completed".to_string(),
            description: format!("You've completed {} goal(s). Keep it up!", completed),
            kind: InsightKind::Positive,
        });
    }

    if insights.is_empty() || facts.finance_tips_opt_in {
        insights.push(Insight {
            title: "Reminder".to_string(),
            description: "Review your budget at the end of the month".to_string(),
            kind: InsightKind::Reminder,
        });
    }

    insights.truncate(5);
    insights
}
