use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime};
use log::warn;

use super::insights_model::{FinancialFacts, GoalFact, Insight, JarFact};
use super::insights_traits::{InsightGeneratorTrait, InsightServiceTrait};
use crate::cache::{from_cache_bytes, insights_key, to_cache_bytes, Cache};
use crate::charges::{ChargeRepositoryTrait, ChargeStatus};
use crate::constants::CACHE_TTL_SHORT_SECS;
use crate::errors::{Error, Result};
use crate::goals::{GoalRepositoryTrait, GoalStatus};
use crate::jars::JarRepositoryTrait;
use crate::transactions::TransactionRepositoryTrait;
use crate::users::UserRepositoryTrait;
use crate::utils::month_range;

/// Service producing cached, generated insights over a user's finances.
pub struct InsightService {
    users: Arc<dyn UserRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
    jars: Arc<dyn JarRepositoryTrait>,
    goals: Arc<dyn GoalRepositoryTrait>,
    charges: Arc<dyn ChargeRepositoryTrait>,
    generator: Arc<dyn InsightGeneratorTrait>,
    cache: Arc<dyn Cache>,
}

impl InsightService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        jars: Arc<dyn JarRepositoryTrait>,
        goals: Arc<dyn GoalRepositoryTrait>,
        charges: Arc<dyn ChargeRepositoryTrait>,
        generator: Arc<dyn InsightGeneratorTrait>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            users,
            transactions,
            jars,
            goals,
            charges,
            generator,
            cache,
        }
    }

    fn gather_facts(&self, email: &str, now: NaiveDateTime) -> Result<FinancialFacts> {
        let user = self
            .users
            .find_by_email(email)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let range = month_range(now.year(), now.month())?;
        let summary = self.transactions.summary_totals(&user.id, range)?;

        let jars = self
            .jars
            .list(&user.id)?
            .into_iter()
            .map(|j| JarFact {
                jar_name: j.jar_name,
                goal_amount: j.goal_amount,
                amount_saved: j.amount_saved,
            })
            .collect();
        let goals = self
            .goals
            .list(&user.id)?
            .into_iter()
            .map(|g| GoalFact {
                goal_name: g.goal_name,
                target_amount: g.target_amount,
                amount_saved: g.amount_saved,
                completed: g.status == GoalStatus::Completed,
            })
            .collect();

        let recurring_expense_total = self
            .users
            .list_recurring_expenses(&user.id)?
            .iter()
            .map(|e| e.amount)
            .sum();

        Ok(FinancialFacts {
            month_income: summary.total_income,
            month_expense: summary.total_expense,
            monthly_income: user.monthly_income,
            recurring_expense_total,
            jars,
            goals,
            due_charge_count: self.charges.count_by_status(&user.id, ChargeStatus::Due)?,
            finance_tips_opt_in: user.finance_tips_opt_in,
        })
    }
}

#[async_trait]
impl InsightServiceTrait for InsightService {
    async fn get_insights(&self, email: &str, now: NaiveDateTime) -> Result<Vec<Insight>> {
        let key = insights_key(email);
        match self.cache.get(&key).await {
            Ok(Some(bytes)) => match from_cache_bytes::<Vec<Insight>>(&bytes) {
                Ok(insights) => return Ok(insights),
                Err(e) => warn!("discarding unreadable cache entry {}: {}", key, e),
            },
            Ok(None) => {}
            Err(e) => warn!("cache read failed for {}: {}", key, e),
        }

        let facts = self.gather_facts(email, now)?;
        let insights = self.generator.generate(&facts).await?;

        match to_cache_bytes(&insights) {
            Ok(bytes) => {
                let ttl = Duration::from_secs(CACHE_TTL_SHORT_SECS);
                if let Err(e) = self.cache.set(&key, &bytes, Some(ttl)).await {
                    warn!("cache write failed for {}: {}", key, e);
                }
            }
            Err(e) => warn!("failed to serialize insights for {}: {}", key, e),
        }

        Ok(insights)
    }
}
