use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};

use super::onboarding_model::{predefined_goal_name, OnboardingSubmission};
use crate::cache::{CacheInvalidator, EntityChange};
use crate::errors::{Error, Result};
use crate::goals::{GoalRepositoryTrait, NewGoal};
use crate::jars::{JarRepositoryTrait, NewJar};
use crate::recurring::SyncJobRepositoryTrait;
use crate::transactions::{NewTransactionRecord, TransactionRepositoryTrait, TransactionType};
use crate::users::{
    NewIncomeSource, NewRecurringExpense, ProfileUpdate, UserProfile, UserRepositoryTrait,
};

/// Trait for the onboarding service.
#[async_trait]
pub trait OnboardingServiceTrait: Send + Sync {
    async fn submit(
        &self,
        email: &str,
        submission: OnboardingSubmission,
        now: NaiveDateTime,
    ) -> Result<UserProfile>;
}

/// Applies the setup wizard's payload: income profile, recurring expenses,
/// initial goals and jars, and the first month's recurring transactions.
pub struct OnboardingService {
    users: Arc<dyn UserRepositoryTrait>,
    goals: Arc<dyn GoalRepositoryTrait>,
    jars: Arc<dyn JarRepositoryTrait>,
    transactions: Arc<dyn TransactionRepositoryTrait>,
    jobs: Arc<dyn SyncJobRepositoryTrait>,
    invalidator: CacheInvalidator,
}

impl OnboardingService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        goals: Arc<dyn GoalRepositoryTrait>,
        jars: Arc<dyn JarRepositoryTrait>,
        transactions: Arc<dyn TransactionRepositoryTrait>,
        jobs: Arc<dyn SyncJobRepositoryTrait>,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            users,
            goals,
            jars,
            transactions,
            jobs,
            invalidator,
        }
    }
}

/// Parses a wizard-supplied target date (RFC 3339 or bare `YYYY-MM-DD`),
/// defaulting to one year from `now`.
fn resolve_target_date(date: Option<&str>, now: NaiveDateTime) -> Result<DateTime<Utc>> {
    let Some(raw) = date else {
        let fallback = now
            .checked_add_days(Days::new(365))
            .unwrap_or(now);
        return Ok(DateTime::from_naive_utc_and_offset(fallback, Utc));
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0).expect("midnight is valid");
        return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
    }
    Err(Error::invalid_input(format!("Invalid goal date: {}", raw)))
}

fn require_positive(amount: f64, what: &str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::invalid_input(format!(
            "{} must be a positive number",
            what
        )));
    }
    Ok(())
}

#[async_trait]
impl OnboardingServiceTrait for OnboardingService {
    async fn submit(
        &self,
        email: &str,
        submission: OnboardingSubmission,
        now: NaiveDateTime,
    ) -> Result<UserProfile> {
        let user = self
            .users
            .find_by_email(email)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        if user.onboarding_done {
            return Err(Error::business("Onboarding already completed."));
        }

        let OnboardingSubmission {
            income,
            expenses,
            goals,
        } = submission;

        require_positive(income.monthly_income, "Monthly income")?;
        for source in &income.additional_sources {
            require_positive(source.amount, "Income source amount")?;
        }
        for (_, amount) in &expenses.predefined_expenses {
            require_positive(*amount, "Expense amount")?;
        }
        for expense in &expenses.custom_expenses {
            require_positive(expense.amount, "Expense amount")?;
        }

        // Income profile and sub-entities.
        self.users
            .update_profile(
                &user.id,
                ProfileUpdate {
                    monthly_income: Some(income.monthly_income),
                    income_type: Some(income.income_type.into()),
                    ..Default::default()
                },
            )
            .await?;
        let sources: Vec<NewIncomeSource> = income
            .additional_sources
            .iter()
            .map(|s| NewIncomeSource {
                source_name: s.name.clone(),
                amount: s.amount,
            })
            .collect();
        self.users
            .replace_income_sources(&user.id, sources)
            .await?;

        let mut recurring: Vec<NewRecurringExpense> = expenses
            .predefined_expenses
            .iter()
            .map(|(name, amount)| NewRecurringExpense {
                expense_name: name.clone(),
                amount: *amount,
            })
            .collect();
        recurring.extend(expenses.custom_expenses.iter().map(|e| NewRecurringExpense {
            expense_name: e.name.clone(),
            amount: e.amount,
        }));
        self.users
            .replace_recurring_expenses(&user.id, recurring.clone())
            .await?;

        // Initial goals, each mirrored by a jar to save into.
        let mut new_goals: Vec<NewGoal> = Vec::new();
        let mut new_jars: Vec<NewJar> = Vec::new();
        for (id, goal) in &goals.predefined_goals {
            require_positive(goal.amount, "Goal amount")?;
            let name = predefined_goal_name(id).to_string();
            new_goals.push(NewGoal {
                goal_name: name.clone(),
                target_amount: goal.amount,
                target_date: resolve_target_date(goal.date.as_deref(), now)?,
            });
            new_jars.push(NewJar {
                jar_name: name,
                goal_amount: goal.amount,
            });
        }
        for goal in &goals.custom_goals {
            require_positive(goal.amount, "Goal amount")?;
            new_goals.push(NewGoal {
                goal_name: goal.name.clone(),
                target_amount: goal.amount,
                target_date: resolve_target_date(goal.date.as_deref(), now)?,
            });
            new_jars.push(NewJar {
                jar_name: goal.name.clone(),
                goal_amount: goal.amount,
            });
        }
        if !new_goals.is_empty() {
            self.goals.insert_many(&user.id, new_goals).await?;
            self.jars.insert_many(&user.id, new_jars).await?;
        }

        // Materialize the first month of the recurring profile.
        self.transactions
            .insert(
                &user.id,
                NewTransactionRecord {
                    amount: income.monthly_income,
                    transaction_type: TransactionType::RecurringIncome,
                    category: "Income".to_string(),
                    description: Some("Onboarding monthly income".to_string()),
                    transaction_date: now,
                    charge_id: None,
                },
            )
            .await?;
        for source in &income.additional_sources {
            self.transactions
                .insert(
                    &user.id,
                    NewTransactionRecord {
                        amount: source.amount,
                        transaction_type: TransactionType::RecurringIncome,
                        category: "Additional Income".to_string(),
                        description: Some(format!("Onboarding income source: {}", source.name)),
                        transaction_date: now,
                        charge_id: None,
                    },
                )
                .await?;
        }
        for expense in &recurring {
            self.transactions
                .insert(
                    &user.id,
                    NewTransactionRecord {
                        amount: expense.amount,
                        transaction_type: TransactionType::RecurringExpense,
                        category: "Recurring".to_string(),
                        description: Some(format!(
                            "Onboarding recurring expense: {}",
                            expense.expense_name
                        )),
                        transaction_date: now,
                        charge_id: None,
                    },
                )
                .await?;
        }

        // Stamp the sync job so the next profile access does not materialize
        // this month a second time.
        self.jobs
            .stamp(&user.id, now.month() as i32, now.year(), now)
            .await?;

        self.users
            .set_onboarded(&user.id, goals.finance_tips)
            .await?;

        self.invalidator
            .purge(
                email,
                &[
                    EntityChange::Profile,
                    EntityChange::Goals { goal_id: None },
                    EntityChange::Jars,
                    EntityChange::Transactions,
                ],
            )
            .await;

        let user = self
            .users
            .find_by_email(email)?
            .ok_or_else(|| Error::not_found("User not found"))?;
        let sources = self.users.list_income_sources(&user.id)?;
        let expenses = self.users.list_recurring_expenses(&user.id)?;
        Ok(UserProfile::assemble(user, sources, expenses))
    }
}
