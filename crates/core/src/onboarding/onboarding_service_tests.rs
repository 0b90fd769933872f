use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::cache::{CacheInvalidator, MemoryCache};
use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalUpdate, NewGoal};
use crate::jars::{Jar, JarRepositoryTrait, JarUpdate, NewJar};
use crate::onboarding::{
    CustomGoal, NamedAmount, OnboardingExpenses, OnboardingGoals, OnboardingIncome,
    OnboardingIncomeType, OnboardingService, OnboardingServiceTrait, OnboardingSubmission,
    PredefinedGoal,
};
use crate::recurring::{SyncJob, SyncJobRepositoryTrait};
use crate::test_support::{test_user, ts, MockUserRepository};
use crate::transactions::{
    NewTransactionRecord, Transaction, TransactionRepositoryTrait, TransactionSummary,
    TransactionType, TransactionUpdate,
};

const EMAIL: &str = "john@x.com";
const USER_ID: &str = "user-1";

#[derive(Default)]
struct RecordingGoalRepository {
    inserted: Mutex<Vec<NewGoal>>,
}

#[async_trait]
impl GoalRepositoryTrait for RecordingGoalRepository {
    async fn insert(&self, _: &str, new_goal: NewGoal) -> Result<Goal> {
        self.inserted.lock().unwrap().push(new_goal.clone());
        Ok(Goal {
            id: "goal-x".to_string(),
            user_id: USER_ID.to_string(),
            goal_name: new_goal.goal_name,
            target_amount: new_goal.target_amount,
            amount_saved: 0.0,
            target_date: new_goal.target_date.naive_utc(),
            status: GoalStatus::InProgress,
            created_at: ts(2026, 7, 1),
            updated_at: ts(2026, 7, 1),
        })
    }
    async fn insert_many(&self, _: &str, goals: Vec<NewGoal>) -> Result<usize> {
        let count = goals.len();
        self.inserted.lock().unwrap().extend(goals);
        Ok(count)
    }
    fn list(&self, _: &str) -> Result<Vec<Goal>> {
        unimplemented!()
    }
    fn find(&self, _: &str, _: &str) -> Result<Option<Goal>> {
        unimplemented!()
    }
    async fn update(&self, _: &str, _: &str, _: GoalUpdate) -> Result<Goal> {
        unimplemented!()
    }
    async fn contribute(&self, _: &str, _: &str, _: f64) -> Result<Goal> {
        unimplemented!()
    }
    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct RecordingJarRepository {
    inserted: Mutex<Vec<NewJar>>,
}

#[async_trait]
impl JarRepositoryTrait for RecordingJarRepository {
    async fn insert(&self, _: &str, new_jar: NewJar) -> Result<Jar> {
        self.inserted.lock().unwrap().push(new_jar.clone());
        Ok(Jar {
            id: "jar-x".to_string(),
            user_id: USER_ID.to_string(),
            jar_name: new_jar.jar_name,
            goal_amount: new_jar.goal_amount,
            amount_saved: 0.0,
            created_at: ts(2026, 7, 1),
            updated_at: ts(2026, 7, 1),
        })
    }
    async fn insert_many(&self, _: &str, jars: Vec<NewJar>) -> Result<usize> {
        let count = jars.len();
        self.inserted.lock().unwrap().extend(jars);
        Ok(count)
    }
    fn list(&self, _: &str) -> Result<Vec<Jar>> {
        unimplemented!()
    }
    async fn update(&self, _: &str, _: &str, _: JarUpdate) -> Result<Jar> {
        unimplemented!()
    }
    async fn deposit(&self, _: &str, _: &str, _: f64) -> Result<Jar> {
        unimplemented!()
    }
    async fn withdraw(&self, _: &str, _: &str, _: f64) -> Result<Jar> {
        unimplemented!()
    }
    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }
}

#[derive(Default)]
struct RecordingTransactionRepository {
    inserted: Mutex<Vec<NewTransactionRecord>>,
}

#[async_trait]
impl TransactionRepositoryTrait for RecordingTransactionRepository {
    async fn insert(&self, _: &str, record: NewTransactionRecord) -> Result<Transaction> {
        self.inserted.lock().unwrap().push(record.clone());
        Ok(Transaction {
            id: "tx-x".to_string(),
            user_id: USER_ID.to_string(),
            amount: record.amount,
            transaction_type: record.transaction_type,
            category: record.category,
            description: record.description,
            transaction_date: record.transaction_date,
            charge_id: record.charge_id,
            created_at: ts(2026, 7, 1),
            updated_at: ts(2026, 7, 1),
        })
    }
    fn search(
        &self,
        _: &str,
        _: Option<&str>,
        _: Option<(NaiveDateTime, NaiveDateTime)>,
        _: i64,
        _: i64,
    ) -> Result<(Vec<Transaction>, i64)> {
        unimplemented!()
    }
    fn find(&self, _: &str, _: &str) -> Result<Option<Transaction>> {
        unimplemented!()
    }
    async fn update(&self, _: &str, _: &str, _: TransactionUpdate) -> Result<Transaction> {
        unimplemented!()
    }
    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }
    fn summary_totals(
        &self,
        _: &str,
        _: (NaiveDateTime, NaiveDateTime),
    ) -> Result<TransactionSummary> {
        unimplemented!()
    }
    fn expenses_in_range(
        &self,
        _: &str,
        _: (NaiveDateTime, NaiveDateTime),
    ) -> Result<Vec<Transaction>> {
        unimplemented!()
    }
}

#[derive(Default)]
struct RecordingJobRepository {
    job: Mutex<Option<SyncJob>>,
}

#[async_trait]
impl SyncJobRepositoryTrait for RecordingJobRepository {
    fn find(&self, _: &str) -> Result<Option<SyncJob>> {
        Ok(self.job.lock().unwrap().clone())
    }
    async fn run_monthly_sync(
        &self,
        _: &str,
        _: i32,
        _: i32,
        _: f64,
        _: f64,
        _: NaiveDateTime,
    ) -> Result<bool> {
        unimplemented!()
    }
    async fn stamp(&self, user_id: &str, month: i32, year: i32, now: NaiveDateTime) -> Result<()> {
        *self.job.lock().unwrap() = Some(SyncJob {
            user_id: user_id.to_string(),
            last_synced_month: month,
            last_synced_year: year,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }
}

struct Fixture {
    service: OnboardingService,
    users: Arc<MockUserRepository>,
    goals: Arc<RecordingGoalRepository>,
    jars: Arc<RecordingJarRepository>,
    transactions: Arc<RecordingTransactionRepository>,
    jobs: Arc<RecordingJobRepository>,
}

fn fixture() -> Fixture {
    let users = MockUserRepository::with_user(test_user(USER_ID, EMAIL));
    let goals = Arc::new(RecordingGoalRepository::default());
    let jars = Arc::new(RecordingJarRepository::default());
    let transactions = Arc::new(RecordingTransactionRepository::default());
    let jobs = Arc::new(RecordingJobRepository::default());
    let cache = Arc::new(MemoryCache::new(16));
    let service = OnboardingService::new(
        users.clone(),
        goals.clone(),
        jars.clone(),
        transactions.clone(),
        jobs.clone(),
        CacheInvalidator::new(cache),
    );
    Fixture {
        service,
        users,
        goals,
        jars,
        transactions,
        jobs,
    }
}

fn submission() -> OnboardingSubmission {
    OnboardingSubmission {
        income: OnboardingIncome {
            monthly_income: 4000.0,
            income_type: OnboardingIncomeType::Monthly,
            additional_sources: vec![NamedAmount {
                name: "Freelance".to_string(),
                amount: 500.0,
            }],
        },
        expenses: OnboardingExpenses {
            predefined_expenses: HashMap::from([("rent".to_string(), 1200.0)]),
            custom_expenses: vec![NamedAmount {
                name: "Gym".to_string(),
                amount: 50.0,
            }],
        },
        goals: OnboardingGoals {
            predefined_goals: HashMap::from([(
                "trip".to_string(),
                PredefinedGoal {
                    amount: 1500.0,
                    date: Some("2027-01-01".to_string()),
                },
            )]),
            custom_goals: vec![CustomGoal {
                name: "New Bike".to_string(),
                amount: 800.0,
                date: None,
            }],
            finance_tips: true,
        },
    }
}

#[tokio::test]
async fn submit_applies_the_whole_wizard_payload() {
    let f = fixture();
    let now = ts(2026, 7, 5);

    let profile = f.service.submit(EMAIL, submission(), now).await.unwrap();

    assert!(profile.onboarding_done);
    assert!(profile.finance_tips_opt_in);
    assert_eq!(profile.monthly_income, 4000.0);
    assert_eq!(profile.income_sources.len(), 1);
    assert_eq!(profile.recurring_expenses.len(), 2);

    // Each goal is mirrored by a jar of the same name and target.
    let goals = f.goals.inserted.lock().unwrap();
    let jars = f.jars.inserted.lock().unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(jars.len(), 2);
    let goal_names: Vec<&str> = goals.iter().map(|g| g.goal_name.as_str()).collect();
    assert!(goal_names.contains(&"Weekend Trip")); // predefined id resolved
    assert!(goal_names.contains(&"New Bike"));
    for jar in jars.iter() {
        assert!(goal_names.contains(&jar.jar_name.as_str()));
    }

    // First month materialized: one income row, one per side source, one
    // per recurring expense.
    let txs = f.transactions.inserted.lock().unwrap();
    let incomes: Vec<_> = txs
        .iter()
        .filter(|t| t.transaction_type == TransactionType::RecurringIncome)
        .collect();
    let expenses: Vec<_> = txs
        .iter()
        .filter(|t| t.transaction_type == TransactionType::RecurringExpense)
        .collect();
    assert_eq!(incomes.len(), 2);
    assert_eq!(expenses.len(), 2);

    // Job stamped for the current month, so the lazy sync will not run again.
    let job = f.jobs.job.lock().unwrap().clone().unwrap();
    assert_eq!(job.last_synced_month, 7);
    assert_eq!(job.last_synced_year, 2026);
}

#[tokio::test]
async fn submit_twice_is_rejected() {
    let f = fixture();
    let now = ts(2026, 7, 5);
    f.service.submit(EMAIL, submission(), now).await.unwrap();

    let err = f
        .service
        .submit(EMAIL, submission(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Business(_)));
    assert_eq!(err.to_string(), "Onboarding already completed.");
}

#[tokio::test]
async fn invalid_amounts_are_rejected_before_any_write() {
    let f = fixture();
    let mut bad = submission();
    bad.income.monthly_income = 0.0;

    let err = f
        .service
        .submit(EMAIL, bad, ts(2026, 7, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(f.goals.inserted.lock().unwrap().is_empty());
    assert!(f.transactions.inserted.lock().unwrap().is_empty());
    assert!(!f.users.users.lock().unwrap()[0].onboarding_done);
}

#[tokio::test]
async fn bad_goal_dates_are_a_validation_error() {
    let f = fixture();
    let mut bad = submission();
    bad.goals.custom_goals[0].date = Some("sometime soon".to_string());

    let err = f
        .service
        .submit(EMAIL, bad, ts(2026, 7, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
