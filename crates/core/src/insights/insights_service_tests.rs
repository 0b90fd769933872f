use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::cache::{CacheInvalidator, EntityChange, MemoryCache};
use crate::charges::{
    ChargeRepositoryTrait, ChargeStatus, ChargeUpdate, NewCharge, UpcomingCharge,
};
use crate::errors::Result;
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalUpdate, NewGoal};
use crate::insights::{
    FinancialFacts, Insight, InsightGeneratorTrait, InsightKind, InsightService,
    InsightServiceTrait,
};
use crate::jars::{Jar, JarRepositoryTrait, JarUpdate, NewJar};
use crate::test_support::{test_user, ts, MockUserRepository};
use crate::transactions::{
    NewTransactionRecord, Transaction, TransactionRepositoryTrait, TransactionSummary,
    TransactionUpdate,
};

const EMAIL: &str = "john@x.com";
const USER_ID: &str = "user-1";

/// Generator that derives one insight per fact group and counts invocations.
struct CountingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl InsightGeneratorTrait for CountingGenerator {
    async fn generate(&self, facts: &FinancialFacts) -> Result<Vec<Insight>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Insight {
            title: "Spending".to_string(),
            description: format!(
                "income {} expense {} jars {} dues {}",
                facts.month_income,
                facts.month_expense,
                facts.jars.len(),
                facts.due_charge_count
            ),
            kind: InsightKind::Tip,
        }])
    }
}

#[derive(Default)]
struct StubTransactionRepository {
    summary: Mutex<TransactionSummary>,
}

#[async_trait]
impl TransactionRepositoryTrait for StubTransactionRepository {
    async fn insert(&self, _: &str, _: NewTransactionRecord) -> Result<Transaction> {
        unimplemented!()
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
        Ok(self.summary.lock().unwrap().clone())
    }
    fn expenses_in_range(
        &self,
        _: &str,
        _: (NaiveDateTime, NaiveDateTime),
    ) -> Result<Vec<Transaction>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct StubJarRepository {
    jars: Mutex<Vec<Jar>>,
}

#[async_trait]
impl JarRepositoryTrait for StubJarRepository {
    async fn insert(&self, _: &str, _: NewJar) -> Result<Jar> {
        unimplemented!()
    }
    async fn insert_many(&self, _: &str, _: Vec<NewJar>) -> Result<usize> {
        unimplemented!()
    }
    fn list(&self, _: &str) -> Result<Vec<Jar>> {
        Ok(self.jars.lock().unwrap().clone())
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
struct StubGoalRepository;

#[async_trait]
impl GoalRepositoryTrait for StubGoalRepository {
    async fn insert(&self, _: &str, _: NewGoal) -> Result<Goal> {
        unimplemented!()
    }
    async fn insert_many(&self, _: &str, _: Vec<NewGoal>) -> Result<usize> {
        unimplemented!()
    }
    fn list(&self, _: &str) -> Result<Vec<Goal>> {
        Ok(Vec::new())
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
struct StubChargeRepository {
    due_count: Mutex<i64>,
}

#[async_trait]
impl ChargeRepositoryTrait for StubChargeRepository {
    async fn insert(&self, _: &str, _: NewCharge) -> Result<UpcomingCharge> {
        unimplemented!()
    }
    fn list(&self, _: &str, _: ChargeStatus) -> Result<Vec<UpcomingCharge>> {
        unimplemented!()
    }
    async fn update(&self, _: &str, _: &str, _: ChargeUpdate) -> Result<UpcomingCharge> {
        unimplemented!()
    }
    async fn set_paid(&self, _: &str, _: &str, _: NaiveDateTime) -> Result<UpcomingCharge> {
        unimplemented!()
    }
    async fn set_not_paid(&self, _: &str, _: &str, _: NaiveDateTime) -> Result<UpcomingCharge> {
        unimplemented!()
    }
    async fn delete(&self, _: &str, _: &str) -> Result<usize> {
        unimplemented!()
    }
    async fn mark_overdue(&self, _: &str, _: NaiveDateTime) -> Result<usize> {
        Ok(0)
    }
    fn count_by_status(&self, _: &str, status: ChargeStatus) -> Result<i64> {
        Ok(if status == ChargeStatus::Due {
            *self.due_count.lock().unwrap()
        } else {
            0
        })
    }
}

struct Fixture {
    service: InsightService,
    generator: Arc<CountingGenerator>,
    transactions: Arc<StubTransactionRepository>,
    cache: Arc<MemoryCache>,
}

fn fixture() -> Fixture {
    let mut user = test_user(USER_ID, EMAIL);
    user.monthly_income = 4000.0;
    let users = MockUserRepository::with_user(user);

    let transactions = Arc::new(StubTransactionRepository::default());
    *transactions.summary.lock().unwrap() = TransactionSummary {
        total_income: 900.0,
        total_expense: 450.0,
    };
    let jars = Arc::new(StubJarRepository::default());
    jars.jars.lock().unwrap().push(Jar {
        id: "jar-1".to_string(),
        user_id: USER_ID.to_string(),
        jar_name: "Trip".to_string(),
        goal_amount: 1000.0,
        amount_saved: 200.0,
        created_at: ts(2026, 7, 1),
        updated_at: ts(2026, 7, 1),
    });
    let charges = Arc::new(StubChargeRepository::default());
    *charges.due_count.lock().unwrap() = 2;

    let generator = Arc::new(CountingGenerator {
        calls: AtomicUsize::new(0),
    });
    let cache = Arc::new(MemoryCache::new(16));
    let service = InsightService::new(
        users,
        transactions.clone(),
        jars,
        Arc::new(StubGoalRepository),
        charges,
        generator.clone(),
        cache.clone(),
    );
    Fixture {
        service,
        generator,
        transactions,
        cache,
    }
}

#[tokio::test]
async fn facts_reflect_the_financial_state() {
    let f = fixture();
    let insights = f.service.get_insights(EMAIL, ts(2026, 7, 15)).await.unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].description, "income 900 expense 450 jars 1 dues 2");
}

#[tokio::test]
async fn insights_are_cached_for_repeat_reads() {
    let f = fixture();

    f.service.get_insights(EMAIL, ts(2026, 7, 15)).await.unwrap();
    f.service.get_insights(EMAIL, ts(2026, 7, 15)).await.unwrap();
    f.service.get_insights(EMAIL, ts(2026, 7, 15)).await.unwrap();

    assert_eq!(f.generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn purging_insights_regenerates_from_fresh_facts() {
    let f = fixture();
    f.service.get_insights(EMAIL, ts(2026, 7, 15)).await.unwrap();

    // A transaction mutation elsewhere purges the insights key.
    *f.transactions.summary.lock().unwrap() = TransactionSummary {
        total_income: 900.0,
        total_expense: 999.0,
    };
    CacheInvalidator::new(f.cache.clone())
        .purge(EMAIL, &[EntityChange::Transactions])
        .await;

    let insights = f.service.get_insights(EMAIL, ts(2026, 7, 15)).await.unwrap();
    assert_eq!(f.generator.calls.load(Ordering::SeqCst), 2);
    assert!(insights[0].description.contains("expense 999"));
}
