//! Composition root: configuration-driven wiring of every repository,
//! cache backend, and service, with lifecycles owned here rather than in
//! module-level singletons.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::auth::AuthManager;
use crate::config::Config;
use crate::mailer::{DisabledMailer, HttpMailer, Mailer};
use moneta_ai::{FallbackInsightGenerator, RigInsightGenerator};
use moneta_cache_redis::RedisCache;
use moneta_core::cache::{Cache, CacheInvalidator, MemoryCache};
use moneta_core::charges::{ChargeService, ChargeServiceTrait};
use moneta_core::goals::{GoalService, GoalServiceTrait};
use moneta_core::insights::{InsightGeneratorTrait, InsightService, InsightServiceTrait};
use moneta_core::jars::{JarService, JarServiceTrait};
use moneta_core::onboarding::{OnboardingService, OnboardingServiceTrait};
use moneta_core::recurring::{RecurringSyncService, RecurringSyncServiceTrait};
use moneta_core::transactions::{TransactionService, TransactionServiceTrait};
use moneta_core::users::{UserService, UserServiceTrait};
use moneta_storage_sqlite::charges::ChargeRepository;
use moneta_storage_sqlite::db::{self, write_actor};
use moneta_storage_sqlite::goals::GoalRepository;
use moneta_storage_sqlite::jars::JarRepository;
use moneta_storage_sqlite::recurring::SyncJobRepository;
use moneta_storage_sqlite::transactions::TransactionRepository;
use moneta_storage_sqlite::users::UserRepository;

pub struct AppState {
    pub auth: AuthManager,
    pub mailer: Arc<dyn Mailer>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub transaction_service: Arc<dyn TransactionServiceTrait>,
    pub jar_service: Arc<dyn JarServiceTrait>,
    pub goal_service: Arc<dyn GoalServiceTrait>,
    pub charge_service: Arc<dyn ChargeServiceTrait>,
    pub insight_service: Arc<dyn InsightServiceTrait>,
    pub recurring_service: Arc<dyn RecurringSyncServiceTrait>,
    pub onboarding_service: Arc<dyn OnboardingServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("MONETA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let cache: Arc<dyn Cache> = match &config.redis_url {
        Some(url) => {
            let redis = RedisCache::new(url).await?;
            tracing::info!("Using Redis cache at {}", url);
            Arc::new(redis)
        }
        None => {
            tracing::warn!("REDIS_URL not set; falling back to the in-memory cache");
            Arc::new(MemoryCache::new(10_000))
        }
    };
    let invalidator = CacheInvalidator::new(cache.clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let transaction_repository = Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let jar_repository = Arc::new(JarRepository::new(pool.clone(), writer.clone()));
    let goal_repository = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let charge_repository = Arc::new(ChargeRepository::new(pool.clone(), writer.clone()));
    let sync_job_repository = Arc::new(SyncJobRepository::new(pool.clone(), writer.clone()));

    let insight_generator: Arc<dyn InsightGeneratorTrait> = match &config.insights {
        Some(provider) => {
            tracing::info!(
                "Generating insights with provider {} model {}",
                provider.provider_id,
                provider.model
            );
            Arc::new(RigInsightGenerator::new(provider.clone()))
        }
        None => {
            tracing::info!("No insight provider configured; using rule-based insights");
            Arc::new(FallbackInsightGenerator)
        }
    };

    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        cache.clone(),
        invalidator.clone(),
    ));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        user_repository.clone(),
        cache.clone(),
        invalidator.clone(),
    ));
    let jar_service = Arc::new(JarService::new(
        jar_repository.clone(),
        user_repository.clone(),
        cache.clone(),
        invalidator.clone(),
    ));
    let goal_service = Arc::new(GoalService::new(
        goal_repository.clone(),
        user_repository.clone(),
        cache.clone(),
        invalidator.clone(),
    ));
    let charge_service = Arc::new(ChargeService::new(
        charge_repository.clone(),
        user_repository.clone(),
        cache.clone(),
        invalidator.clone(),
    ));
    let insight_service = Arc::new(InsightService::new(
        user_repository.clone(),
        transaction_repository.clone(),
        jar_repository.clone(),
        goal_repository.clone(),
        charge_repository.clone(),
        insight_generator,
        cache.clone(),
    ));
    let recurring_service = Arc::new(RecurringSyncService::new(
        user_repository.clone(),
        sync_job_repository.clone(),
        invalidator.clone(),
    ));
    let onboarding_service = Arc::new(OnboardingService::new(
        user_repository.clone(),
        goal_repository.clone(),
        jar_repository.clone(),
        transaction_repository.clone(),
        sync_job_repository.clone(),
        invalidator,
    ));

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => Arc::new(HttpMailer::new(mail.clone())),
        None => {
            tracing::warn!("Mail settings absent; OTP delivery is disabled");
            Arc::new(DisabledMailer)
        }
    };

    if config.jwt_secret.is_empty() {
        tracing::warn!("MONETA_JWT_SECRET is not set; issued tokens use an empty secret");
    }
    let auth = AuthManager::new(&config.jwt_secret, config.jwt_expiry_secs);

    Ok(Arc::new(AppState {
        auth,
        mailer,
        user_service,
        transaction_service,
        jar_service,
        goal_service,
        charge_service,
        insight_service,
        recurring_service,
        onboarding_service,
    }))
}
