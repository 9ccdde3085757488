//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! Services are generic over repository/hasher/provider traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use dnya_core::auth::service::AuthService;
use dnya_core::chat::best_effort::BestEffort;
use dnya_core::chat::context::ContextAssembler;
use dnya_core::chat::pipeline::{TurnPipeline, TurnSettings};
use dnya_core::chat::profile::ChatProfileService;
use dnya_core::llm::box_provider::BoxLlmProvider;
use dnya_core::llm::orchestrator::{GenerationOrchestrator, GenerationSettings};
use dnya_core::retrieval::box_store::BoxRetrievalStore;
use dnya_infra::config::{self, Secrets};
use dnya_infra::crypto::password::Argon2PasswordHasher;
use dnya_infra::crypto::token::JwtTokenIssuer;
use dnya_infra::llm::create_provider;
use dnya_infra::retrieval::create_retrieval_store;
use dnya_infra::sqlite::chat_user::SqliteChatUserRepository;
use dnya_infra::sqlite::message::SqliteMessageRepository;
use dnya_infra::sqlite::pool::DatabasePool;
use dnya_infra::sqlite::user::SqliteUserRepository;
use dnya_types::config::DnyaConfig;
use dnya_types::error::AuthError;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenIssuer>;

pub type ConcreteProfileService = ChatProfileService<SqliteChatUserRepository>;

pub type ConcreteTurnPipeline = TurnPipeline<SqliteMessageRepository>;

/// Resolved data directory, configuration, and secrets.
pub struct Environment {
    pub data_dir: PathBuf,
    pub config: DnyaConfig,
    pub secrets: Secrets,
}

impl Environment {
    /// Resolve the data directory, load `config.toml`, and read the environment.
    pub async fn load() -> anyhow::Result<Self> {
        let data_dir = config::resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        let mut config = config::load_config(&data_dir).await;
        config::apply_env_overrides(&mut config, |key| std::env::var(key).ok());

        Ok(Self {
            data_dir,
            config,
            secrets: Secrets::from_env(),
        })
    }

    /// Open the database, running migrations.
    pub async fn open_database(&self) -> anyhow::Result<DatabasePool> {
        let url = config::database_url(&self.config, &self.data_dir);
        DatabasePool::new(&url)
            .await
            .with_context(|| format!("opening database {url}"))
    }
}

/// Externally-backed collaborators injected into [`AppState::from_parts`].
pub struct Backends {
    pub primary: BoxLlmProvider,
    pub fallback: BoxLlmProvider,
    pub retrieval: Option<BoxRetrievalStore>,
}

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub profile_service: Arc<ConcreteProfileService>,
    pub turn_pipeline: Arc<ConcreteTurnPipeline>,
    pub messages: Arc<SqliteMessageRepository>,
    pub config: Arc<DnyaConfig>,
}

impl AppState {
    /// Initialize the application state: connect to DB, build clients, wire services.
    ///
    /// Fails when `JWT_SECRET` or `GEMINI_API_KEY` is missing.
    pub async fn init(env: Environment) -> anyhow::Result<Self> {
        let Environment {
            config, secrets, ..
        } = &env;

        let jwt_secret = secrets
            .jwt_secret
            .clone()
            .context("JWT_SECRET is not set")?;
        let gemini_key = secrets
            .gemini_api_key
            .clone()
            .context("GEMINI_API_KEY is not set")?;

        let db_pool = env.open_database().await?;

        let backends = Backends {
            primary: create_provider(&config.llm, &config.llm.primary, gemini_key.clone()),
            fallback: create_provider(&config.llm, &config.llm.fallback, gemini_key.clone()),
            retrieval: create_retrieval_store(
                &config.llm,
                &config.retrieval,
                gemini_key,
                secrets.pinecone_api_key.clone(),
            )?,
        };

        Ok(Self::from_parts(config.clone(), db_pool, &jwt_secret, backends)?)
    }

    /// Wire services over an open pool and prebuilt backends.
    pub fn from_parts(
        config: DnyaConfig,
        db_pool: DatabasePool,
        jwt_secret: &SecretString,
        backends: Backends,
    ) -> Result<Self, AuthError> {
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            JwtTokenIssuer::new(jwt_secret),
        )?;

        let profile_service =
            ChatProfileService::new(Arc::new(SqliteChatUserRepository::new(db_pool.clone())));

        let messages = Arc::new(SqliteMessageRepository::new(db_pool.clone()));

        let orchestrator = GenerationOrchestrator::new(
            Arc::new(backends.primary),
            Arc::new(backends.fallback),
            GenerationSettings::from_config(&config.llm, &config.chat),
            config.chat.max_sessions,
        );
        let context = ContextAssembler::new(
            Arc::clone(&messages),
            backends.retrieval.map(Arc::new),
            BestEffort::new(Duration::from_millis(config.retrieval.timeout_ms)),
        );
        let turn_pipeline = TurnPipeline::new(
            Arc::clone(&messages),
            context,
            Arc::new(orchestrator),
            TurnSettings::from_config(&config.chat, &config.retrieval),
        );

        Ok(Self {
            auth_service: Arc::new(auth_service),
            profile_service: Arc::new(profile_service),
            turn_pipeline: Arc::new(turn_pipeline),
            messages,
            config: Arc::new(config),
        })
    }
}
