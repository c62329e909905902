//! Application state wiring all services together.
//!
//! Services are generic over the repository traits; AppState pins them to
//! the SQLite implementations and shares one gateway across all of them.

use std::path::PathBuf;
use std::sync::Arc;

use ppss_core::gateway::box_gateway::BoxChatGateway;
use ppss_core::service::analysis::AnalysisService;
use ppss_core::service::chat::ChatService;
use ppss_core::service::design::DesignService;
use ppss_core::service::session::SessionService;
use ppss_core::service::summary::StageSummaryService;
use ppss_infra::config::{load_config, resolve_data_dir};
use ppss_infra::llm::{api_key_from_env, create_gateway};
use ppss_infra::sqlite::analysis::SqliteAnalysisRepository;
use ppss_infra::sqlite::conversation::SqliteConversationRepository;
use ppss_infra::sqlite::pool::{DatabasePool, default_database_url};
use ppss_infra::sqlite::session::SqliteSessionRepository;
use ppss_infra::sqlite::summary::SqliteStageSummaryRepository;
use ppss_types::config::PpssConfig;

pub type ConcreteSessionService = SessionService<SqliteSessionRepository>;

pub type ConcreteChatService = ChatService<SqliteSessionRepository, SqliteConversationRepository>;

pub type ConcreteSummaryService =
    StageSummaryService<SqliteConversationRepository, SqliteStageSummaryRepository>;

pub type ConcreteAnalysisService =
    AnalysisService<SqliteSessionRepository, SqliteAnalysisRepository>;

pub type ConcreteDesignService = DesignService<SqliteSessionRepository>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<ConcreteSessionService>,
    pub chat: Arc<ConcreteChatService>,
    pub summaries: Arc<ConcreteSummaryService>,
    pub analysis: Arc<ConcreteAnalysisService>,
    pub design: Arc<ConcreteDesignService>,
    pub gateway: Arc<BoxChatGateway>,
    pub config: Arc<PpssConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve config, open the database, and select the gateway.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let db_url = config
            .database
            .url
            .clone()
            .unwrap_or_else(|| format!("{}?mode=rwc", default_database_url(&data_dir)));
        let db_pool = DatabasePool::new(&db_url).await?;

        let gateway = create_gateway(&config.gateway, api_key_from_env());

        Ok(Self::from_parts(db_pool, gateway, config, data_dir))
    }

    /// Wire services over an already-open pool and gateway.
    pub fn from_parts(
        db_pool: DatabasePool,
        gateway: BoxChatGateway,
        config: PpssConfig,
        data_dir: PathBuf,
    ) -> Self {
        let gateway = Arc::new(gateway);
        let session_service =
            || SessionService::new(SqliteSessionRepository::new(db_pool.clone()));

        let chat = ChatService::new(
            session_service(),
            SqliteConversationRepository::new(db_pool.clone()),
            Arc::clone(&gateway),
        );
        let summaries = StageSummaryService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            SqliteStageSummaryRepository::new(db_pool.clone()),
            Arc::clone(&gateway),
        );
        let analysis = AnalysisService::new(
            session_service(),
            SqliteAnalysisRepository::new(db_pool.clone()),
            Arc::clone(&gateway),
        );
        let design = DesignService::new(session_service(), Arc::clone(&gateway));

        Self {
            sessions: Arc::new(session_service()),
            chat: Arc::new(chat),
            summaries: Arc::new(summaries),
            analysis: Arc::new(analysis),
            design: Arc::new(design),
            gateway,
            config: Arc::new(config),
            data_dir,
        }
    }
}
