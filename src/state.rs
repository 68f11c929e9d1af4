use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::session::Session;
use crate::vision::{OpenAiVision, VisionEstimator};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub vision: Arc<dyn VisionEstimator>,
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = crate::db::connect(&config.database_url).await?;

        let vision =
            Arc::new(OpenAiVision::new(config.vision.clone())?) as Arc<dyn VisionEstimator>;

        Ok(Self::from_parts(db, config, vision))
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        vision: Arc<dyn VisionEstimator>,
    ) -> Self {
        Self {
            db,
            config,
            vision,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Test state: migrated in-memory database plus whatever estimator
    /// the test scripts.
    pub async fn fake(vision: Arc<dyn VisionEstimator>) -> Self {
        use crate::config::VisionConfig;
        use sqlx::sqlite::SqlitePoolOptions;

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        crate::db::initialize(&db).await.expect("migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            vision: VisionConfig {
                api_key: "test".into(),
                base_url: "http://127.0.0.1:0".into(),
                model: "test-model".into(),
            },
        });

        Self::from_parts(db, config, vision)
    }
}
