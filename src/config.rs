// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Duration as ChronoDuration;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};

use crate::{
    cache::{DataInitializer, SystemClock},
    db::{DataSource, MockDataSource, RemoteDataSource, SqlDataSource},
    services::DashboardService,
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub initializer: Arc<DataInitializer>,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o gráfico de
    // dependências: fonte de dados -> serviço -> initializer/cache.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // A fonte é escolhida por configuração, não por call sites
        // separados: sql (default) | mock | remote.
        let source_kind = env::var("DATA_SOURCE").unwrap_or_else(|_| "sql".to_string());
        let source: Arc<dyn DataSource> = match source_kind.as_str() {
            "mock" => {
                tracing::warn!("⚠️ Usando DATA_SOURCE=mock (dados de fixture em memória)");
                Arc::new(MockDataSource::new())
            }
            "remote" => {
                let base_url = env::var("API_BASE_URL")
                    .context("API_BASE_URL deve ser definida para DATA_SOURCE=remote")?;
                tracing::info!("Usando backend remoto em {}", base_url);
                Arc::new(RemoteDataSource::new(base_url))
            }
            "sql" => Arc::new(SqlDataSource::new(Self::connect_pool().await?)),
            other => anyhow::bail!("DATA_SOURCE inválida: {other} (use sql, mock ou remote)"),
        };

        let cache_ttl = env_i64("CACHE_TTL_SECS", 300)?;
        let cache_max = env_i64("CACHE_MAX_ENTRIES", 64)? as usize;

        let initializer = Arc::new(DataInitializer::with_cache_policy(
            Arc::clone(&source),
            Arc::new(SystemClock),
            ChronoDuration::seconds(cache_ttl),
            cache_max,
        ));

        Ok(Self {
            dashboard_service: DashboardService::new(source),
            initializer,
        })
    }

    // Conecta ao MySQL a partir das variáveis discretas de ambiente.
    async fn connect_pool() -> anyhow::Result<sqlx::MySqlPool> {
        let host = env::var("DB_HOST").context("DB_HOST deve ser definida")?;
        let port: u16 = env::var("DB_PORT")
            .unwrap_or_else(|_| "3306".to_string())
            .parse()
            .context("DB_PORT deve ser um número de porta válido")?;
        let database = env::var("DB_NAME").context("DB_NAME deve ser definida")?;
        let user = env::var("DB_USER").context("DB_USER deve ser definida")?;
        let password = env::var("DB_PASSWORD").context("DB_PASSWORD deve ser definida")?;

        let options = MySqlConnectOptions::new()
            .host(&host)
            .port(port)
            .database(&database)
            .username(&user)
            .password(&password);

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(pool)
    }
}

fn env_i64(name: &str, default: i64) -> anyhow::Result<i64> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{name} deve ser um inteiro")),
        Err(_) => Ok(default),
    }
}
