// src/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::{
    common::error::AppError,
    db::DataSource,
    models::{
        dashboard::DashboardBundle,
        filters::DashboardFilters,
        hierarchy::{Biller, Customer, Warehouse},
        sales::TodaySaleReport,
    },
    services::analytics,
};

// --- RELÓGIO INJETÁVEL ---

// O cache decide staleness por um relógio injetado, não por Utc::now()
// espalhado pelo código. Os testes usam o ManualClock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// Relógio controlado manualmente, para testes de TTL.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// --- CACHE ---

// Chave estruturada: account + filtros ativos. Nada de serializar o
// objeto de filtros em string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub account_id: i64,
    pub filters: DashboardFilters,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    bundle: DashboardBundle,
    inserted_at: DateTime<Utc>,
}

const DEFAULT_TTL_SECS: i64 = 300;
const DEFAULT_MAX_ENTRIES: usize = 64;

// Cache em memória, de posse de uma instância (nenhum static global),
// com TTL e limite de entradas. Ao atingir o limite, a entrada mais
// antiga é descartada.
struct DataCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl DataCache {
    fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries,
        }
    }

    fn get_fresh(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<DashboardBundle> {
        let entry = self.entries.get(key)?;
        if now - entry.inserted_at <= self.ttl {
            Some(entry.bundle.clone())
        } else {
            None
        }
    }

    fn insert(&mut self, key: CacheKey, bundle: DashboardBundle, now: DateTime<Utc>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| *k)
            {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                bundle,
                inserted_at: now,
            },
        );
    }

    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

// --- DADOS DE HIERARQUIA ---

// Resultado do fetch paralelo de hierarquia, com os dois índices
// derivados: warehouses agrupados por biller e clientes por warehouse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyData {
    pub billers: Vec<Biller>,
    pub warehouses: Vec<Warehouse>,
    pub customers: Vec<Customer>,
    pub warehouses_by_biller: HashMap<i64, Vec<Warehouse>>,
    pub customers_by_warehouse: HashMap<i64, Vec<Customer>>,
}

// Snapshot entregue aos callbacks do re-sync periódico.
#[derive(Debug, Clone)]
pub struct SyncSnapshot {
    pub customers: Vec<Customer>,
    pub today_sale: TodaySaleReport,
}

pub type SyncCallback = Box<dyn Fn(&SyncSnapshot) + Send + Sync>;

// --- INITIALIZER ---

// Orquestra os fetches paralelos e memoiza o bundle do dashboard pela
// chave de filtros. Um hit fresco devolve o bundle cacheado tal e qual;
// uma falha em qualquer ramo do fan-out descarta o domínio inteiro
// (sem resultado parcial).
pub struct DataInitializer {
    source: Arc<dyn DataSource>,
    clock: Arc<dyn Clock>,
    cache: Mutex<DataCache>,
}

impl DataInitializer {
    pub fn new(source: Arc<dyn DataSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_cache_policy(
            source,
            clock,
            Duration::seconds(DEFAULT_TTL_SECS),
            DEFAULT_MAX_ENTRIES,
        )
    }

    pub fn with_cache_policy(
        source: Arc<dyn DataSource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        max_entries: usize,
    ) -> Self {
        Self {
            source,
            clock,
            cache: Mutex::new(DataCache::new(ttl, max_entries)),
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    // Busca billers, warehouses e clientes em paralelo e monta os
    // índices derivados. Hierarquia não é cacheada — o front guarda o
    // resultado no estado do provider.
    pub async fn initialize_hierarchy_data(
        &self,
        account_id: i64,
    ) -> Result<HierarchyData, AppError> {
        let (billers, warehouses, customers) = tokio::try_join!(
            self.source.get_billers(account_id),
            self.source.get_warehouses(account_id),
            self.source.get_customers(account_id),
        )?;

        let mut warehouses_by_biller: HashMap<i64, Vec<Warehouse>> = HashMap::new();
        for warehouse in &warehouses {
            if let Some(biller_id) = warehouse.biller_id {
                warehouses_by_biller
                    .entry(biller_id)
                    .or_default()
                    .push(warehouse.clone());
            }
        }

        let mut customers_by_warehouse: HashMap<i64, Vec<Customer>> = HashMap::new();
        for customer in &customers {
            if let Some(warehouse_id) = customer.assigned {
                customers_by_warehouse
                    .entry(warehouse_id)
                    .or_default()
                    .push(customer.clone());
            }
        }

        Ok(HierarchyData {
            billers,
            warehouses,
            customers,
            warehouses_by_biller,
            customers_by_warehouse,
        })
    }

    // Busca o bundle do dashboard (agregado + analytics derivados),
    // memoizado pela chave { account, filtros }.
    pub async fn initialize_dashboard_data(
        &self,
        account_id: i64,
        filters: DashboardFilters,
    ) -> Result<DashboardBundle, AppError> {
        let key = CacheKey {
            account_id,
            filters,
        };

        // Lock curto: nunca seguramos o mutex através de um await.
        {
            let cache = self.cache.lock().unwrap();
            if let Some(bundle) = cache.get_fresh(&key, self.clock.now()) {
                tracing::debug!("Cache hit para {:?}", key.filters);
                return Ok(bundle);
            }
        }

        let (dashboard, customers, today_sale) = tokio::try_join!(
            self.source.get_dashboard_data(account_id, &filters),
            self.source.get_customers(account_id),
            self.source.get_today_sale(account_id),
        )?;

        let bundle = DashboardBundle {
            dashboard,
            activation: analytics::activation_metrics(&customers),
            segmentation: analytics::segment_customers(&customers),
            revenue_breakdown: analytics::revenue_breakdown(&today_sale),
            today_sale,
        };

        let mut cache = self.cache.lock().unwrap();
        cache.insert(key, bundle.clone(), self.clock.now());

        Ok(bundle)
    }

    // Remove só a chave correspondente e refaz o fetch.
    pub async fn refresh_data(
        &self,
        account_id: i64,
        filters: DashboardFilters,
    ) -> Result<DashboardBundle, AppError> {
        let key = CacheKey {
            account_id,
            filters,
        };
        self.cache.lock().unwrap().remove(&key);
        self.initialize_dashboard_data(account_id, filters).await
    }

    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    // Re-sync periódico: re-puxa vendas/clientes num intervalo fixo e
    // invoca os callbacks registrados. Roda independente dos fetches
    // disparados pelo usuário; falha é logada e o loop continua.
    pub fn spawn_periodic_sync(
        self: Arc<Self>,
        account_id: i64,
        period: std::time::Duration,
        callbacks: Vec<SyncCallback>,
    ) -> tokio::task::JoinHandle<()> {
        let initializer = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // O primeiro tick dispara imediatamente; pulamos ele.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let result = tokio::try_join!(
                    initializer.source.get_customers(account_id),
                    initializer.source.get_today_sale(account_id),
                );
                match result {
                    Ok((customers, today_sale)) => {
                        let snapshot = SyncSnapshot {
                            customers,
                            today_sale,
                        };
                        for callback in &callbacks {
                            callback(&snapshot);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Re-sync periódico falhou: {}", e);
                    }
                }
            }
        })
    }
}
