// src/state.rs

use std::sync::{Arc, Mutex};

use crate::{
    cache::{DataInitializer, HierarchyData},
    common::error::AppError,
    models::{
        dashboard::DashboardBundle,
        filters::{DashboardFilters, DateRange, FilterSelection},
    },
};

// Máquina de estados de cada domínio de dados:
// Idle -> Loading -> { Ready, Error }; Ready/Error voltam a Loading no
// próximo gatilho de fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainState {
    Idle,
    Loading,
    Ready,
    Error(String),
}

// Ticket de um fetch em andamento. Carrega a geração no momento do
// disparo; um resultado cuja geração já foi superada é descartado em vez
// de sobrescrever estado mais novo.
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
    filters: DashboardFilters,
}

impl FetchTicket {
    pub fn filters(&self) -> DashboardFilters {
        self.filters
    }
}

struct ContextInner {
    selected_biller: FilterSelection,
    selected_warehouse: FilterSelection,
    date_range: Option<DateRange>,

    hierarchy_state: DomainState,
    dashboard_state: DomainState,
    analytics_state: DomainState,

    hierarchy: Option<HierarchyData>,
    bundle: Option<DashboardBundle>,

    dashboard_generation: u64,
    hierarchy_generation: u64,
}

// O provider de contexto: dono dos filtros selecionados e das flags de
// loading/erro por domínio. Espelha o provider do front — montar dispara
// o fetch de hierarquia, qualquer mudança de filtro dispara um novo
// fetch de dashboard.
pub struct DashboardContext {
    initializer: Arc<DataInitializer>,
    account_id: i64,
    inner: Mutex<ContextInner>,
}

impl DashboardContext {
    pub fn new(initializer: Arc<DataInitializer>, account_id: i64) -> Self {
        Self {
            initializer,
            account_id,
            inner: Mutex::new(ContextInner {
                selected_biller: FilterSelection::All,
                selected_warehouse: FilterSelection::All,
                date_range: None,
                hierarchy_state: DomainState::Idle,
                dashboard_state: DomainState::Idle,
                analytics_state: DomainState::Idle,
                hierarchy: None,
                bundle: None,
                dashboard_generation: 0,
                hierarchy_generation: 0,
            }),
        }
    }

    // Equivalente ao mount do provider: carrega hierarquia e o primeiro
    // bundle de dashboard.
    pub async fn mount(&self) {
        self.load_hierarchy().await;
        self.load_dashboard().await;
    }

    // --- FILTROS ---

    pub fn selected_filters(&self) -> DashboardFilters {
        let inner = self.inner.lock().unwrap();
        DashboardFilters {
            biller: inner.selected_biller,
            warehouse: inner.selected_warehouse,
            date_range: inner.date_range,
        }
    }

    // Trocar o biller reseta o warehouse para All no MESMO update —
    // regra de consistência pai-filho — e dispara um novo fetch.
    pub async fn set_biller(&self, biller: FilterSelection) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.selected_biller = biller;
            inner.selected_warehouse = FilterSelection::All;
        }
        self.load_dashboard().await;
    }

    pub async fn set_warehouse(&self, warehouse: FilterSelection) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.selected_warehouse = warehouse;
        }
        self.load_dashboard().await;
    }

    pub async fn set_date_range(&self, date_range: Option<DateRange>) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.date_range = date_range;
        }
        self.load_dashboard().await;
    }

    // --- FETCHES ---

    pub async fn load_hierarchy(&self) {
        let generation = {
            let mut inner = self.inner.lock().unwrap();
            inner.hierarchy_generation += 1;
            inner.hierarchy_state = DomainState::Loading;
            inner.hierarchy_generation
        };

        let result = self
            .initializer
            .initialize_hierarchy_data(self.account_id)
            .await;

        let mut inner = self.inner.lock().unwrap();
        if inner.hierarchy_generation != generation {
            tracing::debug!("Resultado de hierarquia superado; descartado");
            return;
        }
        match result {
            Ok(data) => {
                inner.hierarchy = Some(data);
                inner.hierarchy_state = DomainState::Ready;
            }
            Err(e) => {
                inner.hierarchy_state = DomainState::Error(e.to_string());
            }
        }
    }

    pub async fn load_dashboard(&self) {
        let ticket = self.begin_dashboard_fetch();
        let result = self
            .initializer
            .initialize_dashboard_data(self.account_id, ticket.filters())
            .await;
        self.apply_dashboard_result(ticket, result);
    }

    // Incrementa a geração, marca dashboard/analytics como Loading e
    // tira um snapshot dos filtros ativos.
    pub fn begin_dashboard_fetch(&self) -> FetchTicket {
        let mut inner = self.inner.lock().unwrap();
        inner.dashboard_generation += 1;
        inner.dashboard_state = DomainState::Loading;
        inner.analytics_state = DomainState::Loading;
        FetchTicket {
            generation: inner.dashboard_generation,
            filters: DashboardFilters {
                biller: inner.selected_biller,
                warehouse: inner.selected_warehouse,
                date_range: inner.date_range,
            },
        }
    }

    // Aplica o resultado somente se o ticket ainda é o mais recente.
    pub fn apply_dashboard_result(
        &self,
        ticket: FetchTicket,
        result: Result<DashboardBundle, AppError>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        if inner.dashboard_generation != ticket.generation {
            tracing::debug!("Resultado de dashboard superado; descartado");
            return;
        }
        match result {
            Ok(bundle) => {
                inner.bundle = Some(bundle);
                inner.dashboard_state = DomainState::Ready;
                inner.analytics_state = DomainState::Ready;
            }
            Err(e) => {
                let message = e.to_string();
                inner.dashboard_state = DomainState::Error(message.clone());
                inner.analytics_state = DomainState::Error(message);
            }
        }
    }

    // --- AÇÕES MANUAIS ---

    // Botão de refresh: limpa o cache e refaz os dois fetches.
    pub async fn refresh_data(&self) {
        self.initializer.clear_cache();
        self.load_hierarchy().await;
        self.load_dashboard().await;
    }

    pub fn clear_cache(&self) {
        self.initializer.clear_cache();
    }

    // --- LEITURA DE ESTADO ---

    pub fn hierarchy_state(&self) -> DomainState {
        self.inner.lock().unwrap().hierarchy_state.clone()
    }

    pub fn dashboard_state(&self) -> DomainState {
        self.inner.lock().unwrap().dashboard_state.clone()
    }

    pub fn analytics_state(&self) -> DomainState {
        self.inner.lock().unwrap().analytics_state.clone()
    }

    pub fn hierarchy(&self) -> Option<HierarchyData> {
        self.inner.lock().unwrap().hierarchy.clone()
    }

    pub fn bundle(&self) -> Option<DashboardBundle> {
        self.inner.lock().unwrap().bundle.clone()
    }
}
