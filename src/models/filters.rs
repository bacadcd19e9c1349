// src/models/filters.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Seleção de um filtro hierárquico: "todos" ou um id específico.
// Substitui as strings "all" / "1" / "2" do front por um tipo fechado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FilterSelection {
    All,
    Id(i64),
}

impl Default for FilterSelection {
    fn default() -> Self {
        FilterSelection::All
    }
}

impl FilterSelection {
    pub fn from_optional_id(id: Option<i64>) -> Self {
        match id {
            Some(id) => FilterSelection::Id(id),
            None => FilterSelection::All,
        }
    }

    pub fn as_optional_id(self) -> Option<i64> {
        match self {
            FilterSelection::All => None,
            FilterSelection::Id(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// O conjunto de filtros ativos do dashboard.
// Deriva Hash/Eq porque é a chave estruturada do cache — nada de
// serializar o objeto em string para usar como chave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardFilters {
    pub biller: FilterSelection,
    pub warehouse: FilterSelection,
    pub date_range: Option<DateRange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(filters: &DashboardFilters) -> u64 {
        let mut hasher = DefaultHasher::new();
        filters.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn filtros_distintos_geram_chaves_distintas() {
        let todos = DashboardFilters::default();
        let biller_1 = DashboardFilters {
            biller: FilterSelection::Id(1),
            ..Default::default()
        };

        assert_ne!(todos, biller_1);
        assert_ne!(hash_of(&todos), hash_of(&biller_1));
    }

    #[test]
    fn mesmos_filtros_geram_a_mesma_chave() {
        let a = DashboardFilters {
            biller: FilterSelection::Id(3),
            warehouse: FilterSelection::All,
            date_range: None,
        };
        let b = a;
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}
