// src/models/hierarchy.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// --- ENTIDADES (espelham o schema MySQL do POS) ---

// Um biller é a entidade de faturamento; pode ter zero ou mais warehouses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Biller {
    pub id: i64,
    pub name: String,
    pub company_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub pos_accnt_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub pos_accnt_id: i64,

    // Referência fraca: serve só para lookup, não há ownership no banco.
    pub biller_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub customer_group_id: Option<i64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,

    // Campos usados apenas pela classificação ad-hoc de segmentos.
    pub origin: Option<String>,
    pub member_no: Option<String>,
    pub village: Option<String>,
    pub sub_county: Option<String>,

    // Warehouse ao qual o cliente está atribuído (None = não ativado).
    pub assigned: Option<i64>,

    pub pos_accnt_id: i64,
}
