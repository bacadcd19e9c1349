// src/models/analytics.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- SEGMENTAÇÃO DE CLIENTES ---

// Cada cliente cai em exatamente um segmento (regra first-match).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SegmentName {
    Students,
    Villagers,
    Households,
}

impl SegmentName {
    pub const ALL: [SegmentName; 3] = [
        SegmentName::Students,
        SegmentName::Villagers,
        SegmentName::Households,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub segment: SegmentName,
    pub customer_count: usize,

    // A camada original nunca liga vendas a segmentos; mantido zerado.
    pub revenue: Decimal,

    // min(count * 10, 100)
    pub loyalty_score: u32,

    // Placeholder aleatório herdado da fonte — não há cálculo histórico.
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSegmentation {
    pub segments: Vec<SegmentSummary>,
    pub total_customers: usize,
}

// --- SMART ACTIVATION ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmartActivationMetrics {
    pub active_customers: usize,
    pub total_customers: usize,

    // Fração de clientes com warehouse atribuído (0.0 a 1.0).
    pub activation_rate: f64,

    // Meta fixa (stub documentado, não vem de configuração nem de histórico).
    pub target_rate: f64,
    pub on_target: bool,
}

// --- REVENUE BREAKDOWN ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBreakdownEntry {
    pub warehouse_id: i64,
    pub warehouse_name: String,
    pub revenue: Decimal,
    pub sale_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBreakdown {
    pub entries: Vec<RevenueBreakdownEntry>,
    pub total_revenue: Decimal,
}
