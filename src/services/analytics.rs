// src/services/analytics.rs

use std::collections::HashMap;

use rand::Rng;
use rust_decimal::Decimal;

use crate::models::{
    analytics::{
        CustomerSegmentation, RevenueBreakdown, RevenueBreakdownEntry, SegmentName,
        SegmentSummary, SmartActivationMetrics,
    },
    hierarchy::{Customer, Warehouse},
    sales::{Sale, TodaySaleEntry, TodaySaleReport},
};

// Meta fixa de ativação (stub herdado da fonte; não vem de histórico).
pub const ACTIVATION_TARGET_RATE: f64 = 0.75;

// Classifica um cliente em exatamente um segmento, por first-match:
// 1. origin contém "student" OU tem member_no  => Students
// 2. tem village OU sub_county                 => Villagers
// 3. caso contrário                            => Households
pub fn classify_customer(customer: &Customer) -> SegmentName {
    let is_student = customer
        .origin
        .as_deref()
        .map(|o| o.to_lowercase().contains("student"))
        .unwrap_or(false)
        || customer.member_no.as_deref().is_some_and(|m| !m.is_empty());

    if is_student {
        return SegmentName::Students;
    }

    let is_villager = customer.village.as_deref().is_some_and(|v| !v.is_empty())
        || customer.sub_county.as_deref().is_some_and(|s| !s.is_empty());

    if is_villager {
        SegmentName::Villagers
    } else {
        SegmentName::Households
    }
}

// Placeholder aleatório de growth rate. A fonte original gerava um número
// aleatório aqui em vez de calcular sobre histórico; mantido como stub
// explícito em vez de inventar uma fórmula.
fn placeholder_growth_rate() -> f64 {
    rand::thread_rng().gen_range(-5.0..15.0)
}

pub fn segment_customers(customers: &[Customer]) -> CustomerSegmentation {
    let mut counts: HashMap<SegmentName, usize> = HashMap::new();
    for customer in customers {
        *counts.entry(classify_customer(customer)).or_insert(0) += 1;
    }

    let segments = SegmentName::ALL
        .into_iter()
        .map(|segment| {
            let customer_count = counts.get(&segment).copied().unwrap_or(0);
            SegmentSummary {
                segment,
                customer_count,
                // A camada revisada nunca liga vendas a segmentos.
                revenue: Decimal::ZERO,
                loyalty_score: loyalty_score(customer_count),
                growth_rate: placeholder_growth_rate(),
            }
        })
        .collect();

    CustomerSegmentation {
        segments,
        total_customers: customers.len(),
    }
}

// Pontuação de fidelidade: count * 10, limitada a 100.
pub fn loyalty_score(customer_count: usize) -> u32 {
    ((customer_count as u32).saturating_mul(10)).min(100)
}

// Taxa de ativação: clientes com warehouse atribuído sobre o total,
// comparada com a meta fixa.
pub fn activation_metrics(customers: &[Customer]) -> SmartActivationMetrics {
    let total_customers = customers.len();
    let active_customers = customers.iter().filter(|c| c.assigned.is_some()).count();
    let activation_rate = if total_customers > 0 {
        active_customers as f64 / total_customers as f64
    } else {
        0.0
    };

    SmartActivationMetrics {
        active_customers,
        total_customers,
        activation_rate,
        target_rate: ACTIVATION_TARGET_RATE,
        on_target: activation_rate >= ACTIVATION_TARGET_RATE,
    }
}

// Agregado de vendas do dia por warehouse, com zero-fill: warehouse sem
// venda reporta total 0 e contagem 0, nunca fica ausente. O caller é
// responsável por já ter filtrado `sales` para a data corrente.
pub fn aggregate_today_sales(warehouses: &[Warehouse], sales: &[Sale]) -> TodaySaleReport {
    let entries: Vec<TodaySaleEntry> = warehouses
        .iter()
        .map(|warehouse| {
            let matching: Vec<&Sale> = sales
                .iter()
                .filter(|s| s.warehouse_id == Some(warehouse.id))
                .collect();

            let total_sales: Decimal = matching.iter().map(|s| s.grand_total).sum();
            let sale_count = matching.len() as i64;
            let average_sale = if sale_count > 0 {
                total_sales / Decimal::from(sale_count)
            } else {
                Decimal::ZERO
            };

            TodaySaleEntry {
                warehouse_id: warehouse.id,
                warehouse_name: warehouse.name.clone(),
                total_sales,
                sale_count,
                average_sale,
            }
        })
        .collect();

    let total_sale_amount = entries.iter().map(|e| e.total_sales).sum();

    TodaySaleReport {
        warehouses: entries,
        total_sale_amount,
    }
}

// Breakdown de receita por warehouse, derivado do agregado do dia.
pub fn revenue_breakdown(report: &TodaySaleReport) -> RevenueBreakdown {
    let entries: Vec<RevenueBreakdownEntry> = report
        .warehouses
        .iter()
        .map(|entry| RevenueBreakdownEntry {
            warehouse_id: entry.warehouse_id,
            warehouse_name: entry.warehouse_name.clone(),
            revenue: entry.total_sales,
            sale_count: entry.sale_count,
        })
        .collect();

    RevenueBreakdown {
        entries,
        total_revenue: report.total_sale_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(origin: Option<&str>, village: Option<&str>) -> Customer {
        Customer {
            origin: origin.map(String::from),
            village: village.map(String::from),
            ..Default::default()
        }
    }

    fn warehouse(id: i64, name: &str) -> Warehouse {
        Warehouse {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn sale(warehouse_id: i64, grand_total: i64) -> Sale {
        Sale {
            warehouse_id: Some(warehouse_id),
            grand_total: Decimal::from(grand_total),
            ..Default::default()
        }
    }

    #[test]
    fn cada_cliente_cai_em_exatamente_um_segmento() {
        let customers = vec![
            customer(Some("student"), None),
            customer(None, Some("X")),
            customer(None, None),
        ];

        let segmentation = segment_customers(&customers);
        let by_name: HashMap<SegmentName, usize> = segmentation
            .segments
            .iter()
            .map(|s| (s.segment, s.customer_count))
            .collect();

        assert_eq!(by_name[&SegmentName::Students], 1);
        assert_eq!(by_name[&SegmentName::Villagers], 1);
        assert_eq!(by_name[&SegmentName::Households], 1);

        let soma: usize = segmentation.segments.iter().map(|s| s.customer_count).sum();
        assert_eq!(soma, customers.len());
    }

    #[test]
    fn member_no_classifica_como_student_antes_de_village() {
        let c = Customer {
            member_no: Some("M-001".to_string()),
            village: Some("Bugema".to_string()),
            ..Default::default()
        };
        assert_eq!(classify_customer(&c), SegmentName::Students);
    }

    #[test]
    fn origin_student_e_case_insensitive() {
        let c = customer(Some("University STUDENT"), None);
        assert_eq!(classify_customer(&c), SegmentName::Students);
    }

    #[test]
    fn sub_county_sem_village_classifica_como_villager() {
        let c = Customer {
            sub_county: Some("Kyadondo".to_string()),
            ..Default::default()
        };
        assert_eq!(classify_customer(&c), SegmentName::Villagers);
    }

    #[test]
    fn loyalty_e_count_vezes_dez_limitado_a_cem() {
        assert_eq!(loyalty_score(0), 0);
        assert_eq!(loyalty_score(3), 30);
        assert_eq!(loyalty_score(10), 100);
        assert_eq!(loyalty_score(42), 100);
    }

    #[test]
    fn contagens_somam_o_tamanho_da_entrada() {
        let customers: Vec<Customer> = (0..17)
            .map(|i| match i % 3 {
                0 => customer(Some("student"), None),
                1 => customer(None, Some("Aldeia")),
                _ => customer(None, None),
            })
            .collect();

        let segmentation = segment_customers(&customers);
        let soma: usize = segmentation.segments.iter().map(|s| s.customer_count).sum();
        assert_eq!(soma, 17);
        assert_eq!(segmentation.total_customers, 17);
    }

    #[test]
    fn warehouse_sem_venda_reporta_zero_e_nao_fica_ausente() {
        let warehouses = vec![warehouse(1, "Central"), warehouse(2, "Norte")];
        let sales = vec![sale(1, 100)];

        let report = aggregate_today_sales(&warehouses, &sales);
        assert_eq!(report.warehouses.len(), 2);

        let w1 = report.warehouses.iter().find(|w| w.warehouse_id == 1).unwrap();
        assert_eq!(w1.total_sales, Decimal::from(100));
        assert_eq!(w1.sale_count, 1);

        let w2 = report.warehouses.iter().find(|w| w.warehouse_id == 2).unwrap();
        assert_eq!(w2.total_sales, Decimal::ZERO);
        assert_eq!(w2.sale_count, 0);
        assert_eq!(w2.average_sale, Decimal::ZERO);

        assert_eq!(report.total_sale_amount, Decimal::from(100));
    }

    #[test]
    fn ativacao_conta_clientes_com_warehouse_atribuido() {
        let mut ativo = Customer::default();
        ativo.assigned = Some(7);
        let inativo = Customer::default();

        let metrics = activation_metrics(&[ativo.clone(), ativo, inativo]);
        assert_eq!(metrics.active_customers, 2);
        assert_eq!(metrics.total_customers, 3);
        assert!((metrics.activation_rate - 2.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(metrics.target_rate, ACTIVATION_TARGET_RATE);
        assert!(!metrics.on_target);
    }

    #[test]
    fn ativacao_com_zero_clientes_nao_divide_por_zero() {
        let metrics = activation_metrics(&[]);
        assert_eq!(metrics.activation_rate, 0.0);
        assert!(!metrics.on_target);
    }

    #[test]
    fn breakdown_espelha_o_agregado_do_dia() {
        let warehouses = vec![warehouse(1, "Central"), warehouse(2, "Norte")];
        let sales = vec![sale(1, 60), sale(1, 40), sale(2, 25)];

        let report = aggregate_today_sales(&warehouses, &sales);
        let breakdown = revenue_breakdown(&report);

        assert_eq!(breakdown.entries.len(), 2);
        assert_eq!(breakdown.total_revenue, Decimal::from(125));
        let e1 = breakdown.entries.iter().find(|e| e.warehouse_id == 1).unwrap();
        assert_eq!(e1.revenue, Decimal::from(100));
        assert_eq!(e1.sale_count, 2);
    }
}
