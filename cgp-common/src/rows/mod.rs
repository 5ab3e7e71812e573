//! Remote table rows
//!
//! The remote store keeps snake_case columns (with Portuguese names); the
//! models use camelCase English fields. Each entity gets a row type that
//! decodes a stored row and helpers that encode the insert/update payloads.
//! Payloads never carry `id`: the store generates it.

pub mod lenient;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;

use crate::models::{
    ActivityKind, ActivityLog, BonusTier, CommissionKind, CommissionRate, Course, CourseStatus,
    GlobalGoal, GoalPeriod, Instructor, Lead, LeadStatus, Notification, NotificationKind, Seller,
};
use crate::Result;

/// Collections held by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Leads,
    Courses,
    Sellers,
    Instructors,
    CommissionRates,
    GlobalGoals,
    Notifications,
    ActivityLogs,
}

impl Table {
    pub const ALL: [Table; 8] = [
        Table::Leads,
        Table::Courses,
        Table::Sellers,
        Table::Instructors,
        Table::CommissionRates,
        Table::GlobalGoals,
        Table::Notifications,
        Table::ActivityLogs,
    ];

    /// Table name in the remote store
    pub fn name(&self) -> &'static str {
        match self {
            Table::Leads => "leads",
            Table::Courses => "cursos",
            Table::Sellers => "vendedoras",
            Table::Instructors => "professores",
            Table::CommissionRates => "taxas_comissao",
            Table::GlobalGoals => "metas_globais",
            Table::Notifications => "notificacoes",
            Table::ActivityLogs => "activity_logs",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decode a stored row into its row type
pub fn decode<T: for<'de> Deserialize<'de>>(row: Value) -> Result<T> {
    Ok(serde_json::from_value(row)?)
}

/// Whether `id` was generated by the remote store
///
/// Fixture records use short ids (`l1`, `c1`) and only live in memory; only
/// UUID ids are addressed in remote writes.
pub fn is_store_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

// ========================================
// Leads
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct LeadRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "empresa", default)]
    pub organization: String,
    #[serde(rename = "cargo", default)]
    pub role: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "estado", default)]
    pub state: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(rename = "interesse", default)]
    pub interest: Option<String>,
    pub status: LeadStatus,
    #[serde(rename = "valor_potencial", default, deserialize_with = "lenient::number")]
    pub standard_value: f64,
    #[serde(rename = "valor_negociado", default, deserialize_with = "lenient::opt_number")]
    pub negotiated_value: Option<f64>,
    #[serde(rename = "quantidade_inscricoes", default, deserialize_with = "lenient::opt_count")]
    pub quantity: Option<u32>,
    #[serde(rename = "curso_id", default, deserialize_with = "lenient::opt_id")]
    pub course_id: Option<String>,
    #[serde(rename = "responsavel_id", default, deserialize_with = "lenient::opt_id")]
    pub owner_id: Option<String>,
    #[serde(rename = "motivo_perda", default)]
    pub loss_reason: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    #[serde(rename = "data_cadastro", deserialize_with = "lenient::date")]
    pub created_on: NaiveDate,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Lead {
            id: row.id,
            name: row.name,
            organization: row.organization,
            role: row.role,
            city: row.city,
            state: row.state,
            email: row.email.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            interest: row.interest.unwrap_or_default(),
            status: row.status,
            standard_value: row.standard_value,
            // A stored zero means "not negotiated yet"
            negotiated_value: row.negotiated_value.filter(|v| *v != 0.0),
            quantity: row.quantity,
            course_id: row.course_id,
            owner_id: row.owner_id.unwrap_or_default(),
            created_on: row.created_on,
            notes: row.notes,
            loss_reason: row.loss_reason,
        }
    }
}

pub fn lead_insert(lead: &Lead) -> Value {
    json!({
        "nome": lead.name,
        "empresa": lead.organization,
        "cargo": lead.role,
        "cidade": lead.city,
        "estado": lead.state,
        "email": lead.email,
        "telefone": lead.phone,
        "interesse": lead.interest,
        "status": lead.status.as_wire(),
        "valor_potencial": lead.standard_value,
        "valor_negociado": lead.negotiated_value,
        "quantidade_inscricoes": lead.quantity,
        "curso_id": lead.course_id,
        "responsavel_id": lead.owner_id,
        "observacoes": lead.notes,
        "data_cadastro": lead.created_on.format("%Y-%m-%d").to_string(),
    })
}

/// Only the pipeline-editable columns are written back on update
pub fn lead_update(lead: &Lead) -> Value {
    json!({
        "status": lead.status.as_wire(),
        "valor_negociado": lead.negotiated_value,
        "motivo_perda": lead.loss_reason,
    })
}

// ========================================
// Courses
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "tema")]
    pub title: String,
    #[serde(rename = "professor_id", default, deserialize_with = "lenient::opt_id")]
    pub instructor_id: Option<String>,
    #[serde(rename = "cidade", default)]
    pub city: Option<String>,
    #[serde(rename = "estado", default)]
    pub state: Option<String>,
    #[serde(rename = "data_inicio", deserialize_with = "lenient::date")]
    pub start_date: NaiveDate,
    #[serde(rename = "data_fim", deserialize_with = "lenient::date")]
    pub end_date: NaiveDate,
    #[serde(rename = "carga_horaria", default, deserialize_with = "lenient::count")]
    pub workload_hours: u32,
    #[serde(rename = "valor_inscricao", default, deserialize_with = "lenient::number")]
    pub seat_price: f64,
    #[serde(rename = "meta_faturamento", default, deserialize_with = "lenient::number")]
    pub revenue_target: f64,
    #[serde(rename = "faturamento_atual", default, deserialize_with = "lenient::number")]
    pub revenue_to_date: f64,
    #[serde(rename = "inscritos", default, deserialize_with = "lenient::count")]
    pub enrolled: u32,
    pub status: CourseStatus,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            title: row.title,
            instructor_id: row.instructor_id.unwrap_or_default(),
            city: row.city.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            start_date: row.start_date,
            end_date: row.end_date,
            workload_hours: row.workload_hours,
            seat_price: row.seat_price,
            revenue_target: row.revenue_target,
            revenue_to_date: row.revenue_to_date,
            status: row.status,
            notes: row.notes,
            enrolled: row.enrolled,
        }
    }
}

/// Insert and update share one payload; revenue and enrollment counters are
/// maintained by the store
pub fn course_payload(course: &Course) -> Value {
    json!({
        "tema": course.title,
        "professor_id": course.instructor_id,
        "cidade": course.city,
        "estado": course.state,
        "data_inicio": course.start_date.format("%Y-%m-%d").to_string(),
        "data_fim": course.end_date.format("%Y-%m-%d").to_string(),
        "carga_horaria": course.workload_hours,
        "valor_inscricao": course.seat_price,
        "meta_faturamento": course.revenue_target,
        "status": course.status.as_wire(),
        "observacoes": course.notes,
    })
}

// ========================================
// People
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct InstructorRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especialidade", default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl From<InstructorRow> for Instructor {
    fn from(row: InstructorRow) -> Self {
        Instructor {
            id: row.id,
            name: row.name,
            specialty: row.specialty.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            linkedin: row.linkedin,
            instagram: row.instagram,
            bio: row.bio,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SellerRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "vendas_totais", default, deserialize_with = "lenient::number")]
    pub total_sales: f64,
    #[serde(rename = "meta_individual", default, deserialize_with = "lenient::number")]
    pub individual_goal: f64,
    #[serde(rename = "meta_mensal", default, deserialize_with = "lenient::number")]
    pub monthly_goal: f64,
    #[serde(rename = "meta_trimestral", default, deserialize_with = "lenient::number")]
    pub quarterly_goal: f64,
    #[serde(rename = "meta_anual", default, deserialize_with = "lenient::number")]
    pub annual_goal: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub performance: f64,
}

impl From<SellerRow> for Seller {
    fn from(row: SellerRow) -> Self {
        Seller {
            id: row.id,
            name: row.name,
            total_sales: row.total_sales,
            individual_goal: row.individual_goal,
            monthly_goal: row.monthly_goal,
            quarterly_goal: row.quarterly_goal,
            annual_goal: row.annual_goal,
            avatar: row.avatar.unwrap_or_default(),
            performance: row.performance,
        }
    }
}

// ========================================
// Commission rates and goal
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "taxa", default, deserialize_with = "lenient::number")]
    pub rate: f64,
    #[serde(rename = "tipo")]
    pub kind: CommissionKind,
    #[serde(rename = "vendedor_id", deserialize_with = "lenient::id")]
    pub seller_id: String,
    #[serde(rename = "curso_id", deserialize_with = "lenient::id")]
    pub course_id: String,
    #[serde(rename = "mes_aplicacao", default)]
    pub month: Option<String>,
}

impl From<CommissionRow> for CommissionRate {
    fn from(row: CommissionRow) -> Self {
        CommissionRate {
            id: row.id,
            rate: row.rate,
            seller_id: row.seller_id,
            course_id: row.course_id,
            kind: row.kind,
            month: row.month.filter(|m| !m.trim().is_empty()),
        }
    }
}

pub fn commission_insert(rate: &CommissionRate) -> Value {
    json!({
        "taxa": rate.rate,
        "tipo": rate.kind.as_wire(),
        "vendedor_id": rate.seller_id,
        "curso_id": rate.course_id,
        "mes_aplicacao": rate.month,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalRow {
    #[serde(rename = "periodo", default)]
    pub period: Option<GoalPeriod>,
    #[serde(rename = "valor_meta", default, deserialize_with = "lenient::number")]
    pub target_revenue: f64,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "bonus_1_perc", default, deserialize_with = "lenient::number")]
    pub bonus_1_percent: f64,
    #[serde(rename = "bonus_2_perc", default, deserialize_with = "lenient::number")]
    pub bonus_2_percent: f64,
    #[serde(rename = "bonus_3_perc", default, deserialize_with = "lenient::number")]
    pub bonus_3_percent: f64,
    #[serde(rename = "bonus_valor_1", default, deserialize_with = "lenient::number")]
    pub bonus_1_amount: f64,
    #[serde(rename = "bonus_valor_2", default, deserialize_with = "lenient::number")]
    pub bonus_2_amount: f64,
    #[serde(rename = "bonus_valor_3", default, deserialize_with = "lenient::number")]
    pub bonus_3_amount: f64,
}

impl From<GoalRow> for GlobalGoal {
    fn from(row: GoalRow) -> Self {
        GlobalGoal {
            period: row.period.unwrap_or_default(),
            target_revenue: row.target_revenue,
            description: row.description,
            tiers: [
                BonusTier { threshold_percent: row.bonus_1_percent, amount: row.bonus_1_amount },
                BonusTier { threshold_percent: row.bonus_2_percent, amount: row.bonus_2_amount },
                BonusTier { threshold_percent: row.bonus_3_percent, amount: row.bonus_3_amount },
            ],
        }
    }
}

pub fn goal_update(goal: &GlobalGoal) -> Value {
    let [t1, t2, t3] = goal.tiers;
    json!({
        "periodo": goal.period,
        "valor_meta": goal.target_revenue,
        "descricao": goal.description,
        "bonus_1_perc": t1.threshold_percent,
        "bonus_2_perc": t2.threshold_percent,
        "bonus_3_perc": t3.threshold_percent,
        "bonus_valor_1": t1.amount,
        "bonus_valor_2": t2.amount,
        "bonus_valor_3": t3.amount,
    })
}

// ========================================
// Notifications and activity log
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "mensagem", default)]
    pub message: String,
    #[serde(rename = "tipo")]
    pub kind: NotificationKind,
    #[serde(rename = "data", deserialize_with = "lenient::timestamp")]
    pub date: DateTime<Utc>,
    #[serde(rename = "lida", default)]
    pub read: bool,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            title: row.title,
            message: row.message,
            kind: row.kind,
            date: row.date,
            read: row.read,
        }
    }
}

pub fn notification_insert(n: &Notification) -> Value {
    json!({
        "titulo": n.title,
        "mensagem": n.message,
        "tipo": n.kind,
        "data": n.date.to_rfc3339(),
        "lida": false,
    })
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityRow {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub author: String,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityLog {
    fn from(row: ActivityRow) -> Self {
        ActivityLog {
            id: row.id,
            kind: row.kind,
            message: row.message,
            details: row.details,
            author: row.author,
            timestamp: row.timestamp,
        }
    }
}

pub fn activity_insert(log: &ActivityLog) -> Value {
    json!({
        "type": log.kind.as_wire(),
        "message": log.message,
        "details": log.details,
        "author": log.author,
        "timestamp": log.timestamp.to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_ids() {
        assert!(is_store_id("0b7e0c8e-4a43-4a51-9a57-2f4f1d3c1d10"));
        assert!(!is_store_id("l1"));
        assert!(!is_store_id(""));
    }

    #[test]
    fn test_lead_row_decoding() {
        let row = json!({
            "id": "0b7e0c8e-4a43-4a51-9a57-2f4f1d3c1d10",
            "nome": "Carlos Silva",
            "empresa": "Prefeitura de Osasco",
            "email": "carlos@osasco.sp.gov.br",
            "telefone": "11999999999",
            "interesse": "Nova Lei de Licitações",
            "status": "Proposta Enviada",
            "valor_potencial": "30000.00",
            "valor_negociado": 0,
            "quantidade_inscricoes": 12,
            "curso_id": null,
            "responsavel_id": "v5",
            "data_cadastro": "2026-10-01"
        });
        let lead: Lead = decode::<LeadRow>(row).unwrap().into();
        assert_eq!(lead.organization, "Prefeitura de Osasco");
        assert_eq!(lead.standard_value, 30000.0);
        assert_eq!(lead.negotiated_value, None);
        assert_eq!(lead.quantity, Some(12));
        assert_eq!(lead.course_id, None);
        assert_eq!(lead.status, LeadStatus::ProposalSent);
    }

    #[test]
    fn test_lead_update_only_carries_pipeline_columns() {
        let lead = crate::fixtures::leads().remove(4);
        let patch = lead_update(&lead);
        let keys: Vec<&String> = patch.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(patch["status"], "Declinado");
        assert_eq!(patch["motivo_perda"], "Sem orçamento para este exercício.");
    }

    #[test]
    fn test_course_row_decoding_with_numeric_strings() {
        let row = json!({
            "id": 42,
            "tema": "Auditoria e Controle Interno",
            "professor_id": 3,
            "cidade": "Brasília",
            "estado": "DF",
            "data_inicio": "2026-12-01",
            "data_fim": "2026-12-03",
            "carga_horaria": 16,
            "valor_inscricao": "3000",
            "meta_faturamento": 150000,
            "faturamento_atual": null,
            "inscritos": null,
            "status": "Agendado"
        });
        let course: Course = decode::<CourseRow>(row).unwrap().into();
        assert_eq!(course.id, "42");
        assert_eq!(course.instructor_id, "3");
        assert_eq!(course.seat_price, 3000.0);
        assert_eq!(course.revenue_to_date, 0.0);
        assert_eq!(course.enrolled, 0);
    }

    #[test]
    fn test_course_payload_omits_store_maintained_counters() {
        let course = crate::fixtures::courses().remove(0);
        let payload = course_payload(&course);
        assert!(payload.get("faturamento_atual").is_none());
        assert!(payload.get("inscritos").is_none());
        assert!(payload.get("id").is_none());
        assert_eq!(payload["status"], "Concluído");
    }

    #[test]
    fn test_goal_row_to_model_and_back() {
        let row = json!({
            "id": "g1",
            "periodo": "Anual",
            "valor_meta": 2000000,
            "bonus_1_perc": 100,
            "bonus_2_perc": 120,
            "bonus_3_perc": 150,
            "bonus_valor_1": 1000,
            "bonus_valor_2": 2500,
            "bonus_valor_3": 5000
        });
        let goal: GlobalGoal = decode::<GoalRow>(row).unwrap().into();
        assert_eq!(goal.tiers[2].amount, 5000.0);

        let patch = goal_update(&goal);
        assert_eq!(patch["valor_meta"], 2000000.0);
        assert_eq!(patch["periodo"], "Anual");
    }

    #[test]
    fn test_activity_row_uses_type_column() {
        let row = json!({
            "id": 3,
            "type": "warning",
            "message": "Opportunity lost",
            "details": "Lead declined.",
            "author": "Elaine",
            "timestamp": "2026-10-03T10:00:00+00:00"
        });
        let log: ActivityLog = decode::<ActivityRow>(row).unwrap().into();
        assert_eq!(log.kind, ActivityKind::Warning);

        let payload = activity_insert(&log);
        assert_eq!(payload["type"], "warning");
        assert!(payload.get("id").is_none());
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Courses.name(), "cursos");
        assert_eq!(Table::CommissionRates.to_string(), "taxas_comissao");
        assert_eq!(Table::ALL.len(), 8);
    }
}
