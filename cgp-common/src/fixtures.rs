//! Built-in sample data
//!
//! Used when no remote store is configured, and as the initial state until
//! the first successful load.

use chrono::{NaiveDate, Utc};

use crate::models::{
    BonusTier, CommissionKind, CommissionRate, Course, CourseStatus, GlobalGoal, GoalPeriod,
    Instructor, Lead, LeadStatus, Notification, NotificationKind, Seller, SCOPE_ALL,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Brazilian federative units, for form pickers and validation
pub const BRAZIL_STATES: [&str; 27] = [
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB", "PR",
    "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];

pub fn instructors() -> Vec<Instructor> {
    let instructor = |id: &str, name: &str, specialty: &str, email: &str| Instructor {
        id: id.to_string(),
        name: name.to_string(),
        specialty: specialty.to_string(),
        email: email.to_string(),
        linkedin: None,
        instagram: None,
        bio: None,
    };

    vec![
        instructor("1", "Dr. Cláudio Santos", "Direito Administrativo", "claudio@cgp.com.br"),
        instructor("2", "Mestra Ana Paula", "Gestão de Pessoas", "ana@cgp.com.br"),
        instructor("3", "Prof. Roberto Lima", "Finanças Públicas", "roberto@cgp.com.br"),
        instructor("4", "Dra. Carla Mendes", "Licitações", "carla@cgp.com.br"),
        instructor("5", "Prof. João Silva", "Contabilidade", "joao@cgp.com.br"),
    ]
}

pub fn sellers() -> Vec<Seller> {
    let seller = |id: &str, name: &str, sales: f64, goals: (f64, f64, f64), performance: f64| {
        Seller {
            id: id.to_string(),
            name: name.to_string(),
            total_sales: sales,
            individual_goal: 120_000.0,
            monthly_goal: goals.0,
            quarterly_goal: goals.1,
            annual_goal: goals.2,
            avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", name),
            performance,
        }
    };
    let standard = (15_000.0, 45_000.0, 180_000.0);
    let senior = (37_500.0, 112_500.0, 450_000.0);

    vec![
        seller("v1", "Ana", 154_000.0, standard, 128.0),
        seller("v2", "Andreia", 98_000.0, senior, 81.0),
        seller("v3", "Ariane", 132_000.0, standard, 110.0),
        seller("v4", "Elaine", 110_000.0, senior, 91.0),
        seller("v5", "Elis", 180_000.0, standard, 150.0),
        seller("v6", "Halana", 85_000.0, standard, 70.0),
        seller("v7", "Larissa", 125_000.0, standard, 104.0),
        seller("v8", "Najara", 145_000.0, standard, 120.0),
        seller("v9", "Viviane", 165_000.0, (20_000.0, 60_000.0, 240_000.0), 137.0),
    ]
}

pub fn commission_rates() -> Vec<CommissionRate> {
    let rate = |id: &str, value: f64, seller: &str, course: &str, kind| CommissionRate {
        id: id.to_string(),
        rate: value,
        seller_id: seller.to_string(),
        course_id: course.to_string(),
        kind,
        month: None,
    };

    vec![
        rate("tx1", 5.0, SCOPE_ALL, SCOPE_ALL, CommissionKind::Standard),
        rate("tx2", 7.0, "v1", SCOPE_ALL, CommissionKind::Specific),
        rate("tx3", 10.0, SCOPE_ALL, "c1", CommissionKind::Specific),
    ]
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    title: &str,
    instructor_id: &str,
    city: &str,
    state: &str,
    start: NaiveDate,
    end: NaiveDate,
    hours: u32,
    seat_price: f64,
    target: f64,
    to_date: f64,
    status: CourseStatus,
    enrolled: u32,
) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        instructor_id: instructor_id.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        start_date: start,
        end_date: end,
        workload_hours: hours,
        seat_price,
        revenue_target: target,
        revenue_to_date: to_date,
        status,
        notes: None,
        enrolled,
    }
}

pub fn courses() -> Vec<Course> {
    use CourseStatus::*;

    vec![
        course("c1", "Nova Lei de Licitações 14.133", "1", "São Paulo", "SP",
            date(2026, 10, 10), date(2026, 10, 12), 20, 2500.0, 100_000.0, 112_500.0, Completed, 45),
        course("c2", "Gestão Ágil no Setor Público", "2", "Rio de Janeiro", "RJ",
            date(2026, 11, 5), date(2026, 11, 7), 24, 2800.0, 80_000.0, 65_000.0, InProgress, 23),
        course("c3", "Auditoria e Controle Interno", "3", "Brasília", "DF",
            date(2026, 12, 1), date(2026, 12, 3), 16, 3000.0, 150_000.0, 155_000.0, Scheduled, 52),
        course("c4", "Contratos Administrativos", "1", "Salvador", "BA",
            date(2026, 9, 15), date(2026, 9, 17), 20, 2200.0, 90_000.0, 95_000.0, Completed, 43),
        course("c5", "Liderança para Gestores Públicos", "2", "Belo Horizonte", "MG",
            date(2026, 11, 20), date(2026, 11, 22), 20, 2400.0, 85_000.0, 32_000.0, Scheduled, 13),
        course("c6", "Gestão de Projetos Públicos", "2", "Curitiba", "PR",
            date(2026, 11, 25), date(2026, 11, 27), 16, 2000.0, 60_000.0, 58_000.0, Scheduled, 29),
        course("c7", "Compliance no Setor Público", "3", "Recife", "PE",
            date(2026, 10, 1), date(2026, 10, 3), 24, 3000.0, 120_000.0, 130_000.0, Completed, 44),
    ]
}

struct LeadSeed<'a> {
    id: &'a str,
    name: &'a str,
    organization: &'a str,
    role: &'a str,
    city: &'a str,
    state: &'a str,
    email: &'a str,
    phone: &'a str,
    interest: &'a str,
    status: LeadStatus,
    standard: f64,
    negotiated: f64,
    quantity: u32,
    course_id: &'a str,
    owner_id: &'a str,
    created_on: NaiveDate,
    loss_reason: Option<&'a str>,
}

impl From<LeadSeed<'_>> for Lead {
    fn from(s: LeadSeed<'_>) -> Self {
        Lead {
            id: s.id.to_string(),
            name: s.name.to_string(),
            organization: s.organization.to_string(),
            role: Some(s.role.to_string()),
            city: Some(s.city.to_string()),
            state: Some(s.state.to_string()),
            email: s.email.to_string(),
            phone: s.phone.to_string(),
            interest: s.interest.to_string(),
            status: s.status,
            standard_value: s.standard,
            negotiated_value: Some(s.negotiated),
            quantity: Some(s.quantity),
            course_id: Some(s.course_id.to_string()),
            owner_id: s.owner_id.to_string(),
            created_on: s.created_on,
            notes: None,
            loss_reason: s.loss_reason.map(str::to_string),
        }
    }
}

pub fn leads() -> Vec<Lead> {
    vec![
        LeadSeed {
            id: "l1",
            name: "Carlos Silva",
            organization: "Prefeitura de Osasco",
            role: "Secretário Adjunto",
            city: "Osasco",
            state: "SP",
            email: "carlos@osasco.sp.gov.br",
            phone: "11999999999",
            interest: "Nova Lei de Licitações",
            status: LeadStatus::ProposalSent,
            standard: 30_000.0,
            negotiated: 30_000.0,
            quantity: 12,
            course_id: "c1",
            owner_id: "v5",
            created_on: date(2026, 10, 1),
            loss_reason: None,
        }
        .into(),
        LeadSeed {
            id: "l2",
            name: "Amanda Oliveira",
            organization: "Câmara Municipal de Curitiba",
            role: "Diretora Legislativa",
            city: "Curitiba",
            state: "PR",
            email: "amanda@cmc.pr.gov.br",
            phone: "41988888888",
            interest: "Gestão Ágil",
            status: LeadStatus::UnderReview,
            standard: 5_600.0,
            negotiated: 5_000.0,
            quantity: 2,
            course_id: "c2",
            owner_id: "v2",
            created_on: date(2026, 10, 2),
            loss_reason: None,
        }
        .into(),
        LeadSeed {
            id: "l3",
            name: "Roberto Souza",
            organization: "Secretaria de Saúde - PE",
            role: "Auditor Fiscal",
            city: "Recife",
            state: "PE",
            email: "roberto@saude.pe.gov.br",
            phone: "81977777777",
            interest: "Auditoria",
            status: LeadStatus::Enrolled,
            standard: 59_940.0,
            negotiated: 55_000.0,
            quantity: 20,
            course_id: "c3",
            owner_id: "v3",
            created_on: date(2026, 9, 28),
            loss_reason: None,
        }
        .into(),
        LeadSeed {
            id: "l4",
            name: "Julia Costa",
            organization: "Tribunal de Contas - GO",
            role: "Analista de Controle",
            city: "Goiânia",
            state: "GO",
            email: "julia@tce.go.gov.br",
            phone: "62966666666",
            interest: "Contratos",
            status: LeadStatus::ProposalSent,
            standard: 4_400.0,
            negotiated: 4_000.0,
            quantity: 2,
            course_id: "c4",
            owner_id: "v1",
            created_on: date(2026, 10, 5),
            loss_reason: None,
        }
        .into(),
        LeadSeed {
            id: "l5",
            name: "Marcos Pereira",
            organization: "Prefeitura de Manaus",
            role: "Gerente de Projetos",
            city: "Manaus",
            state: "AM",
            email: "marcos@manaus.am.gov.br",
            phone: "92955555555",
            interest: "Liderança",
            status: LeadStatus::Declined,
            standard: 2_400.0,
            negotiated: 0.0,
            quantity: 1,
            course_id: "c5",
            owner_id: "v4",
            created_on: date(2026, 10, 3),
            loss_reason: Some("Sem orçamento para este exercício."),
        }
        .into(),
    ]
}

pub fn global_goal() -> GlobalGoal {
    GlobalGoal {
        period: GoalPeriod::Annual,
        target_revenue: 2_000_000.0,
        description: Some(
            "Meta agressiva para expansão em capitais do Nordeste e Sul.".to_string(),
        ),
        tiers: [
            BonusTier { threshold_percent: 100.0, amount: 1000.0 },
            BonusTier { threshold_percent: 120.0, amount: 2500.0 },
            BonusTier { threshold_percent: 150.0, amount: 5000.0 },
        ],
    }
}

/// Greeting shown until real notifications arrive
pub fn notifications() -> Vec<Notification> {
    vec![Notification {
        id: "1".to_string(),
        title: "Sistema Conectado".to_string(),
        message: "O Dashboard está operando com dados reais.".to_string(),
        kind: NotificationKind::Info,
        date: Utc::now(),
        read: false,
    }]
}

