use crate::format::ScheduleTable;
use crate::model::{AssignmentMap, EmployeeId, RuleId};
use crate::scheduler::grid::Schedule;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Configuration d'un run : mois cible, affectation des règles, graine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub assignments: AssignmentMap,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            assignments: AssignmentMap::default(),
            seed: None,
        }
    }

    pub fn with_assignments(mut self, assignments: AssignmentMap) -> Self {
        self.assignments = assignments;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Violations de contrat : seules erreurs qui interrompent un run.
#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("schedule grid covers {found}, run requested {expected}")]
    GridMismatch { expected: String, found: String },
    #[error("invalid shift catalog: {0}")]
    InvalidCatalog(String),
    #[error("run phase violation: {0}")]
    PhaseViolation(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Problème de qualité des données : le run continue, la référence fautive est ignorée.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    DanglingRule { rule_id: RuleId },
    UnknownRuleType { rule_id: RuleId, rule_type: String },
    MalformedParams { rule_id: RuleId, reason: String },
    UnknownEmployee { employee_id: EmployeeId },
    /// Cellule imposée contraire à une autre règle dure ; l'imposition est conservée.
    ForcedShiftConflict {
        rule_id: RuleId,
        employee_id: EmployeeId,
        date: NaiveDate,
        shift: String,
        conflicts_with: RuleId,
    },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::DanglingRule { rule_id } => {
                write!(f, "rule {rule_id} is assigned but does not exist")
            }
            DataWarning::UnknownRuleType { rule_id, rule_type } => {
                write!(f, "rule {rule_id} has unknown type {rule_type}")
            }
            DataWarning::MalformedParams { rule_id, reason } => {
                write!(f, "rule {rule_id} ignored: {reason}")
            }
            DataWarning::UnknownEmployee { employee_id } => {
                write!(f, "rules assigned to unknown employee {employee_id}")
            }
            DataWarning::ForcedShiftConflict {
                rule_id,
                employee_id,
                date,
                shift,
                conflicts_with,
            } => write!(
                f,
                "rule {rule_id} forces {shift} for {employee_id} on {date}, against rule {conflicts_with}"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    Cancelled,
}

/// Étapes d'un run, dans l'ordre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Initialized,
    HardConstraintsApplied,
    Filling(NaiveDate),
    Done,
}

/// Cellule restée sans candidat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnassignedSlot {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub date: NaiveDate,
}

/// Employé sous son seuil d'heures mensuel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoursShortfall {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub required_hours: u32,
    pub worked_minutes: u32,
}

impl HoursShortfall {
    pub fn worked_hours(&self) -> f64 {
        f64::from(self.worked_minutes) / 60.0
    }
}

/// Résultat d'un run. Toujours produit, sauf violation de contrat.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResult {
    pub year: i32,
    pub month: u32,
    pub seed: Option<u64>,
    pub status: RunStatus,
    pub table: ScheduleTable,
    pub unassigned: Vec<UnassignedSlot>,
    pub hours_shortfalls: Vec<HoursShortfall>,
    pub warnings: Vec<DataWarning>,
    #[serde(skip)]
    pub schedule: Schedule,
}

impl ScheduleResult {
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed && self.unassigned.is_empty()
    }
}
