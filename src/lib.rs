#![forbid(unsafe_code)]
//! Roulement : moteur de planning mensuel d'équipe piloté par des règles.
//!
//! - Catalogue fermé de postes et de types de règles.
//! - Résolution des règles globales et personnelles par employé.
//! - Contraintes dures posées d'abord, puis remplissage glouton jour par jour.
//! - Aléa explicite et graine rejouable ; aucune E/S dans le cœur (voir `io`).

pub mod catalog;
pub mod format;
pub mod io;
pub mod model;
pub mod rules;
pub mod scheduler;
pub mod shifts;

pub use catalog::{describe, ParamKind, ParamSpec, RuleSchema, RuleType, Strength};
pub use format::{parse_table, ScheduleTable};
pub use io::Workspace;
pub use model::{AssignmentMap, Employee, EmployeeId, Level, Params, Rule, RuleId};
pub use rules::{Constraint, EffectiveRule, EffectiveRuleSet, ParamError};
pub use scheduler::{
    Cell, DataWarning, RandomPolicy, RunConfig, RunStatus, SchedError, Schedule, ScheduleResult,
    Scheduler, SelectionPolicy,
};
pub use shifts::{Shift, ShiftCatalog, OFF, STATUTORY_OFF};
