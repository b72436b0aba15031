mod candidates;
mod grid;
mod hard;
mod hours;
mod resolver;
mod search;
mod types;
mod util;

pub use candidates::{candidates, Candidates, DayTally, INTERDEPENDENCE_THRESHOLD};
pub use grid::{Cell, Schedule};
pub use resolver::{Resolution, RuleResolver};
pub use search::{
    CancelCheck, NeverCancel, RandomPolicy, ScheduleRun, SelectionPolicy, SlotContext,
};
pub use types::{
    DataWarning, HoursShortfall, RunConfig, RunPhase, RunStatus, SchedError, ScheduleResult,
    UnassignedSlot,
};

use crate::format;
use crate::model::{Employee, Rule};
use crate::rules::EffectiveRuleSet;
use crate::shifts::ShiftCatalog;
use tracing::{info, warn};

/// Scheduler : instantané en lecture seule des postes, employés et règles.
///
/// Partageable entre threads ; chaque run possède sa propre grille et sa
/// propre source aléatoire.
#[derive(Debug, Clone)]
pub struct Scheduler {
    shifts: ShiftCatalog,
    employees: Vec<Employee>,
    rules: Vec<Rule>,
}

impl Scheduler {
    pub fn new(employees: Vec<Employee>, rules: Vec<Rule>) -> Self {
        Self::with_shifts(ShiftCatalog::standard(), employees, rules)
    }

    pub fn with_shifts(shifts: ShiftCatalog, employees: Vec<Employee>, rules: Vec<Rule>) -> Self {
        Self {
            shifts,
            employees,
            rules,
        }
    }

    pub fn shifts(&self) -> &ShiftCatalog {
        &self.shifts
    }

    pub fn resolver<'a>(&'a self, config: &'a RunConfig) -> RuleResolver<'a> {
        RuleResolver::new(&self.rules, &config.assignments, &self.shifts)
    }

    /// Génère le planning du mois avec la politique aléatoire par défaut.
    ///
    /// Sans graine fournie, une graine est tirée puis consignée dans le
    /// résultat pour pouvoir rejouer le run.
    pub fn generate(&self, config: &RunConfig) -> Result<ScheduleResult, SchedError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut policy = RandomPolicy::seeded(seed);
        let mut result = self.generate_with(config, &mut policy, &mut NeverCancel)?;
        result.seed = Some(seed);
        Ok(result)
    }

    pub fn generate_with(
        &self,
        config: &RunConfig,
        policy: &mut dyn SelectionPolicy,
        cancel: &mut dyn CancelCheck,
    ) -> Result<ScheduleResult, SchedError> {
        let schedule = Schedule::new(config.year, config.month, &self.employees)?;
        self.generate_on(config, schedule, policy, cancel)
    }

    /// Complète une grille fournie par l'appelant (brouillon pré-rempli, etc.).
    /// La grille doit couvrir le mois demandé, sinon le run est refusé.
    pub fn generate_on(
        &self,
        config: &RunConfig,
        schedule: Schedule,
        policy: &mut dyn SelectionPolicy,
        cancel: &mut dyn CancelCheck,
    ) -> Result<ScheduleResult, SchedError> {
        info!(
            year = config.year,
            month = config.month,
            employees = self.employees.len(),
            rules = self.rules.len(),
            "generating schedule"
        );

        let (effective, mut warnings) = self.resolve_all(config);
        let mut run = ScheduleRun::new(
            config.year,
            config.month,
            schedule,
            &self.employees,
            &effective,
            &self.shifts,
        )?;
        run.apply_hard_constraints()?;
        let status = run.fill(policy, cancel)?;
        let schedule = run.into_schedule();
        util::push_unique(
            &mut warnings,
            hard::forced_conflicts(&schedule, &self.employees, &effective),
        );

        let hours_shortfalls = match status {
            RunStatus::Completed => {
                hours::monthly_shortfalls(&schedule, &self.employees, &effective, &self.shifts)
            }
            RunStatus::Cancelled => Vec::new(),
        };
        let unassigned = self.unassigned_slots(&schedule);
        let table = format::format(&schedule, &self.employees);

        for warning in &warnings {
            warn!(%warning, "data quality");
        }
        info!(
            ?status,
            unassigned = unassigned.len(),
            shortfalls = hours_shortfalls.len(),
            warnings = warnings.len(),
            "schedule generated"
        );

        Ok(ScheduleResult {
            year: config.year,
            month: config.month,
            seed: config.seed,
            status,
            table,
            unassigned,
            hours_shortfalls,
            warnings,
            schedule,
        })
    }

    fn resolve_all(&self, config: &RunConfig) -> (Vec<EffectiveRuleSet>, Vec<DataWarning>) {
        let resolver = self.resolver(config);
        let mut warnings = Vec::new();

        for employee_id in config.assignments.employees.keys() {
            if !self.employees.iter().any(|e| &e.id == employee_id) {
                util::push_unique(
                    &mut warnings,
                    [DataWarning::UnknownEmployee {
                        employee_id: employee_id.clone(),
                    }],
                );
            }
        }

        let effective = self
            .employees
            .iter()
            .map(|employee| {
                let resolution = resolver.resolve(&employee.id);
                util::push_unique(&mut warnings, resolution.warnings);
                resolution.rules
            })
            .collect();
        (effective, warnings)
    }

    fn unassigned_slots(&self, schedule: &Schedule) -> Vec<UnassignedSlot> {
        let mut out = Vec::new();
        for (day, date) in schedule.dates().iter().enumerate() {
            for (emp, employee) in self.employees.iter().enumerate() {
                if *schedule.get(emp, day) == Cell::Unassigned {
                    out.push(UnassignedSlot {
                        employee_id: employee.id.clone(),
                        employee_name: employee.name.clone(),
                        date: *date,
                    });
                }
            }
        }
        out
    }
}
