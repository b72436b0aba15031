use super::candidates::{self, Candidates, DayTally};
use super::grid::{Cell, Schedule};
use super::{hard, util, RunPhase, RunStatus, SchedError};
use crate::model::Employee;
use crate::rules::EffectiveRuleSet;
use crate::shifts::ShiftCatalog;
use chrono::NaiveDate;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Cellule en cours de décision, transmise à la politique de sélection.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    pub employee: &'a Employee,
    pub date: NaiveDate,
}

/// Choisit un poste parmi les candidats d'une cellule.
///
/// Renvoyer `None` (ou un poste hors candidats) laisse la cellule `Unassigned`.
pub trait SelectionPolicy {
    fn select(&mut self, slot: &SlotContext<'_>, candidates: &Candidates) -> Option<String>;
}

/// Tirage uniforme, graine explicite.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SelectionPolicy for RandomPolicy {
    fn select(&mut self, _slot: &SlotContext<'_>, candidates: &Candidates) -> Option<String> {
        candidates.shifts.choose(&mut self.rng).cloned()
    }
}

/// Interrogé une fois par jour, avant de remplir ce jour.
pub trait CancelCheck {
    fn should_cancel(&mut self, date: NaiveDate) -> bool;
}

impl<F: FnMut(NaiveDate) -> bool> CancelCheck for F {
    fn should_cancel(&mut self, date: NaiveDate) -> bool {
        self(date)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelCheck for NeverCancel {
    fn should_cancel(&mut self, _date: NaiveDate) -> bool {
        false
    }
}

/// Un run sur une grille : contraintes dures, puis remplissage jour par jour.
#[derive(Debug)]
pub struct ScheduleRun<'a> {
    schedule: Schedule,
    employees: &'a [Employee],
    effective: &'a [EffectiveRuleSet],
    shifts: &'a ShiftCatalog,
    phase: RunPhase,
}

impl<'a> ScheduleRun<'a> {
    /// Vérifie que la grille correspond au mois demandé et aux employés fournis.
    pub fn new(
        year: i32,
        month: u32,
        schedule: Schedule,
        employees: &'a [Employee],
        effective: &'a [EffectiveRuleSet],
        shifts: &'a ShiftCatalog,
    ) -> Result<Self, SchedError> {
        if !schedule.covers(year, month) {
            return Err(SchedError::GridMismatch {
                expected: util::month_label(year, month),
                found: util::month_label(schedule.year(), schedule.month()),
            });
        }
        let same_staff = schedule.employees().len() == employees.len()
            && schedule
                .employees()
                .iter()
                .zip(employees)
                .all(|(id, e)| *id == e.id);
        if !same_staff || effective.len() != employees.len() {
            return Err(SchedError::GridMismatch {
                expected: format!("{} employees in roster order", employees.len()),
                found: format!("{} grid rows", schedule.employees().len()),
            });
        }
        Ok(Self {
            schedule,
            employees,
            effective,
            shifts,
            phase: RunPhase::Initialized,
        })
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }

    /// Rejouable tant que le remplissage n'a pas commencé.
    pub fn apply_hard_constraints(&mut self) -> Result<(), SchedError> {
        match self.phase {
            RunPhase::Initialized | RunPhase::HardConstraintsApplied => {
                hard::apply_hard_constraints(&mut self.schedule, self.effective);
                self.phase = RunPhase::HardConstraintsApplied;
                Ok(())
            }
            _ => Err(SchedError::PhaseViolation(
                "hard constraints must be applied before filling",
            )),
        }
    }

    /// Parcourt les jours puis les employés et remplit chaque cellule ouverte.
    pub fn fill(
        &mut self,
        policy: &mut dyn SelectionPolicy,
        cancel: &mut dyn CancelCheck,
    ) -> Result<RunStatus, SchedError> {
        if self.phase != RunPhase::HardConstraintsApplied {
            return Err(SchedError::PhaseViolation(
                "fill requires hard constraints to be applied first",
            ));
        }

        let dates = self.schedule.dates().to_vec();
        for (day, date) in dates.into_iter().enumerate() {
            if cancel.should_cancel(date) {
                debug!(%date, "run cancelled");
                self.phase = RunPhase::Done;
                return Ok(RunStatus::Cancelled);
            }
            self.phase = RunPhase::Filling(date);
            self.fill_day(day, date, policy);
        }

        self.phase = RunPhase::Done;
        Ok(RunStatus::Completed)
    }

    fn fill_day(&mut self, day: usize, date: NaiveDate, policy: &mut dyn SelectionPolicy) {
        let mut tally = DayTally::for_day(&self.schedule, day);
        let employees = self.employees;

        for (emp, employee) in employees.iter().enumerate() {
            if !self.schedule.get(emp, day).is_open() {
                continue;
            }
            let found = candidates::candidates(
                employee,
                date,
                &self.schedule,
                &self.effective[emp],
                &tally,
                self.shifts,
            );
            let slot = SlotContext { employee, date };
            let cell = match policy.select(&slot, &found) {
                Some(shift) if found.contains(&shift) => {
                    tally.record(&shift);
                    Cell::Shift(shift)
                }
                Some(shift) => {
                    warn!(employee = %employee.id, %date, %shift, "policy picked a shift outside the candidates");
                    Cell::Unassigned
                }
                None => {
                    warn!(employee = %employee.id, %date, "no candidate shift for slot");
                    Cell::Unassigned
                }
            };
            self.schedule.set(emp, day, cell);
        }
    }
}
