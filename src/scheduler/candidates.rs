use super::grid::Schedule;
use crate::model::Employee;
use crate::rules::EffectiveRuleSet;
use crate::shifts::ShiftCatalog;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Nombre d'employés sur le poste A à partir duquel le poste B s'ouvre.
pub const INTERDEPENDENCE_THRESHOLD: u32 = 2;

/// Décompte des postes déjà placés sur un jour, tous employés confondus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTally {
    counts: HashMap<String, u32>,
}

impl DayTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amorcé avec les cellules déjà décidées du jour (imposées ou placées).
    pub fn for_day(schedule: &Schedule, day: usize) -> Self {
        let mut tally = Self::new();
        for cell in schedule.day(day) {
            if let Some(shift) = cell.shift_name() {
                tally.record(shift);
            }
        }
        tally
    }

    pub fn record(&mut self, shift: &str) {
        *self.counts.entry(shift.to_owned()).or_insert(0) += 1;
    }

    pub fn count(&self, shift: &str) -> u32 {
        self.counts.get(shift).copied().unwrap_or(0)
    }
}

/// Postes autorisés pour une cellule ouverte.
///
/// `preferred` est un signal de classement (postes du matin après un poste
/// tardif) ; il ne retire jamais de candidat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    pub shifts: Vec<String>,
    pub preferred: Vec<String>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn contains(&self, shift: &str) -> bool {
        self.shifts.iter().any(|s| s == shift)
    }
}

/// Filtre le catalogue (postes travaillés + `off`) par les règles dures de
/// l'employé et l'état du jour.
pub fn candidates(
    employee: &Employee,
    date: NaiveDate,
    schedule: &Schedule,
    rules: &EffectiveRuleSet,
    tally: &DayTally,
    shifts: &ShiftCatalog,
) -> Candidates {
    let allowed: Vec<String> = shifts
        .candidate_pool()
        .map(|s| s.name.as_str())
        .filter(|name| {
            rules
                .level_requirements()
                .all(|(shift, level)| shift != *name || employee.level == level)
        })
        .filter(|name| {
            rules
                .interdependences()
                .all(|(a, b)| b != *name || tally.count(a) >= INTERDEPENDENCE_THRESHOLD)
        })
        .map(str::to_owned)
        .collect();

    let yesterday = date
        .pred_opt()
        .and_then(|d| schedule.cell(&employee.id, d))
        .and_then(|c| c.shift_name());

    let mut preferred: Vec<String> = Vec::new();
    if let Some(previous) = yesterday {
        for (late, early) in rules.late_then_early() {
            let follows_late = late.iter().any(|s| s == previous);
            let available = allowed.iter().any(|s| s == early);
            if follows_late && available && !preferred.iter().any(|s| s == early) {
                preferred.push(early.to_owned());
            }
        }
    }

    Candidates {
        shifts: allowed,
        preferred,
    }
}
