use super::candidates::INTERDEPENDENCE_THRESHOLD;
use super::grid::{Cell, Schedule};
use super::DataWarning;
use crate::model::{Employee, RuleId};
use crate::rules::{Constraint, EffectiveRuleSet};
use tracing::debug;

/// Écrit les cellules imposées (jours de repos fixes, postes spécifiques).
///
/// `effective[i]` correspond au i-ème employé de la grille. Les dates hors du
/// mois sont ignorées. Pour une même cellule, la dernière règle traitée gagne.
/// Idempotent : rejouer l'application produit la même grille.
pub(super) fn apply_hard_constraints(schedule: &mut Schedule, effective: &[EffectiveRuleSet]) {
    for (emp, rules) in effective.iter().enumerate() {
        for rule in rules.iter() {
            for (date, shift) in rule.constraint.forced_cells() {
                match schedule.day_index(date) {
                    Some(day) => schedule.set(emp, day, Cell::shift(shift)),
                    None => debug!(rule = %rule.id, %date, "forced date outside scheduling month"),
                }
            }
        }
    }
}

/// Cellules imposées qui contredisent une règle dure du même employé.
///
/// L'imposition l'emporte : la cellule reste telle quelle et le conflit est
/// rapporté. Un poste B imposé n'est vérifié que sur les jours entièrement
/// décidés, contre le total du poste A de ce jour.
pub(super) fn forced_conflicts(
    schedule: &Schedule,
    employees: &[Employee],
    effective: &[EffectiveRuleSet],
) -> Vec<DataWarning> {
    let mut out = Vec::new();
    for (emp, (employee, rules)) in employees.iter().zip(effective).enumerate() {
        for (day, rule_id, shift) in surviving_forced_cells(schedule, emp, rules) {
            let date = schedule.dates()[day];
            let day_decided = schedule.day(day).all(|c| !c.is_open());
            for other in rules.iter() {
                let conflict = match &other.constraint {
                    Constraint::RequiredLevel { shift: s, level } => {
                        *s == shift && employee.level != *level
                    }
                    Constraint::Interdependence { shift_a, shift_b } => {
                        *shift_b == shift
                            && day_decided
                            && count_on_day(schedule, day, shift_a) < INTERDEPENDENCE_THRESHOLD
                    }
                    _ => false,
                };
                if conflict {
                    out.push(DataWarning::ForcedShiftConflict {
                        rule_id: rule_id.clone(),
                        employee_id: employee.id.clone(),
                        date,
                        shift: shift.clone(),
                        conflicts_with: other.id.clone(),
                    });
                }
            }
        }
    }
    out
}

/// `(jour, règle, poste)` des impositions encore présentes dans la grille,
/// une par cellule (la dernière règle écrite).
fn surviving_forced_cells(
    schedule: &Schedule,
    emp: usize,
    rules: &EffectiveRuleSet,
) -> Vec<(usize, RuleId, String)> {
    let mut last: Vec<(usize, RuleId, String)> = Vec::new();
    for rule in rules.iter() {
        for (date, shift) in rule.constraint.forced_cells() {
            let Some(day) = schedule.day_index(date) else {
                continue;
            };
            last.retain(|(d, _, _)| *d != day);
            last.push((day, rule.id.clone(), shift.to_owned()));
        }
    }
    last.retain(|(day, _, shift)| schedule.get(emp, *day).shift_name() == Some(shift.as_str()));
    last.sort_by_key(|(day, _, _)| *day);
    last
}

fn count_on_day(schedule: &Schedule, day: usize, shift: &str) -> u32 {
    schedule
        .day(day)
        .filter(|c| c.shift_name() == Some(shift))
        .count() as u32
}
