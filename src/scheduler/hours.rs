use super::grid::Schedule;
use super::HoursShortfall;
use crate::model::Employee;
use crate::rules::EffectiveRuleSet;
use crate::shifts::ShiftCatalog;

/// Post-passe MIN_MONTHLY_HOURS : informatif, ne rouvre aucune cellule.
pub(super) fn monthly_shortfalls(
    schedule: &Schedule,
    employees: &[Employee],
    effective: &[EffectiveRuleSet],
    shifts: &ShiftCatalog,
) -> Vec<HoursShortfall> {
    let mut out = Vec::new();
    for (emp, (employee, rules)) in employees.iter().zip(effective).enumerate() {
        let Some(required_hours) = rules.min_monthly_hours() else {
            continue;
        };
        let worked_minutes: u32 = schedule
            .row(emp)
            .iter()
            .filter_map(|cell| cell.shift_name())
            .map(|name| shifts.duration_minutes(name))
            .sum();
        if worked_minutes < required_hours.saturating_mul(60) {
            out.push(HoursShortfall {
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
                required_hours,
                worked_minutes,
            });
        }
    }
    out
}
