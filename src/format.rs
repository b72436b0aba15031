//! Mise en forme tabulaire d'un planning, et relecture de cette table.

use crate::model::{Employee, EmployeeId};
use crate::scheduler::{Cell, Schedule};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub const DATE_HEADER: &str = "date";
pub const UNASSIGNED: &str = "UNASSIGNED";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// En-têtes `["date", nom, ...]` puis une ligne par jour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Colonnes dans l'ordre de la grille ; une cellule encore ouverte (run
/// annulé) est rendue vide.
pub fn format(schedule: &Schedule, employees: &[Employee]) -> ScheduleTable {
    let names: HashMap<&EmployeeId, &str> = employees
        .iter()
        .map(|e| (&e.id, e.name.as_str()))
        .collect();

    let mut headers = Vec::with_capacity(schedule.employees().len() + 1);
    headers.push(DATE_HEADER.to_owned());
    headers.extend(schedule.employees().iter().map(|id| {
        names
            .get(id)
            .map(|name| (*name).to_owned())
            .unwrap_or_else(|| id.as_str().to_owned())
    }));

    let rows = schedule
        .dates()
        .iter()
        .enumerate()
        .map(|(day, date)| {
            let mut row = Vec::with_capacity(headers.len());
            row.push(format_date(*date));
            row.extend(schedule.day(day).map(render_cell));
            row
        })
        .collect();

    ScheduleTable { headers, rows }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d (%a)").to_string()
}

pub fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Open => String::new(),
        Cell::Shift(name) => name.clone(),
        Cell::Unassigned => UNASSIGNED.to_owned(),
    }
}

fn parse_cell(raw: &str) -> Cell {
    match raw.trim() {
        "" => Cell::Open,
        UNASSIGNED => Cell::Unassigned,
        name => Cell::shift(name),
    }
}

/// Reconstruit la correspondance (employé, date) → cellule.
///
/// Les colonnes sont rattachées aux employés par position (les noms
/// ne sont pas forcément uniques) ; `employees` doit suivre l'ordre utilisé
/// à la mise en forme.
pub fn parse_table(
    table: &ScheduleTable,
    employees: &[Employee],
) -> Result<BTreeMap<(EmployeeId, NaiveDate), Cell>> {
    match table.headers.first() {
        Some(first) if first == DATE_HEADER => {}
        _ => bail!("first column must be `{DATE_HEADER}`"),
    }
    let columns = &table.headers[1..];
    if columns.len() != employees.len() {
        bail!(
            "table has {} employee columns, expected {}",
            columns.len(),
            employees.len()
        );
    }
    for (header, employee) in columns.iter().zip(employees) {
        if *header != employee.name && *header != employee.id.as_str() {
            bail!("column `{header}` does not match employee {}", employee.name);
        }
    }

    let mut out = BTreeMap::new();
    for (line, row) in table.rows.iter().enumerate() {
        if row.len() != table.headers.len() {
            bail!("row {} has {} cells, expected {}", line + 1, row.len(), table.headers.len());
        }
        let date = parse_date_cell(&row[0]).with_context(|| format!("row {}", line + 1))?;
        for (raw, employee) in row[1..].iter().zip(employees) {
            out.insert((employee.id.clone(), date), parse_cell(raw));
        }
    }
    Ok(out)
}

fn parse_date_cell(raw: &str) -> Result<NaiveDate> {
    let head = raw.trim().split(' ').next().unwrap_or_default();
    NaiveDate::parse_from_str(head, DATE_FORMAT).with_context(|| format!("invalid date `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_cells_carry_weekday() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(format_date(date), "2025-03-01 (Sat)");
        assert_eq!(parse_date_cell("2025-03-01 (Sat)").unwrap(), date);
        assert_eq!(parse_date_cell("2025-03-01").unwrap(), date);
        assert!(parse_date_cell("March 1st").is_err());
    }

    #[test]
    fn cells_render_and_parse_back() {
        for cell in [Cell::Open, Cell::Unassigned, Cell::shift("off"), Cell::shift("14-22")] {
            assert_eq!(parse_cell(&render_cell(&cell)), cell);
        }
    }
}
