use super::{util, SchedError};
use crate::model::{Employee, EmployeeId};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Contenu d'une cellule de la grille.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// Pas encore décidée.
    #[default]
    Open,
    Shift(String),
    /// Aucun candidat n'a survécu au filtrage.
    Unassigned,
}

impl Cell {
    pub fn shift<S: Into<String>>(name: S) -> Self {
        Cell::Shift(name.into())
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Cell::Open)
    }

    pub fn shift_name(&self) -> Option<&str> {
        match self {
            Cell::Shift(name) => Some(name),
            _ => None,
        }
    }
}

/// Grille employé × jour d'un mois, bornes connues à la création.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    year: i32,
    month: u32,
    dates: Vec<NaiveDate>,
    employees: Vec<EmployeeId>,
    // employé-major : cells[emp * dates.len() + day]
    cells: Vec<Cell>,
}

impl Schedule {
    pub fn new(year: i32, month: u32, employees: &[Employee]) -> Result<Self, SchedError> {
        let dates =
            util::month_dates(year, month).ok_or(SchedError::InvalidMonth { year, month })?;
        let employees: Vec<EmployeeId> = employees.iter().map(|e| e.id.clone()).collect();
        let cells = vec![Cell::Open; employees.len() * dates.len()];
        Ok(Self {
            year,
            month,
            dates,
            employees,
            cells,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn covers(&self, year: i32, month: u32) -> bool {
        self.year == year && self.month == month
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn employees(&self) -> &[EmployeeId] {
        &self.employees
    }

    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        if date.year() == self.year && date.month() == self.month {
            Some(date.day0() as usize)
        } else {
            None
        }
    }

    pub fn employee_index(&self, id: &EmployeeId) -> Option<usize> {
        self.employees.iter().position(|e| e == id)
    }

    /// Panique si les indices sont hors bornes.
    pub fn get(&self, emp: usize, day: usize) -> &Cell {
        &self.cells[self.offset(emp, day)]
    }

    pub fn set(&mut self, emp: usize, day: usize, cell: Cell) {
        let offset = self.offset(emp, day);
        self.cells[offset] = cell;
    }

    pub fn cell(&self, employee: &EmployeeId, date: NaiveDate) -> Option<&Cell> {
        let emp = self.employee_index(employee)?;
        let day = self.day_index(date)?;
        Some(self.get(emp, day))
    }

    /// Cellules d'un jour, dans l'ordre des employés.
    pub fn day(&self, day: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.employees.len()).map(move |emp| self.get(emp, day))
    }

    /// Cellules d'un employé, dans l'ordre des jours.
    pub fn row(&self, emp: usize) -> &[Cell] {
        let width = self.dates.len();
        &self.cells[emp * width..(emp + 1) * width]
    }

    pub fn is_complete(&self) -> bool {
        !self.cells.iter().any(Cell::is_open)
    }

    fn offset(&self, emp: usize, day: usize) -> usize {
        assert!(
            emp < self.employees.len() && day < self.dates.len(),
            "cell ({emp}, {day}) out of bounds"
        );
        emp * self.dates.len() + day
    }
}
