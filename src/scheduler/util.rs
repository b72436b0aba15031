use chrono::{Datelike, NaiveDate};

/// Tous les jours du mois, en ordre croissant. `None` si le mois est invalide.
pub(crate) fn month_dates(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let mut out = Vec::with_capacity(31);
    let mut current = first;
    while current.month() == month {
        out.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    Some(out)
}

pub(crate) fn month_label(year: i32, month: u32) -> String {
    format!("{year}-{month:02}")
}

pub(super) fn push_unique<T: PartialEq>(into: &mut Vec<T>, items: impl IntoIterator<Item = T>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}
