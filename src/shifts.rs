use crate::scheduler::SchedError;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Repos simple.
pub const OFF: &str = "off";
/// Repos légal.
pub const STATUTORY_OFF: &str = "statutory-off";

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Définition d'un poste (les sentinelles de repos n'ont pas d'horaires).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub name: String,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub color: String,
}

impl Shift {
    pub fn working<N: Into<String>, C: Into<String>>(
        name: N,
        start: NaiveTime,
        end: NaiveTime,
        color: C,
    ) -> Self {
        Self {
            name: name.into(),
            start_time: Some(start),
            end_time: Some(end),
            color: color.into(),
        }
    }

    pub fn sentinel<N: Into<String>, C: Into<String>>(name: N, color: C) -> Self {
        Self {
            name: name.into(),
            start_time: None,
            end_time: None,
            color: color.into(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.start_time.is_none() || self.end_time.is_none()
    }

    /// Durée en minutes, modulo 24h (un poste peut passer minuit).
    pub fn duration_minutes(&self) -> u32 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                (end - start).num_minutes().rem_euclid(MINUTES_PER_DAY) as u32
            }
            _ => 0,
        }
    }
}

/// Catalogue fermé des postes, figé au démarrage du moteur.
#[derive(Debug, Clone)]
pub struct ShiftCatalog {
    shifts: Vec<Shift>,
    durations: HashMap<String, u32>,
}

impl ShiftCatalog {
    /// Valide l'unicité des noms et la présence des deux sentinelles.
    pub fn new(shifts: Vec<Shift>) -> Result<Self, SchedError> {
        let mut durations = HashMap::with_capacity(shifts.len());
        for shift in &shifts {
            if durations
                .insert(shift.name.clone(), shift.duration_minutes())
                .is_some()
            {
                return Err(SchedError::InvalidCatalog(format!(
                    "duplicate shift name: {}",
                    shift.name
                )));
            }
        }
        for sentinel in [OFF, STATUTORY_OFF] {
            match shifts.iter().find(|s| s.name == sentinel) {
                Some(s) if s.is_sentinel() => {}
                Some(_) => {
                    return Err(SchedError::InvalidCatalog(format!(
                        "{sentinel} must not carry start/end times"
                    )))
                }
                None => {
                    return Err(SchedError::InvalidCatalog(format!(
                        "missing sentinel shift: {sentinel}"
                    )))
                }
            }
        }
        Ok(Self { shifts, durations })
    }

    /// Postes de l'établissement (horaires de la grille d'origine).
    pub fn standard() -> Self {
        let shifts = vec![
            Shift::working("9-17:30", hm(9, 0), hm(17, 30), "#AED9E0"),
            Shift::working("9:30-18", hm(9, 30), hm(18, 0), "#FFA69E"),
            Shift::working("10:30-18", hm(10, 30), hm(18, 0), "#CDB4DB"),
            Shift::working("10:30-19", hm(10, 30), hm(19, 0), "#B8F2E6"),
            Shift::working("10:30-20:30", hm(10, 30), hm(20, 30), "#FFB4A2"),
            Shift::working("13-21:30", hm(13, 0), hm(21, 30), "#FFC8DD"),
            Shift::working("14-22", hm(14, 0), hm(22, 0), "#D0F4DE"),
            Shift::working("10-18:30", hm(10, 0), hm(18, 30), "#CDB4DB"),
            Shift::sentinel(OFF, "#B5EAEA"),
            Shift::sentinel(STATUTORY_OFF, "#FFABAB"),
        ];
        let durations = shifts
            .iter()
            .map(|s| (s.name.clone(), s.duration_minutes()))
            .collect();
        Self { shifts, durations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shift> {
        self.shifts.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.durations.contains_key(name)
    }

    /// 0 pour une sentinelle ou un nom inconnu.
    pub fn duration_minutes(&self, name: &str) -> u32 {
        self.durations.get(name).copied().unwrap_or(0)
    }

    /// Postes proposables par la recherche : postes travaillés puis `off`.
    pub fn candidate_pool(&self) -> impl Iterator<Item = &Shift> {
        self.shifts
            .iter()
            .filter(|s| !s.is_sentinel() || s.name == OFF)
    }
}

impl Default for ShiftCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn hm(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_durations() {
        let catalog = ShiftCatalog::standard();
        assert_eq!(catalog.duration_minutes("9-17:30"), 510);
        assert_eq!(catalog.duration_minutes("14-22"), 480);
        assert_eq!(catalog.duration_minutes(OFF), 0);
        assert_eq!(catalog.duration_minutes("unknown"), 0);
    }

    #[test]
    fn duration_wraps_past_midnight() {
        let night = Shift::working("22-6", hm(22, 0), hm(6, 0), "#000000");
        assert_eq!(night.duration_minutes(), 8 * 60);
    }

    #[test]
    fn candidate_pool_excludes_statutory_off() {
        let catalog = ShiftCatalog::standard();
        let names: Vec<&str> = catalog.candidate_pool().map(|s| s.name.as_str()).collect();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&OFF));
        assert!(!names.contains(&STATUTORY_OFF));
    }

    #[test]
    fn rejects_catalog_without_sentinels() {
        let err = ShiftCatalog::new(vec![Shift::sentinel(OFF, "#fff")]).unwrap_err();
        assert!(err.to_string().contains("statutory-off"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = ShiftCatalog::new(vec![
            Shift::sentinel(OFF, "#fff"),
            Shift::sentinel(OFF, "#fff"),
            Shift::sentinel(STATUTORY_OFF, "#fff"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
