use crate::catalog::RuleType;
use crate::model::{Level, Params, RuleId};
use crate::shifts::{ShiftCatalog, OFF, STATUTORY_OFF};
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

/// Paramètres typés d'une règle, une variante par type du catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    FixedOffDays { dates: Vec<NaiveDate>, shift: String },
    SpecificShift { date: NaiveDate, shift: String },
    RequiredLevel { shift: String, level: Level },
    LateThenEarly { late_shifts: Vec<String>, early_shift: String },
    MinMonthlyHours { hours: u32 },
    Interdependence { shift_a: String, shift_b: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("missing parameter `{0}`")]
    Missing(&'static str),
    #[error("parameter `{key}` must be {expected}")]
    WrongKind {
        key: &'static str,
        expected: &'static str,
    },
    #[error("parameter `{key}`: invalid date `{value}` (expected YYYY-MM-DD)")]
    InvalidDate { key: &'static str, value: String },
    #[error("parameter `{key}`: unknown shift `{value}`")]
    UnknownShift { key: &'static str, value: String },
    #[error("parameter `{key}`: `{value}` is not an allowed value")]
    InvalidChoice { key: &'static str, value: String },
}

impl Constraint {
    /// Convertit le sac de paramètres d'une règle dans sa forme typée.
    pub fn parse(
        rule_type: RuleType,
        params: &Params,
        shifts: &ShiftCatalog,
    ) -> Result<Self, ParamError> {
        let p = ParamReader { params, shifts };
        let constraint = match rule_type {
            RuleType::AssignFixedOffDays => {
                let shift = p.string("shift")?;
                if shift != OFF && shift != STATUTORY_OFF {
                    return Err(ParamError::InvalidChoice {
                        key: "shift",
                        value: shift,
                    });
                }
                Constraint::FixedOffDays {
                    dates: p.dates("dates")?,
                    shift,
                }
            }
            RuleType::AssignSpecificShift => Constraint::SpecificShift {
                date: p.date("date")?,
                shift: p.shift("shift")?,
            },
            RuleType::RequiredLevelForShift => {
                let raw = p.string("level")?;
                let level = raw
                    .parse::<Level>()
                    .map_err(|_| ParamError::InvalidChoice {
                        key: "level",
                        value: raw,
                    })?;
                Constraint::RequiredLevel {
                    shift: p.shift("shift")?,
                    level,
                }
            }
            RuleType::LateShiftThenEarlyShift => Constraint::LateThenEarly {
                late_shifts: p.shift_list("late_shifts")?,
                early_shift: p.shift("early_shift")?,
            },
            RuleType::MinMonthlyHours => Constraint::MinMonthlyHours {
                hours: p.integer("hours")?,
            },
            RuleType::ShiftInterdependence => Constraint::Interdependence {
                shift_a: p.shift("shift_a")?,
                shift_b: p.shift("shift_b")?,
            },
        };
        Ok(constraint)
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            Constraint::FixedOffDays { .. } => RuleType::AssignFixedOffDays,
            Constraint::SpecificShift { .. } => RuleType::AssignSpecificShift,
            Constraint::RequiredLevel { .. } => RuleType::RequiredLevelForShift,
            Constraint::LateThenEarly { .. } => RuleType::LateShiftThenEarlyShift,
            Constraint::MinMonthlyHours { .. } => RuleType::MinMonthlyHours,
            Constraint::Interdependence { .. } => RuleType::ShiftInterdependence,
        }
    }

    /// Cellules imposées avant la recherche : `(date, poste)`.
    pub fn forced_cells(&self) -> Vec<(NaiveDate, &str)> {
        match self {
            Constraint::FixedOffDays { dates, shift } => {
                dates.iter().map(|d| (*d, shift.as_str())).collect()
            }
            Constraint::SpecificShift { date, shift } => vec![(*date, shift.as_str())],
            _ => Vec::new(),
        }
    }
}

struct ParamReader<'a> {
    params: &'a Params,
    shifts: &'a ShiftCatalog,
}

impl ParamReader<'_> {
    fn get(&self, key: &'static str) -> Result<&Value, ParamError> {
        match self.params.get(key) {
            None | Some(Value::Null) => Err(ParamError::Missing(key)),
            Some(value) => Ok(value),
        }
    }

    fn string(&self, key: &'static str) -> Result<String, ParamError> {
        self.get(key)?
            .as_str()
            .map(str::to_owned)
            .ok_or(ParamError::WrongKind {
                key,
                expected: "a string",
            })
    }

    fn integer(&self, key: &'static str) -> Result<u32, ParamError> {
        self.get(key)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or(ParamError::WrongKind {
                key,
                expected: "a non-negative integer",
            })
    }

    fn date(&self, key: &'static str) -> Result<NaiveDate, ParamError> {
        parse_date(key, &self.string(key)?)
    }

    fn dates(&self, key: &'static str) -> Result<Vec<NaiveDate>, ParamError> {
        self.string_list(key)?
            .iter()
            .map(|raw| parse_date(key, raw))
            .collect()
    }

    fn shift(&self, key: &'static str) -> Result<String, ParamError> {
        let name = self.string(key)?;
        self.known_shift(key, name)
    }

    fn shift_list(&self, key: &'static str) -> Result<Vec<String>, ParamError> {
        self.string_list(key)?
            .into_iter()
            .map(|name| self.known_shift(key, name))
            .collect()
    }

    fn string_list(&self, key: &'static str) -> Result<Vec<String>, ParamError> {
        let wrong = ParamError::WrongKind {
            key,
            expected: "a list of strings",
        };
        let items = self.get(key)?.as_array().ok_or_else(|| wrong.clone())?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_owned).ok_or_else(|| wrong.clone()))
            .collect()
    }

    fn known_shift(&self, key: &'static str, name: String) -> Result<String, ParamError> {
        if self.shifts.contains(&name) {
            Ok(name)
        } else {
            Err(ParamError::UnknownShift { key, value: name })
        }
    }
}

fn parse_date(key: &'static str, raw: &str) -> Result<NaiveDate, ParamError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| ParamError::InvalidDate {
        key,
        value: raw.to_owned(),
    })
}

/// Règle résolue pour un employé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveRule {
    pub id: RuleId,
    pub name: String,
    pub constraint: Constraint,
}

/// Union dédoublonnée des règles globales et personnelles d'un employé,
/// dans l'ordre de traitement (globales puis personnelles).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveRuleSet {
    rules: Vec<EffectiveRule>,
}

impl EffectiveRuleSet {
    pub fn new(rules: Vec<EffectiveRule>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectiveRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.rules.iter().map(|r| &r.id)
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.rules.iter().map(|r| &r.constraint)
    }

    pub fn level_requirements(&self) -> impl Iterator<Item = (&str, Level)> {
        self.constraints().filter_map(|c| match c {
            Constraint::RequiredLevel { shift, level } => Some((shift.as_str(), *level)),
            _ => None,
        })
    }

    pub fn interdependences(&self) -> impl Iterator<Item = (&str, &str)> {
        self.constraints().filter_map(|c| match c {
            Constraint::Interdependence { shift_a, shift_b } => {
                Some((shift_a.as_str(), shift_b.as_str()))
            }
            _ => None,
        })
    }

    pub fn late_then_early(&self) -> impl Iterator<Item = (&[String], &str)> {
        self.constraints().filter_map(|c| match c {
            Constraint::LateThenEarly {
                late_shifts,
                early_shift,
            } => Some((late_shifts.as_slice(), early_shift.as_str())),
            _ => None,
        })
    }

    /// Seuil mensuel le plus strict, s'il y en a un.
    pub fn min_monthly_hours(&self) -> Option<u32> {
        self.constraints()
            .filter_map(|c| match c {
                Constraint::MinMonthlyHours { hours } => Some(*hours),
                _ => None,
            })
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => Params::new(),
        }
    }

    #[test]
    fn parses_fixed_off_days() {
        let shifts = ShiftCatalog::standard();
        let p = params(json!({"dates": ["2025-03-01", "2025-03-02"], "shift": "off"}));
        let c = Constraint::parse(RuleType::AssignFixedOffDays, &p, &shifts).unwrap();
        assert_eq!(c.forced_cells().len(), 2);
        assert_eq!(c.rule_type(), RuleType::AssignFixedOffDays);
    }

    #[test]
    fn fixed_off_days_rejects_working_shift() {
        let shifts = ShiftCatalog::standard();
        let p = params(json!({"dates": ["2025-03-01"], "shift": "14-22"}));
        let err = Constraint::parse(RuleType::AssignFixedOffDays, &p, &shifts).unwrap_err();
        assert!(matches!(err, ParamError::InvalidChoice { key: "shift", .. }));
    }

    #[test]
    fn reports_missing_and_wrong_kind() {
        let shifts = ShiftCatalog::standard();
        let err = Constraint::parse(RuleType::MinMonthlyHours, &Params::new(), &shifts)
            .unwrap_err();
        assert_eq!(err, ParamError::Missing("hours"));

        let p = params(json!({"hours": "forty"}));
        let err = Constraint::parse(RuleType::MinMonthlyHours, &p, &shifts).unwrap_err();
        assert!(matches!(err, ParamError::WrongKind { key: "hours", .. }));
    }

    #[test]
    fn rejects_unknown_shift_and_bad_date() {
        let shifts = ShiftCatalog::standard();
        let p = params(json!({"date": "2025-03-01", "shift": "night"}));
        let err = Constraint::parse(RuleType::AssignSpecificShift, &p, &shifts).unwrap_err();
        assert_eq!(err.to_string(), "parameter `shift`: unknown shift `night`");

        let p = params(json!({"date": "01/03/2025", "shift": "14-22"}));
        let err = Constraint::parse(RuleType::AssignSpecificShift, &p, &shifts).unwrap_err();
        assert!(matches!(err, ParamError::InvalidDate { key: "date", .. }));
    }

    #[test]
    fn strictest_monthly_threshold_wins() {
        let set = EffectiveRuleSet::new(vec![
            EffectiveRule {
                id: RuleId::new("a"),
                name: "a".into(),
                constraint: Constraint::MinMonthlyHours { hours: 80 },
            },
            EffectiveRule {
                id: RuleId::new("b"),
                name: "b".into(),
                constraint: Constraint::MinMonthlyHours { hours: 120 },
            },
        ]);
        assert_eq!(set.min_monthly_hours(), Some(120));
        assert_eq!(EffectiveRuleSet::default().min_monthly_hours(), None);
    }
}
