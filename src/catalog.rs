//! Catalogue des types de règles : schéma des paramètres et gabarit de description.
//!
//! Les clés de paramètres et les noms de types forment la seule surface de
//! configuration du moteur ; elles doivent rester stables.

use crate::model::{Params, Rule};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Type de règle (énumération fermée).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    AssignFixedOffDays,
    AssignSpecificShift,
    RequiredLevelForShift,
    LateShiftThenEarlyShift,
    MinMonthlyHours,
    ShiftInterdependence,
}

impl RuleType {
    pub const ALL: [RuleType; 6] = [
        RuleType::AssignFixedOffDays,
        RuleType::AssignSpecificShift,
        RuleType::RequiredLevelForShift,
        RuleType::LateShiftThenEarlyShift,
        RuleType::MinMonthlyHours,
        RuleType::ShiftInterdependence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::AssignFixedOffDays => "ASSIGN_FIXED_OFF_DAYS",
            RuleType::AssignSpecificShift => "ASSIGN_SPECIFIC_SHIFT",
            RuleType::RequiredLevelForShift => "REQUIRED_LEVEL_FOR_SHIFT",
            RuleType::LateShiftThenEarlyShift => "LATE_SHIFT_THEN_EARLY_SHIFT",
            RuleType::MinMonthlyHours => "MIN_MONTHLY_HOURS",
            RuleType::ShiftInterdependence => "SHIFT_INTERDEPENDENCE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RuleType::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn strength(&self) -> Strength {
        match self {
            RuleType::LateShiftThenEarlyShift => Strength::Soft,
            RuleType::MinMonthlyHours => Strength::Deferred,
            _ => Strength::Hard,
        }
    }

    pub fn schema(&self) -> &'static RuleSchema {
        // SCHEMAS suit l'ordre de RuleType::ALL
        &SCHEMAS[*self as usize]
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    /// Élimine des candidats ; jamais violée dans un résultat.
    Hard,
    /// Simple préférence.
    Soft,
    /// Vérifiée après remplissage complet du mois.
    Deferred,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Date,
    DateSet,
    ShiftName,
    MultiShiftName,
    Choice(&'static [&'static str]),
}

impl ParamKind {
    pub fn label(&self) -> &'static str {
        match self {
            ParamKind::Integer => "integer",
            ParamKind::Date => "date",
            ParamKind::DateSet => "date-set",
            ParamKind::ShiftName => "shift",
            ParamKind::MultiShiftName => "shift-set",
            ParamKind::Choice(_) => "choice",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleSchema {
    pub rule_type: RuleType,
    pub display_name: &'static str,
    pub summary: &'static str,
    pub params: &'static [ParamSpec],
    pub template: &'static str,
}

pub const OFF_VARIANTS: &[&str] = &[crate::shifts::OFF, crate::shifts::STATUTORY_OFF];
pub const LEVELS: &[&str] = &["bartender", "door-staff"];

static SCHEMAS: [RuleSchema; 6] = [
    RuleSchema {
        rule_type: RuleType::AssignFixedOffDays,
        display_name: "Fixed days off",
        summary: "Force the listed dates to an off shift.",
        params: &[
            ParamSpec { key: "dates", label: "Dates", kind: ParamKind::DateSet },
            ParamSpec { key: "shift", label: "Off type", kind: ParamKind::Choice(OFF_VARIANTS) },
        ],
        template: "off on {dates} ({shift})",
    },
    RuleSchema {
        rule_type: RuleType::AssignSpecificShift,
        display_name: "Specific shift",
        summary: "Force one date to the given shift.",
        params: &[
            ParamSpec { key: "date", label: "Date", kind: ParamKind::Date },
            ParamSpec { key: "shift", label: "Shift", kind: ParamKind::ShiftName },
        ],
        template: "works {shift} on {date}",
    },
    RuleSchema {
        rule_type: RuleType::RequiredLevelForShift,
        display_name: "Level required for shift",
        summary: "A shift may only be worked by employees of the given level.",
        params: &[
            ParamSpec { key: "level", label: "Required level", kind: ParamKind::Choice(LEVELS) },
            ParamSpec { key: "shift", label: "Shift", kind: ParamKind::ShiftName },
        ],
        template: "{shift} must be worked by {level}",
    },
    RuleSchema {
        rule_type: RuleType::LateShiftThenEarlyShift,
        display_name: "Late shift then early shift",
        summary: "After a late shift, prefer the given early shift the next day.",
        params: &[
            ParamSpec { key: "late_shifts", label: "Late shifts", kind: ParamKind::MultiShiftName },
            ParamSpec { key: "early_shift", label: "Early shift", kind: ParamKind::ShiftName },
        ],
        template: "after {late_shifts}, prefer {early_shift} the next day",
    },
    RuleSchema {
        rule_type: RuleType::MinMonthlyHours,
        display_name: "Minimum monthly hours",
        summary: "Flag employees whose month totals fewer hours.",
        params: &[ParamSpec { key: "hours", label: "Hours", kind: ParamKind::Integer }],
        template: "at least {hours} hours per month",
    },
    RuleSchema {
        rule_type: RuleType::ShiftInterdependence,
        display_name: "Shift interdependence",
        summary: "Shift B opens only once two employees work shift A that day.",
        params: &[
            ParamSpec { key: "shift_a", label: "Shift A", kind: ParamKind::ShiftName },
            ParamSpec { key: "shift_b", label: "Shift B", kind: ParamKind::ShiftName },
        ],
        template: "{shift_b} opens once 2 employees work {shift_a}",
    },
];

pub fn schemas() -> &'static [RuleSchema] {
    &SCHEMAS
}

/// Description lisible d'une règle. N'échoue jamais : un type inconnu est
/// rendu sous la forme générique `clé: valeur`.
pub fn describe(rule: &Rule) -> String {
    let body = match rule.kind() {
        Some(kind) => fill_template(kind.schema().template, &rule.params),
        None => {
            let pairs: Vec<String> = rule
                .params
                .iter()
                .map(|(key, value)| format!("{key}: {}", render_value(value)))
                .collect();
            format!("=> ({})", pairs.join(", "))
        }
    };
    format!("【{}】 {}", rule.name, body)
}

fn fill_template(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        match params.get(&after[..close]) {
            Some(value) => out.push_str(&render_value(value)),
            None => out.push('?'),
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => "?".to_owned(),
        other => other.to_string(),
    }
}
