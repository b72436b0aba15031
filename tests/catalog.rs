#![forbid(unsafe_code)]
use roulement::catalog::{schemas, ParamKind, Strength};
use roulement::{describe, Params, Rule, RuleId, RuleType};
use serde_json::{json, Value};

fn rule(name: &str, rule_type: &str, value: Value) -> Rule {
    Rule {
        id: RuleId::new(name),
        name: name.to_owned(),
        rule_type: rule_type.to_owned(),
        params: match value {
            Value::Object(map) => map,
            _ => Params::new(),
        },
    }
}

#[test]
fn describes_every_rule_type() {
    let off = rule(
        "Alice weekend",
        "ASSIGN_FIXED_OFF_DAYS",
        json!({"dates": ["2025-03-01", "2025-03-02"], "shift": "off"}),
    );
    insta::assert_snapshot!(describe(&off), @"【Alice weekend】 off on 2025-03-01, 2025-03-02 (off)");

    let specific = rule(
        "Close",
        "ASSIGN_SPECIFIC_SHIFT",
        json!({"date": "2025-03-10", "shift": "14-22"}),
    );
    insta::assert_snapshot!(describe(&specific), @"【Close】 works 14-22 on 2025-03-10");

    let level = rule(
        "Opening",
        "REQUIRED_LEVEL_FOR_SHIFT",
        json!({"level": "bartender", "shift": "9-17:30"}),
    );
    insta::assert_snapshot!(describe(&level), @"【Opening】 9-17:30 must be worked by bartender");

    let rest = rule(
        "Rest",
        "LATE_SHIFT_THEN_EARLY_SHIFT",
        json!({"late_shifts": ["13-21:30", "14-22"], "early_shift": "9-17:30"}),
    );
    insta::assert_snapshot!(describe(&rest), @"【Rest】 after 13-21:30, 14-22, prefer 9-17:30 the next day");

    let hours = rule("Hours", "MIN_MONTHLY_HOURS", json!({"hours": 120}));
    insta::assert_snapshot!(describe(&hours), @"【Hours】 at least 120 hours per month");

    let link = rule(
        "Evening cover",
        "SHIFT_INTERDEPENDENCE",
        json!({"shift_a": "9-17:30", "shift_b": "14-22"}),
    );
    insta::assert_snapshot!(describe(&link), @"【Evening cover】 14-22 opens once 2 employees work 9-17:30");
}

#[test]
fn missing_parameters_render_as_question_marks() {
    let hours = rule("Hours", "MIN_MONTHLY_HOURS", json!({}));
    assert_eq!(describe(&hours), "【Hours】 at least ? hours per month");

    let level = rule("Opening", "REQUIRED_LEVEL_FOR_SHIFT", json!({"shift": "9-17:30"}));
    assert_eq!(describe(&level), "【Opening】 9-17:30 must be worked by ?");
}

#[test]
fn unknown_type_falls_back_to_key_value_listing() {
    let legacy = rule(
        "Weekly cap",
        "MAX_HOURS_PER_WEEK",
        json!({"days": 5, "hours": 40}),
    );
    insta::assert_snapshot!(describe(&legacy), @"【Weekly cap】 => (days: 5, hours: 40)");

    let empty = rule("Legacy", "MAX_CONSECUTIVE_DAYS", json!({}));
    assert_eq!(describe(&empty), "【Legacy】 => ()");
}

#[test]
fn parameter_schema_is_stable() {
    let keys: Vec<(&str, Vec<&str>)> = schemas()
        .iter()
        .map(|s| (s.rule_type.as_str(), s.params.iter().map(|p| p.key).collect()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("ASSIGN_FIXED_OFF_DAYS", vec!["dates", "shift"]),
            ("ASSIGN_SPECIFIC_SHIFT", vec!["date", "shift"]),
            ("REQUIRED_LEVEL_FOR_SHIFT", vec!["level", "shift"]),
            ("LATE_SHIFT_THEN_EARLY_SHIFT", vec!["late_shifts", "early_shift"]),
            ("MIN_MONTHLY_HOURS", vec!["hours"]),
            ("SHIFT_INTERDEPENDENCE", vec!["shift_a", "shift_b"]),
        ]
    );

    let off = RuleType::AssignFixedOffDays.schema();
    assert_eq!(off.params[0].kind, ParamKind::DateSet);
    assert_eq!(
        off.params[1].kind,
        ParamKind::Choice(&["off", "statutory-off"])
    );
    assert_eq!(RuleType::MinMonthlyHours.schema().params[0].kind, ParamKind::Integer);
}

#[test]
fn rule_strengths() {
    assert_eq!(RuleType::AssignFixedOffDays.strength(), Strength::Hard);
    assert_eq!(RuleType::ShiftInterdependence.strength(), Strength::Hard);
    assert_eq!(RuleType::LateShiftThenEarlyShift.strength(), Strength::Soft);
    assert_eq!(RuleType::MinMonthlyHours.strength(), Strength::Deferred);
}

#[test]
fn rule_type_serializes_with_catalog_names() {
    let value = serde_json::to_value(RuleType::ShiftInterdependence).unwrap();
    assert_eq!(value, json!("SHIFT_INTERDEPENDENCE"));
    assert_eq!(RuleType::parse("SHIFT_INTERDEPENDENCE"), Some(RuleType::ShiftInterdependence));
    assert_eq!(RuleType::parse("shift_interdependence"), None);
}
