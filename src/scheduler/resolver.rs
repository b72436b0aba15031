use super::DataWarning;
use crate::catalog::RuleType;
use crate::model::{AssignmentMap, EmployeeId, Rule, RuleId};
use crate::rules::{Constraint, EffectiveRule, EffectiveRuleSet};
use crate::shifts::ShiftCatalog;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Règles effectives d'un employé et avertissements rencontrés en route.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub rules: EffectiveRuleSet,
    pub warnings: Vec<DataWarning>,
}

/// Fusionne règles globales et personnelles. Fonction pure de l'affectation
/// et de la bibliothèque de règles.
#[derive(Debug)]
pub struct RuleResolver<'a> {
    rules: HashMap<&'a RuleId, &'a Rule>,
    assignments: &'a AssignmentMap,
    shifts: &'a ShiftCatalog,
}

impl<'a> RuleResolver<'a> {
    pub fn new(rules: &'a [Rule], assignments: &'a AssignmentMap, shifts: &'a ShiftCatalog) -> Self {
        let mut by_id = HashMap::with_capacity(rules.len());
        for rule in rules {
            // un id dupliqué garde sa première définition
            by_id.entry(&rule.id).or_insert(rule);
        }
        Self {
            rules: by_id,
            assignments,
            shifts,
        }
    }

    pub fn resolve(&self, employee: &EmployeeId) -> Resolution {
        let mut seen: HashSet<&RuleId> = HashSet::new();
        let mut out = Resolution::default();
        let mut effective = Vec::new();

        let ids = self
            .assignments
            .global
            .iter()
            .chain(self.assignments.personal(employee));

        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            let Some(rule) = self.rules.get(id) else {
                debug!(rule = %id, employee = %employee, "dangling rule reference skipped");
                out.warnings.push(DataWarning::DanglingRule { rule_id: id.clone() });
                continue;
            };
            let Some(rule_type) = RuleType::parse(&rule.rule_type) else {
                out.warnings.push(DataWarning::UnknownRuleType {
                    rule_id: id.clone(),
                    rule_type: rule.rule_type.clone(),
                });
                continue;
            };
            match Constraint::parse(rule_type, &rule.params, self.shifts) {
                Ok(constraint) => effective.push(EffectiveRule {
                    id: id.clone(),
                    name: rule.name.clone(),
                    constraint,
                }),
                Err(err) => out.warnings.push(DataWarning::MalformedParams {
                    rule_id: id.clone(),
                    reason: err.to_string(),
                }),
            }
        }

        out.rules = EffectiveRuleSet::new(effective);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Params;
    use serde_json::json;

    fn rule(id: &str, rule_type: &str, params: serde_json::Value) -> Rule {
        Rule {
            id: RuleId::new(id),
            name: id.to_owned(),
            rule_type: rule_type.to_owned(),
            params: match params {
                serde_json::Value::Object(map) => map,
                _ => Params::new(),
            },
        }
    }

    #[test]
    fn merges_global_then_personal_without_duplicates() {
        let shifts = ShiftCatalog::standard();
        let rules = vec![
            rule("hours", "MIN_MONTHLY_HOURS", json!({"hours": 100})),
            rule("level", "REQUIRED_LEVEL_FOR_SHIFT", json!({"level": "bartender", "shift": "14-22"})),
        ];
        let alice = EmployeeId::new("alice");
        let mut map = AssignmentMap::new();
        map.add_global(RuleId::new("hours"));
        map.assign(alice.clone(), RuleId::new("level"));
        map.assign(alice.clone(), RuleId::new("hours"));

        let resolver = RuleResolver::new(&rules, &map, &shifts);
        let resolved = resolver.resolve(&alice);
        let ids: Vec<&str> = resolved.rules.ids().map(RuleId::as_str).collect();
        assert_eq!(ids, ["hours", "level"]);
        assert!(resolved.warnings.is_empty());

        let bob = resolver.resolve(&EmployeeId::new("bob"));
        assert_eq!(bob.rules.len(), 1);
    }

    #[test]
    fn skips_dangling_unknown_and_malformed_rules() {
        let shifts = ShiftCatalog::standard();
        let rules = vec![
            rule("legacy", "MAX_HOURS_PER_WEEK", json!({"hours": 40})),
            rule("broken", "ASSIGN_SPECIFIC_SHIFT", json!({"date": "2025-03-01"})),
        ];
        let mut map = AssignmentMap::new();
        map.add_global(RuleId::new("ghost"))
            .add_global(RuleId::new("legacy"))
            .add_global(RuleId::new("broken"));

        let resolved = RuleResolver::new(&rules, &map, &shifts).resolve(&EmployeeId::new("x"));
        assert!(resolved.rules.is_empty());
        assert_eq!(
            resolved.warnings,
            vec![
                DataWarning::DanglingRule { rule_id: RuleId::new("ghost") },
                DataWarning::UnknownRuleType {
                    rule_id: RuleId::new("legacy"),
                    rule_type: "MAX_HOURS_PER_WEEK".into(),
                },
                DataWarning::MalformedParams {
                    rule_id: RuleId::new("broken"),
                    reason: "missing parameter `shift`".into(),
                },
            ]
        );
    }
}
