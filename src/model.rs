use crate::catalog::RuleType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Niveau de poste (ensemble fermé).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    Bartender,
    DoorStaff,
}

impl Level {
    pub const ALL: [Level; 2] = [Level::Bartender, Level::DoorStaff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Bartender => "bartender",
            Level::DoorStaff => "door-staff",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s.trim())
            .ok_or_else(|| format!("unknown level: {s}"))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employé, tel que fourni par le référentiel externe (lecture seule pour le moteur).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub level: Level,
}

impl Employee {
    pub fn new<N: Into<String>>(name: N, level: Level) -> Self {
        Self {
            id: EmployeeId::random(),
            name: name.into(),
            level,
        }
    }

    pub fn with_id<I: AsRef<str>, N: Into<String>>(id: I, name: N, level: Level) -> Self {
        Self {
            id: EmployeeId::new(id),
            name: name.into(),
            level,
        }
    }
}

/// Identifiant fort pour Rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

impl RuleId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sac de paramètres d'une règle, tel que stocké par la bibliothèque de règles.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Règle saisie par l'utilisateur.
///
/// `rule_type` reste une chaîne : une bibliothèque peut contenir des types
/// inconnus du moteur, qui sont alors ignorés avec un avertissement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub rule_type: String,
    #[serde(default)]
    pub params: Params,
}

impl Rule {
    pub fn new<N: Into<String>>(name: N, rule_type: RuleType, params: Params) -> Self {
        Self {
            id: RuleId::random(),
            name: name.into(),
            rule_type: rule_type.as_str().to_owned(),
            params,
        }
    }

    pub fn with_id<I: AsRef<str>>(mut self, id: I) -> Self {
        self.id = RuleId::new(id);
        self
    }

    pub fn kind(&self) -> Option<RuleType> {
        RuleType::parse(&self.rule_type)
    }
}

/// Liaison employés ↔ règles pour un run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentMap {
    #[serde(default)]
    pub global: Vec<RuleId>,
    #[serde(default)]
    pub employees: BTreeMap<EmployeeId, Vec<RuleId>>,
}

impl AssignmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_global(&mut self, rule: RuleId) -> &mut Self {
        if !self.global.contains(&rule) {
            self.global.push(rule);
        }
        self
    }

    pub fn assign(&mut self, employee: EmployeeId, rule: RuleId) -> &mut Self {
        let rules = self.employees.entry(employee).or_default();
        if !rules.contains(&rule) {
            rules.push(rule);
        }
        self
    }

    pub fn personal(&self, employee: &EmployeeId) -> &[RuleId] {
        self.employees
            .get(employee)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
