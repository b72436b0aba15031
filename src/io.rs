use crate::format::ScheduleTable;
use crate::model::{AssignmentMap, Employee, EmployeeId, Level, Rule};
use crate::scheduler::ScheduleResult;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Entrées du moteur telles que tenues par les collaborateurs externes :
/// liste d'employés, bibliothèque de règles, affectation des règles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub assignments: AssignmentMap,
}

pub fn load_workspace<P: AsRef<Path>>(path: P) -> anyhow::Result<Workspace> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let workspace: Workspace = serde_json::from_slice(&data)
        .with_context(|| format!("parsing workspace {}", path.display()))?;
    Ok(workspace)
}

/// Sauvegarde atomique (fichier temporaire puis renommage).
pub fn save_workspace<P: AsRef<Path>>(path: P, workspace: &Workspace) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), &serde_json::to_vec_pretty(workspace)?)
}

/// Import d'employés depuis CSV: header `name,level[,id]`
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let level = rec.get(1).context("missing level")?.trim();
        if name.is_empty() {
            bail!("invalid employee row (empty name)");
        }
        let level: Level = level
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid level for employee {name}"))?;
        let mut employee = Employee::new(name, level);
        if let Some(id) = rec.get(2).map(str::trim).filter(|id| !id.is_empty()) {
            employee.id = EmployeeId::new(id);
        }
        out.push(employee);
    }
    Ok(out)
}

/// Export JSON du résultat (jolie mise en forme)
pub fn export_result_json<P: AsRef<Path>>(path: P, result: &ScheduleResult) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), &serde_json::to_vec_pretty(result)?)
}

/// Export CSV de la table : la première ligne reprend les en-têtes.
pub fn export_table_csv<P: AsRef<Path>>(path: P, table: &ScheduleTable) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(&table.headers)?;
    for row in &table.rows {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn import_table_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<ScheduleTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = rdr.headers()?.iter().map(str::to_owned).collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        rows.push(rec?.iter().map(str::to_owned).collect());
    }
    Ok(ScheduleTable { headers, rows })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
