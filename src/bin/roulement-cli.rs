#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use roulement::{
    catalog::{self, ParamKind},
    describe, io,
    io::Workspace,
    scheduler::{RunConfig, RunStatus, Scheduler},
    ShiftCatalog,
};
use std::path::Path;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning mensuel (fichiers JSON/CSV, sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de l'espace de travail (employés, règles, affectations)
    #[arg(long, global = true, default_value = "workspace.json")]
    input: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le planning d'un mois
    Generate {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Graine pour rejouer un run à l'identique
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister les types de règles et leurs paramètres
    Rules,

    /// Lister le catalogue des postes
    Shifts,

    /// Décrire les règles de l'espace de travail
    Describe,

    /// Importer des employés depuis un CSV (`name,level[,id]`)
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Generate {
            year,
            month,
            seed,
            out_json,
            out_csv,
        } => {
            let workspace = io::load_workspace(&cli.input)?;
            let config = RunConfig {
                year,
                month,
                assignments: workspace.assignments,
                seed,
            };
            let scheduler = Scheduler::new(workspace.employees, workspace.rules);
            let result = scheduler.generate(&config)?;

            if let Some(path) = out_json {
                io::export_result_json(path, &result)?;
            }
            if let Some(path) = out_csv {
                io::export_table_csv(path, &result.table)?;
            }

            println!("{}", result.table.headers.join(" | "));
            for row in &result.table.rows {
                println!("{}", row.join(" | "));
            }
            if let Some(seed) = result.seed {
                eprintln!("seed: {seed}");
            }
            for warning in &result.warnings {
                eprintln!("warning: {warning}");
            }
            for slot in &result.unassigned {
                eprintln!("unassigned: {} on {}", slot.employee_name, slot.date);
            }
            for short in &result.hours_shortfalls {
                eprintln!(
                    "below monthly hours: {} worked {:.1}h, requires {}h",
                    short.employee_name,
                    short.worked_hours(),
                    short.required_hours
                );
            }

            // Code 2 = WARNING/INCOMPLETE
            if result.status == RunStatus::Completed
                && result.unassigned.is_empty()
                && result.hours_shortfalls.is_empty()
            {
                0
            } else {
                2
            }
        }
        Commands::Rules => {
            for schema in catalog::schemas() {
                println!(
                    "{} ({}): {}",
                    schema.rule_type, schema.display_name, schema.summary
                );
                for param in schema.params {
                    match param.kind {
                        ParamKind::Choice(values) => println!(
                            "    {}: {} [{}]",
                            param.key,
                            param.kind.label(),
                            values.join("|")
                        ),
                        kind => println!("    {}: {}", param.key, kind.label()),
                    }
                }
            }
            0
        }
        Commands::Shifts => {
            for shift in ShiftCatalog::standard().iter() {
                match (shift.start_time, shift.end_time) {
                    (Some(start), Some(end)) => println!(
                        "{}: {}-{} ({} min) {}",
                        shift.name,
                        start.format("%H:%M"),
                        end.format("%H:%M"),
                        shift.duration_minutes(),
                        shift.color
                    ),
                    _ => println!("{}: rest {}", shift.name, shift.color),
                }
            }
            0
        }
        Commands::Describe => {
            let workspace = io::load_workspace(&cli.input)?;
            for rule in &workspace.rules {
                println!("{} | {}", rule.id.as_str(), describe(rule));
            }
            0
        }
        Commands::ImportEmployees { csv } => {
            let mut workspace = if Path::new(&cli.input).exists() {
                io::load_workspace(&cli.input)?
            } else {
                Workspace::default()
            };
            let employees = io::import_employees_csv(csv)?;
            if employees.is_empty() {
                bail!("no employee found in CSV");
            }
            println!("imported {} employee(s)", employees.len());
            workspace.employees.extend(employees);
            io::save_workspace(&cli.input, &workspace)?;
            0
        }
    };

    std::process::exit(code);
}
