#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use skiftplan::{
    io, swedish_holidays, JsonStore, ScheduleError, ScheduleService, TextRoster,
    WorkingTimeOptions,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning par rotation (fichier JSON local, sans serveur)
///
/// Codes de sortie : 0 succès, 1 erreur, 3 planning/équipe introuvable,
/// 4 planning déjà existant.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`, filtre via RUST_LOG)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des plannings
    #[arg(long, global = true, default_value = "schedules.json")]
    store: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lister les plannings
    List,

    /// Afficher la définition d'un planning (JSON)
    Show {
        #[arg(long)]
        name: String,
    },

    /// Créer un planning depuis un fichier JSON
    Create {
        #[arg(long)]
        file: String,
    },

    /// Supprimer un planning
    Delete {
        #[arg(long)]
        name: String,
    },

    /// Instances de postes commençant à une date
    Shifts {
        #[arg(long)]
        name: String,
        /// AAAA-MM-JJ
        #[arg(long)]
        date: String,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Instances en cours à un instant
    At {
        #[arg(long)]
        name: String,
        /// AAAA-MM-JJTHH:MM[:SS]
        #[arg(long)]
        at: String,
    },

    /// Temps travaillé / non travaillé sur un intervalle
    WorkingTime {
        #[arg(long)]
        name: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Restreindre à une équipe
        #[arg(long)]
        team: Option<String>,
        /// Retirer les pauses du temps travaillé
        #[arg(long)]
        exclude_breaks: bool,
    },

    /// Jours fériés suédois ; ajoutés au planning si `--name` est donné
    Holidays {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        year: i32,
    },

    /// Importer des périodes non travaillées depuis un CSV
    ImportPeriods {
        #[arg(long)]
        name: String,
        #[arg(long)]
        csv: String,
    },

    /// Statistiques de rotation d'une équipe
    Stats {
        #[arg(long)]
        name: String,
        #[arg(long)]
        team: String,
    },

    /// Tableau de service jour par jour (bornes incluses)
    Roster {
        #[arg(long)]
        name: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: Option<String>,
    },

    /// Exporter la définition d'un planning en JSON
    Export {
        #[arg(long)]
        name: String,
        #[arg(long)]
        out: String,
    },
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {raw}"))
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .with_context(|| format!("invalid date-time (expected YYYY-MM-DDTHH:MM[:SS]): {raw}"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScheduleError>() {
        Some(ScheduleError::NotFound(_)) => 3,
        Some(ScheduleError::AlreadyExists(_)) => 4,
        _ => 1,
    }
}

fn run(cli: Cli) -> Result<i32> {
    let options = match &cli.cmd {
        Commands::WorkingTime { exclude_breaks, .. } => WorkingTimeOptions {
            subtract_breaks: *exclude_breaks,
        },
        _ => WorkingTimeOptions::default(),
    };
    let service = ScheduleService::with_options(JsonStore::open(&cli.store)?, options);

    match cli.cmd {
        Commands::List => {
            // impression compacte
            for s in service.list_schedules()? {
                println!(
                    "{} | {} shift(s) | {} team(s) | {} non-working period(s)",
                    s.name(),
                    s.shifts().len(),
                    s.teams().len(),
                    s.non_working_periods().len()
                );
            }
        }
        Commands::Show { name } => {
            print_json(service.get_schedule(&name)?.definition())?;
        }
        Commands::Create { file } => {
            let definition = io::load_schedule_json(&file)?;
            let created = service.create_schedule(definition)?;
            println!("created {}", created.name());
        }
        Commands::Delete { name } => {
            service.delete_schedule(&name)?;
            println!("deleted {name}");
        }
        Commands::Shifts {
            name,
            date,
            out_csv,
        } => {
            let instances = service.shift_instances(&name, parse_date(&date)?)?;
            if let Some(path) = out_csv {
                io::export_instances_csv(path, &instances)?;
            }
            print_json(&instances)?;
        }
        Commands::At { name, at } => {
            print_json(&service.shift_instances_at(&name, parse_datetime(&at)?)?)?;
        }
        Commands::WorkingTime {
            name,
            from,
            to,
            team,
            ..
        } => {
            let from = parse_datetime(&from)?;
            let to = parse_datetime(&to)?;
            let wt = match team {
                Some(team) => service.team_working_time(&name, &team, from, to)?,
                None => service.working_time(&name, from, to)?,
            };
            print_json(&wt)?;
        }
        Commands::Holidays { name, year } => match name {
            Some(name) => {
                let updated = service.add_swedish_holidays(&name, year)?;
                print_json(updated.definition())?;
            }
            None => print_json(&swedish_holidays(year)?)?,
        },
        Commands::ImportPeriods { name, csv } => {
            let periods = io::import_non_working_csv(&csv)?;
            let updated = service.add_non_working_periods(&name, periods)?;
            println!(
                "{} now has {} non-working period(s)",
                updated.name(),
                updated.non_working_periods().len()
            );
        }
        Commands::Stats { name, team } => {
            print_json(&service.team_stats(&name, &team)?)?;
        }
        Commands::Roster {
            name,
            start,
            end,
            out,
        } => {
            let text =
                service.render_roster(&name, parse_date(&start)?, parse_date(&end)?, &TextRoster)?;
            match out {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("writing roster {path}"))?,
                None => print!("{text}"),
            }
        }
        Commands::Export { name, out } => {
            io::export_schedule_json(&out, service.get_schedule(&name)?.definition())?;
        }
    }
    Ok(0)
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code(&err)
        }
    };
    std::process::exit(code);
}
