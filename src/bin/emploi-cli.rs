#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use emploi::{
    io, Chooser, ErrorBody, JsonFileStore, RandomChooser, StoreLayout, TimetableError,
    TimetableGenerator, TimetableService,
};
use serde::Serialize;
use std::fs;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération d'emplois du temps (fichiers JSON, sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Dossier racine des fichiers JSON
    #[arg(long, global = true, default_value = ".")]
    data_dir: String,

    /// Sous-dossier des emplois du temps générés
    #[arg(long, global = true, default_value = "emploit")]
    timetable_dir: String,

    /// Graine pour un tirage reproductible
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer et enregistrer l'emploi du temps d'une date
    Generate {
        #[arg(long)]
        date: String,
        /// Copie JSON supplémentaire, hors du dossier des emplois du temps
        #[arg(long)]
        json_out: Option<String>,
    },

    /// Enregistrer tel quel un emploi du temps (JSON) pour une date
    Export {
        #[arg(long)]
        date: String,
        /// Fichier JSON contenant les lignes de l'emploi du temps
        #[arg(long)]
        file: String,
    },

    /// Lister les emplois du temps enregistrés
    History,

    /// Afficher un fichier d'emploi du temps
    Show { file_name: String },

    /// Afficher tous les emplois du temps enregistrés
    Visualise,

    /// Supprimer tous les emplois du temps enregistrés
    Clear,

    /// Exporter en CSV la grille enregistrée pour une date (sans régénérer)
    Csv {
        #[arg(long)]
        date: String,
        #[arg(long)]
        out: String,
    },
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

    let result = open_store(&cli).and_then(|store| match cli.seed {
        Some(seed) => run(
            service(store, RandomChooser::seeded(seed)),
            cli.cmd,
        ),
        None => run(service(store, RandomChooser::thread()), cli.cmd),
    });

    if let Err(err) = result {
        let (body, code) = match err.downcast_ref::<TimetableError>() {
            Some(e) => {
                tracing::error!(error = %e, status = e.status(), "command failed");
                (ErrorBody::from(e), if e.is_client_error() { 2 } else { 1 })
            }
            None => (
                ErrorBody {
                    error: format!("{err:#}"),
                },
                1,
            ),
        };
        eprintln!(
            "{}",
            serde_json::to_string(&body).unwrap_or_else(|_| body.error.clone())
        );
        std::process::exit(code);
    }
}

fn open_store(cli: &Cli) -> Result<JsonFileStore> {
    let layout = StoreLayout {
        timetable_dir: cli.timetable_dir.clone(),
        ..StoreLayout::default()
    };
    JsonFileStore::open(&cli.data_dir, layout)
        .with_context(|| format!("opening data directory {}", cli.data_dir))
}

fn service<C: Chooser>(store: JsonFileStore, chooser: C) -> TimetableService<JsonFileStore, C> {
    let generator = TimetableGenerator::with_chooser(Default::default(), chooser);
    TimetableService::with_generator(store, generator)
}

fn run<C: Chooser>(mut svc: TimetableService<JsonFileStore, C>, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Generate { date, json_out } => {
            let timetable = svc.generate(&date)?;
            if let Some(path) = json_out {
                io::export_timetable_json(&path, &timetable)?;
            }
            print_json(&timetable)
        }
        Commands::Export { date, file } => {
            let raw = fs::read_to_string(&file).with_context(|| format!("reading {file}"))?;
            let timetables: serde_json::Value =
                serde_json::from_str(&raw).with_context(|| format!("parsing {file}"))?;
            svc.export(&date, timetables)?;
            print_json(&serde_json::json!({ "message": "timetable exported" }))
        }
        Commands::History => print_json(&svc.history()?),
        Commands::Show { file_name } => print_json(&svc.timetable(&file_name)?),
        Commands::Visualise => print_json(&svc.visualise()?),
        Commands::Clear => {
            let removed = svc.clear()?;
            print_json(&serde_json::json!({ "message": "timetables cleared", "removed": removed }))
        }
        Commands::Csv { date, out } => {
            let timetable = svc.stored(&date)?;
            io::export_timetable_csv(&out, &timetable, &svc.generator().calendar())?;
            println!("CSV written to {out}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
