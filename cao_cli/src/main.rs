//! # Assistant CAO CLI
//!
//! Runs any calculator page from the terminal. The engine memo and the
//! calculation history live in a session file, so running `stirling` first
//! pre-fills the detail pages of later runs.
//!
//! ```text
//! cao_cli list
//! cao_cli run stirling -s puissance=5000
//! cao_cli run piston --svg piston.svg
//! cao_cli run drone-structure -s corde=1000 -s epaisseur=120 --csv profil.csv
//! cao_cli --json run iso -s diametre=25 -s arbre=k6
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use cao_core::calculations::rdm::mass_to_force;
use cao_core::file_io::{load_session_or_default, save_session, FileLock};
use cao_core::forms::{parse_assignment, FieldKind, FieldValues};
use cao_core::materials::{CATALOGUE, MATERIALS};
use cao_core::pages::{submit, Page};
use cao_core::session::{Session, Settings};
use cao_core::{export, CalcError};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cao_cli", version, about = "Assistant de CAO - calculs de conception mécanique")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Session file holding settings, engine memo and history
    #[arg(long, global = true, default_value = "session.cao")]
    session: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the pages
    List,
    /// Show the fields of a page with their current defaults
    Fields {
        page: String,
    },
    /// Run a calculator page
    Run {
        page: String,
        /// Field assignment, repeatable
        #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Export the generated curve as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Export the schematic as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Do not write the session file
        #[arg(long)]
        no_save: bool,
    },
    /// Convert a mass (kg) to a force
    Convert {
        mass_kg: f64,
    },
    /// Show the material tables
    Materials,
    /// Inspect or change the session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    /// Settings, memo and history summary
    Show,
    /// Forget the memo and history
    Reset,
    /// Change settings (tol, gravite, logo, csv_decimales, latitude, longitude)
    Set {
        #[arg(value_name = "KEY=VALUE", required = true)]
        assignments: Vec<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<CalcError>() {
                Some(calc) if args.json => {
                    if let Ok(json) = serde_json::to_string_pretty(calc) {
                        eprintln!("{}", json);
                    }
                }
                Some(calc) => eprintln!("{}", calc.user_message()),
                None => eprintln!("Erreur : {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "cao_core=debug,cao_cli=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Commands::List => {
            for page in Page::ALL {
                let kind = if page.is_calculator() { "" } else { " (sans calcul)" };
                println!("{:<18} {}{}", page.slug(), page.title(), kind);
            }
            Ok(())
        }
        Commands::Fields { page } => {
            let page: Page = page.parse()?;
            let session = open_session(&args.session)?;
            show_fields(page, &page.defaults(&session.context()));
            Ok(())
        }
        Commands::Run {
            page,
            set,
            csv,
            svg,
            no_save,
        } => run_page(args, page, set, csv.as_deref(), svg.as_deref(), *no_save),
        Commands::Convert { mass_kg } => {
            let session = open_session(&args.session)?;
            let conversion = mass_to_force(*mass_kg, session.settings.gravity)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&conversion)?);
            } else {
                println!("{}", conversion);
            }
            Ok(())
        }
        Commands::Materials => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&MATERIALS)?);
                return Ok(());
            }
            println!("{:<20} {:>12} {:>10}", "Matériau", "E (MPa)", "Re (MPa)");
            for m in MATERIALS.iter() {
                println!("{:<20} {:>12.0} {:>10.0}", m.name, m.e_mpa, m.re_mpa);
            }
            println!();
            for card in CATALOGUE.iter() {
                println!("{}", card.name);
                for line in card.body().lines() {
                    println!("  {}", line);
                }
            }
            Ok(())
        }
        Commands::Session { action } => session_command(args, action),
    }
}

fn run_page(
    args: &Args,
    page: &str,
    assignments: &[String],
    csv: Option<&Path>,
    svg: Option<&Path>,
    no_save: bool,
) -> Result<()> {
    let page: Page = page.parse()?;
    if !page.is_calculator() {
        bail!("la page '{}' n'a pas de calcul", page.slug());
    }

    let _lock = if no_save { None } else { Some(lock_session(&args.session)?) };
    let mut session = open_session(&args.session)?;

    let mut values = page.defaults(&session.context());
    let keys: Vec<&str> = page.fields().iter().map(|f| f.key).collect();
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        if !keys.contains(&key.as_str()) {
            bail!("champ inconnu '{}' pour {} (champs : {})", key, page.slug(), keys.join(", "));
        }
        values.set(key, value);
    }

    let output = submit(page, &values, &mut session)?.context("aucun calcul pour cette page")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", output.plan());
        for notice in output.notices() {
            eprintln!("! {}", notice);
        }
    }

    if let Some(path) = csv {
        let (header, points) = output
            .curve()
            .with_context(|| format!("{} ne produit pas de courbe", page.slug()))?;
        export::write_csv(path, header, &points, session.settings.csv_decimals)?;
        eprintln!("CSV exporté : {}", path.display());
    }
    if let Some(path) = svg {
        let schematic = output
            .schematic()
            .with_context(|| format!("{} ne produit pas de schéma", page.slug()))?;
        export::write_svg(path, &schematic)?;
        eprintln!("Schéma exporté : {}", path.display());
    }

    if !no_save {
        save_session(&session, &args.session)?;
    }
    Ok(())
}

fn session_command(args: &Args, action: &SessionAction) -> Result<()> {
    match action {
        SessionAction::Show => {
            let session = open_session(&args.session)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&session)?);
                return Ok(());
            }
            println!("Session : {}", args.session.display());
            println!("Auteur : {}", session.meta.author);
            println!("Modifiée : {}", session.meta.modified.format("%Y-%m-%d %H:%M"));
            println!();
            show_settings(&session.settings);
            println!();
            match &session.memo {
                Some(m) => println!(
                    "Moteur mémorisé : {:.0} W, {} cyl., Ø{:.1} x {:.1} mm, {:.0} tr/min",
                    m.power_w, m.cylinders, m.bore_mm, m.stroke_mm, m.rpm
                ),
                None => println!("Aucun moteur mémorisé"),
            }
            println!("Historique : {} calcul(s)", session.history.len());
            for entry in session.history.iter().rev().take(10) {
                println!("  {}  {}", entry.at.format("%Y-%m-%d %H:%M:%S"), entry.item.calc_type());
            }
            Ok(())
        }
        SessionAction::Reset => {
            let _lock = lock_session(&args.session)?;
            let mut session = open_session(&args.session)?;
            session.reset();
            save_session(&session, &args.session)?;
            println!("Session réinitialisée");
            Ok(())
        }
        SessionAction::Set { assignments } => {
            let _lock = lock_session(&args.session)?;
            let mut session = open_session(&args.session)?;
            for assignment in assignments {
                let (key, value) = parse_assignment(assignment)?;
                session.settings.apply(&key, &value)?;
            }
            session.touch();
            save_session(&session, &args.session)?;
            show_settings(&session.settings);
            Ok(())
        }
    }
}

fn open_session(path: &Path) -> Result<Session> {
    load_session_or_default(path, &whoami::username())
        .with_context(|| format!("lecture de la session {}", path.display()))
}

fn lock_session(path: &Path) -> Result<FileLock> {
    Ok(FileLock::acquire(path, whoami::username())?)
}

fn show_fields(page: Page, values: &FieldValues) {
    println!("{} ({})", page.title(), page.slug());
    for spec in page.fields() {
        let hint = match spec.kind {
            FieldKind::Choice(options) => format!(" [{}]", options.join(" | ")),
            FieldKind::Material => " [matériau, voir `materials`]".to_string(),
            FieldKind::Integer => " [entier]".to_string(),
            FieldKind::Number | FieldKind::Text => String::new(),
        };
        println!("  {:<18} {:<36} = {}{}", spec.key, spec.label, values.raw(spec.key), hint);
    }
}

fn show_settings(settings: &Settings) {
    println!("Paramètres :");
    for key in Settings::KEYS {
        println!("  {:<14} {}", key, settings.get(key).unwrap_or_default());
    }
}
