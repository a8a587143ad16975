//! Motorcycle inspection tracker CLI.
//!
//! Records structured inspections through a three-step wizard, derives an
//! overall condition score and an estimated value, and keeps finished
//! inspections as validated JSON records under `.inspector/`.

use std::io::Write;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use inspector::console::{ConsoleWizard, WizardExit, format_money};
use inspector::core::types::ConditionBand;
use inspector::exit_codes;
use inspector::io::auth::{AuthProvider, SessionFileAuth};
use inspector::io::config::load_config;
use inspector::io::init::{InitOptions, InspectorPaths, init_inspector};
use inspector::io::store::{InspectionStore, JsonFileStore};
use inspector::record::StoredInspection;

#[derive(Parser)]
#[command(
    name = "inspector",
    version,
    about = "Motorcycle inspection tracking with condition scoring"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.inspector/` scaffolding (config, record schema) if missing.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Sign in as the given user id.
    Login { user_id: String },
    /// Sign out.
    Logout,
    /// Record a new inspection through the interactive wizard.
    New,
    /// List your saved inspections, newest first.
    List,
    /// Show one saved inspection in full.
    Show { id: String },
    /// Check every stored record against the schema and invariants.
    Validate,
}

fn main() {
    inspector::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let paths = InspectorPaths::new(".");
    match cli.command {
        Command::Init { force } => cmd_init(&paths, force),
        Command::Login { user_id } => cmd_login(&paths, &user_id),
        Command::Logout => cmd_logout(&paths),
        Command::New => cmd_new(&paths),
        Command::List => cmd_list(&paths),
        Command::Show { id } => cmd_show(&paths, &id),
        Command::Validate => cmd_validate(&paths),
    }
}

fn cmd_init(paths: &InspectorPaths, force: bool) -> Result<i32> {
    init_inspector(&paths.root, &InitOptions { force })?;
    println!("Initialized {}", paths.inspector_dir.display());
    Ok(exit_codes::OK)
}

fn cmd_login(paths: &InspectorPaths, user_id: &str) -> Result<i32> {
    SessionFileAuth::new(paths.session_path.clone()).sign_in(user_id)?;
    println!("Signed in as {user_id}.");
    Ok(exit_codes::OK)
}

fn cmd_logout(paths: &InspectorPaths) -> Result<i32> {
    SessionFileAuth::new(paths.session_path.clone()).sign_out()?;
    println!("Signed out.");
    Ok(exit_codes::OK)
}

fn cmd_new(paths: &InspectorPaths) -> Result<i32> {
    ensure_initialized(paths)?;
    let auth = SessionFileAuth::new(paths.session_path.clone());
    if auth.current_user_id().is_none() {
        eprintln!("Not signed in (run `inspector login <user-id>` first).");
        return Ok(exit_codes::UNAUTHENTICATED);
    }
    let config = load_config(&paths.config_path)?;
    let store = store_for(paths);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let wizard = ConsoleWizard::new(stdin.lock(), stdout.lock(), &store, &auth, &config.currency);
    match wizard.run()? {
        WizardExit::Saved { .. } => Ok(exit_codes::OK),
        WizardExit::Aborted => Ok(exit_codes::ABORTED),
    }
}

fn cmd_list(paths: &InspectorPaths) -> Result<i32> {
    ensure_initialized(paths)?;
    let auth = SessionFileAuth::new(paths.session_path.clone());
    let Some(user_id) = auth.current_user_id() else {
        eprintln!("Not signed in (run `inspector login <user-id>` first).");
        return Ok(exit_codes::UNAUTHENTICATED);
    };
    let config = load_config(&paths.config_path)?;
    let store = store_for(paths);

    let records = store.list_inspections(&user_id, config.list_limit)?;
    if records.is_empty() {
        println!("No inspections yet (run `inspector new`).");
        return Ok(exit_codes::OK);
    }
    let mut out = std::io::stdout().lock();
    for record in &records {
        writeln!(out, "{}", list_line(record, &config.currency))?;
    }
    Ok(exit_codes::OK)
}

fn cmd_show(paths: &InspectorPaths, id: &str) -> Result<i32> {
    ensure_initialized(paths)?;
    let config = load_config(&paths.config_path)?;
    let store = store_for(paths);

    let Some(record) = store.get_inspection(id)? else {
        eprintln!("Inspection '{id}' not found.");
        return Ok(exit_codes::INVALID);
    };
    print_detail(&record, &config.currency)?;
    Ok(exit_codes::OK)
}

fn cmd_validate(paths: &InspectorPaths) -> Result<i32> {
    ensure_initialized(paths)?;
    let store = store_for(paths);
    let records = store.load_all().context("validate stored inspections")?;
    println!("{} inspection(s) valid.", records.len());
    Ok(exit_codes::OK)
}

fn ensure_initialized(paths: &InspectorPaths) -> Result<()> {
    if !paths.is_initialized() {
        anyhow::bail!(
            "missing {} (run `inspector init` first)",
            paths.inspector_dir.display()
        );
    }
    Ok(())
}

fn store_for(paths: &InspectorPaths) -> JsonFileStore {
    JsonFileStore::new(paths.inspections_dir.clone(), paths.schema_path.clone())
}

fn list_line(record: &StoredInspection, currency: &str) -> String {
    let inspection = &record.inspection;
    let band = ConditionBand::from_score(inspection.overall_score);
    let mut line = format!(
        "{}  {}  {}  {}/100 ({})",
        record.id,
        record.created_at.format("%Y-%m-%d"),
        inspection.motorcycle_name,
        inspection.overall_score,
        band.label()
    );
    if let Some(asking) = inspection.asking_price {
        line.push_str(&format!("  asking {}", format_money(currency, asking)));
    }
    if let Some(value) = inspection.estimated_value {
        line.push_str(&format!("  value {}", format_money(currency, value)));
    }
    line
}

fn print_detail(record: &StoredInspection, currency: &str) -> Result<()> {
    use inspector::core::types::Component;

    let inspection = &record.inspection;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{} ({})", inspection.motorcycle_name, record.id)?;
    writeln!(out, "Inspected: {}", record.created_at.format("%Y-%m-%d"))?;
    if let Some(year) = inspection.motorcycle_year {
        writeln!(out, "Year:      {year}")?;
    }
    if let Some(make) = &inspection.motorcycle_make {
        writeln!(out, "Make:      {make}")?;
    }
    if let Some(model) = &inspection.motorcycle_model {
        writeln!(out, "Model:     {model}")?;
    }
    if let Some(mileage) = inspection.mileage {
        writeln!(out, "Mileage:   {mileage}")?;
    }
    if let Some(location) = &inspection.inspection_location {
        writeln!(out, "Location:  {location}")?;
    }
    writeln!(out)?;
    for component in Component::ALL {
        writeln!(
            out,
            "  {:<14} {:>3}/100",
            component.label(),
            inspection.scores.get(component)
        )?;
    }
    writeln!(out)?;
    let band = ConditionBand::from_score(inspection.overall_score);
    writeln!(
        out,
        "Overall score: {}/100 ({})",
        inspection.overall_score,
        band.label()
    )?;
    if let Some(asking) = inspection.asking_price {
        writeln!(out, "Asking price:  {}", format_money(currency, asking))?;
    }
    if let Some(value) = inspection.estimated_value {
        writeln!(out, "Estimated:     {}", format_money(currency, value))?;
    }
    if let Some(notes) = &inspection.notes {
        writeln!(out)?;
        writeln!(out, "Notes: {notes}")?;
    }
    Ok(())
}
