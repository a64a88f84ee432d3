//! Command surface for the weekly meal planner: validate a data
//! directory, or generate `plan.json` + `shopping_list.json` from it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use week_planner_lib::constraints_solver::{solve_plan, SolveOptions};
use week_planner_lib::data_access::load_catalog;
use week_planner_lib::data_types::expand_variants;
use week_planner_lib::plan_render::materialize_plan;
use week_planner_lib::shopping::generate_shopping_list;

#[derive(Parser)]
#[command(name = "week-planner", version, about = "Weekly meal plan generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and cross-validate a data directory
    ValidateData { data_dir: PathBuf },
    /// Solve the week and write plan.json and shopping_list.json
    GeneratePlan {
        data_dir: PathBuf,
        output_dir: PathBuf,
        /// Solver seed; the same data and seed reproduce the same plan
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::ValidateData { data_dir } => validate_data(&data_dir),
        Command::GeneratePlan {
            data_dir,
            output_dir,
            seed,
        } => generate_plan(&data_dir, &output_dir, seed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn validate_data(data_dir: &Path) -> anyhow::Result<()> {
    println!("Loading data from {}...", data_dir.display());
    let catalog = load_catalog(data_dir)?;

    println!("Loaded {} ingredients", catalog.ingredients().len());
    println!("Loaded {} recipes", catalog.recipes().len());
    println!(
        "Loaded rules with {} days, {} meals",
        catalog.rules().week.days.len(),
        catalog.rules().week.meals.len()
    );
    println!("Loaded {} pantry items", catalog.pantry().len());
    println!("All validation passed");
    Ok(())
}

fn generate_plan(data_dir: &Path, output_dir: &Path, seed: u64) -> anyhow::Result<()> {
    println!("Loading data from {}...", data_dir.display());
    let catalog = load_catalog(data_dir)?;
    let variants = expand_variants(&catalog);

    println!("Generating plan with seed {seed}...");
    let options = SolveOptions {
        seed,
        ..SolveOptions::default()
    };
    let assignment = solve_plan(&catalog, &variants, &options)?;

    let plan = materialize_plan(&assignment, &variants, &catalog, seed, Local::now());
    let shopping = generate_shopping_list(&assignment, &variants, &catalog);

    // Serialize both artifacts before touching the filesystem so a
    // failure never leaves a partial output directory behind.
    let plan_json = serde_json::to_string_pretty(&plan).context("serializing plan")?;
    let shopping_json =
        serde_json::to_string_pretty(&shopping).context("serializing shopping list")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let plan_path = output_dir.join("plan.json");
    fs::write(&plan_path, plan_json)
        .with_context(|| format!("writing {}", plan_path.display()))?;
    let shopping_path = output_dir.join("shopping_list.json");
    fs::write(&shopping_path, shopping_json)
        .with_context(|| format!("writing {}", shopping_path.display()))?;
    println!(
        "Wrote plan.json and shopping_list.json to {}",
        output_dir.display()
    );

    println!("\nPlan statistics:");
    println!("Protein counts:");
    for (protein, count) in &plan.derived.protein_counts {
        println!("  {protein}: {count}");
    }
    if !plan.derived.carb_counts.is_empty() {
        println!("Carb counts:");
        for (carb, count) in &plan.derived.carb_counts {
            println!("  {carb}: {count}");
        }
    }
    Ok(())
}
