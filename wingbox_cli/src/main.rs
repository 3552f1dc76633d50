//! # Wingbox CLI
//!
//! Command-line runner for wing-box load cases.
//!
//! ```text
//! wingbox template case.wbx          # write the demonstration case
//! wingbox validate case.wbx          # load and check a case file
//! wingbox run case.wbx --out r.json  # run the pipeline, save the report
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use wingbox_core::report::names;
use wingbox_core::{file_io, Analysis, AnalysisReport, AnalysisScope, CaseFile};

#[derive(Parser, Debug)]
#[command(name = "wingbox")]
#[command(version)]
#[command(about = "Wing-box load, deflection and buckling-margin analysis")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the analysis pipeline on a case file
    Run {
        /// Case file (.wbx)
        case: PathBuf,
        /// Write the JSON report here
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Worker threads (defaults to the case setting)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Run only one branch of the pipeline
        #[arg(long, value_enum)]
        only: Option<Only>,
    },
    /// Load a case file and check it without running
    Validate {
        case: PathBuf,
    },
    /// Write the demonstration case to a file
    Template {
        path: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Only {
    Deflection,
    Twist,
    Stress,
}

impl From<Only> for AnalysisScope {
    fn from(only: Only) -> Self {
        match only {
            Only::Deflection => AnalysisScope::Deflection,
            Only::Twist => AnalysisScope::Twist,
            Only::Stress => AnalysisScope::Stress,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let outcome = match args.command {
        Commands::Run {
            case,
            out,
            workers,
            only,
        } => run(&case, out.as_deref(), workers, only),
        Commands::Validate { case } => validate(&case).map(|_| true),
        Commands::Template { path } => template(&path).map(|_| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(core) = e.downcast_ref::<wingbox_core::WingBoxError>() {
                if let Ok(json) = serde_json::to_string_pretty(core) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Run a case; `Ok(false)` when a structural check failed
fn run(path: &Path, out: Option<&Path>, workers: Option<usize>, only: Option<Only>) -> Result<bool> {
    let mut case = file_io::load_case_file(path).with_context(|| format!("loading {}", path.display()))?;
    if workers.is_some() {
        case.settings.workers = workers;
    }
    if let Some(only) = only {
        case.settings.analyses = only.into();
    }

    let analysis = Analysis::from_case(&case).context("preparing analysis")?;
    let report = analysis.run().context("running analysis")?;
    print_report(&report);

    if let Some(out) = out {
        file_io::save_report(&report, out).with_context(|| format!("saving report to {}", out.display()))?;
        println!("Report written to {}", out.display());
    }
    Ok(report.passed())
}

fn validate(path: &Path) -> Result<()> {
    let case = file_io::load_case_file(path).with_context(|| format!("loading {}", path.display()))?;
    let wing = case.load_case.wing();
    let wing_box = wing.wing_box();
    println!("Case '{}' is valid", case.name);
    println!(
        "  Box:      {:.2} - {:.2} m, {} sections, {}",
        wing_box.start_y(),
        wing_box.end_y(),
        wing_box.sections().len(),
        wing_box.material().name
    );
    println!("  Grid:     {} positions (step {} m)", case.load_case.grid().len(), case.load_case.step());
    println!("  Engine:   {}", if wing.engine().is_some() { "yes" } else { "no" });
    println!("  Fuel:     {}", if wing.fuel_tank().is_some() { "yes" } else { "no" });
    Ok(())
}

fn template(path: &Path) -> Result<()> {
    let case = CaseFile::sample().context("building demonstration case")?;
    file_io::save_case_file(&case, path).with_context(|| format!("writing {}", path.display()))?;
    println!("Demonstration case written to {}", path.display());
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("═══════════════════════════════════════");
    println!("  WING BOX ANALYSIS: {}", report.meta.case_name);
    println!("═══════════════════════════════════════");
    println!();
    println!("Trim:");
    println!("  Blend:    {:.3}", report.trim.blend);
    println!("  AoA:      {:.2} deg", report.trim.aoa_deg);
    println!("  q:        {:.0} Pa", report.trim.dynamic_pressure);
    println!("  Weight:   {:.0} N (box structure)", report.structure_weight);
    println!();

    println!("Peaks:");
    for (name, unit) in [
        (names::SHEAR, "N"),
        (names::MOMENT, "Nm"),
        (names::TORSION, "Nm"),
        (names::DEFLECTION, "m"),
        (names::TWIST, "rad"),
    ] {
        if let Some(peak) = report.peak(name) {
            println!("  {:<11} {:>12.4e} {:<3} at y = {:.2} m", name, peak.value, unit, peak.y);
        }
    }
    println!();

    println!("Checks:");
    for check in report.checks() {
        println!("  {:<20} {:<6} {}", check.name, status_icon(check.passed), check.detail);
    }
    println!();

    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if report.passed() { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
