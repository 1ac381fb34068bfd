//! Stroke outcomes simulation: no therapy vs anticoagulation.
//!
//! Usage:
//!   stroke-simulate [--config <file.json>] [--population <n>] [--horizon <cycles>]
//!                   [--alpha <a>] [--wtp-min <x>] [--wtp-max <x>] [--seed <s>]
//!                   [--output <dir>]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use stroke_markov::analysis::Icer;
use stroke_markov::config::{load_config, SimulationConfig};
use stroke_markov::env_config;
use stroke_markov::error::ModelResult;
use stroke_markov::report::{save_report, PolicyReport, RunReport};
use stroke_markov::stats::{DifferenceStat, SummaryStat};

#[derive(Parser)]
#[command(name = "stroke-simulate")]
#[command(version)]
#[command(about = "Markov microsimulation of stroke outcomes under anticoagulation", long_about = None)]
struct Cli {
    /// JSON configuration file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Patients per cohort
    #[arg(short = 'n', long)]
    population: Option<u32>,

    /// Number of annual cycles
    #[arg(long)]
    horizon: Option<u32>,

    /// Significance level for confidence intervals
    #[arg(long)]
    alpha: Option<f64>,

    /// Lowest willingness-to-pay in the NMB sweep
    #[arg(long)]
    wtp_min: Option<f64>,

    /// Highest willingness-to-pay in the NMB sweep
    #[arg(long)]
    wtp_max: Option<f64>,

    /// Seed of the ICER bootstrap
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for report.json (default: $STROKE_OUTPUT_DIR or ./results)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> ModelResult<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(n) = self.population {
            config.population_size = n;
        }
        if let Some(h) = self.horizon {
            config.horizon = h;
        }
        if let Some(a) = self.alpha {
            config.alpha = a;
        }
        if let Some(w) = self.wtp_min {
            config.wtp_min = w;
        }
        if let Some(w) = self.wtp_max {
            config.wtp_max = w;
        }
        if let Some(s) = self.seed {
            config.bootstrap_seed = s;
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_stat(stat: &SummaryStat) {
    println!(
        "    {:<20} {:>12.4}  ({:.4}, {:.4})",
        stat.name, stat.mean, stat.interval.lower, stat.interval.upper
    );
}

fn print_diff(diff: &DifferenceStat) {
    println!(
        "    {:<32} {:>+12.4}  ({:+.4}, {:+.4})",
        diff.name, diff.mean, diff.interval.lower, diff.interval.upper
    );
}

fn print_policy(policy: &PolicyReport) {
    let o = &policy.outcomes;
    println!("  {} (cohort {}):", policy.therapy, policy.cohort_id);
    match &o.stat_survival_time {
        Some(stat) => print_stat(stat),
        None => println!("    {:<20} {:>12}", "Survival time", "no deaths"),
    }
    print_stat(&o.stat_num_strokes);
    print_stat(&o.stat_cost);
    print_stat(&o.stat_utility);
    println!(
        "    Deaths: {}  Censored: {}  (expected censored {:.1})",
        o.survival_times.len(),
        o.num_censored(),
        policy.expected.expected_censored(o.population_size() as u32)
    );
}

fn print_report(report: &RunReport) {
    let level = 100.0 * (1.0 - report.config.alpha);
    println!("Outcomes (mean, {level:.0}% CI):");
    print_policy(&report.control);
    print_policy(&report.treatment);
    println!();

    let inc = &report.analysis.incremental;
    println!(
        "Incremental outcomes ({} vs {}):",
        report.analysis.treatment, report.analysis.control
    );
    match &inc.survival_time {
        Some(diff) => print_diff(diff),
        None => println!("    Incremental survival time: not available"),
    }
    print_diff(&inc.num_strokes);
    print_diff(&inc.cost);
    print_diff(&inc.utility);
    println!();

    println!("Cost-effectiveness:");
    println!(
        "    {:<18} {:>12} {:>10} {:>12} {:>10}",
        "Strategy", "Cost", "QALYs", "dCost", "dQALYs"
    );
    for row in &report.analysis.cea_table {
        println!(
            "    {:<18} {:>12.2} {:>10.4} {:>12.2} {:>10.4}",
            row.strategy,
            row.mean_cost,
            row.mean_effect,
            row.incremental_cost,
            row.incremental_effect
        );
    }
    match &report.analysis.icer {
        Icer::Ratio { estimate, interval } => println!(
            "    ICER: {:.2} per QALY ({:.2}, {:.2})",
            estimate, interval.lower, interval.upper
        ),
        Icer::Undefined {
            incremental_cost,
            incremental_effect,
        } => println!(
            "    ICER: undefined (dCost {incremental_cost:.2}, dQALYs {incremental_effect:.2e})"
        ),
    }
    let nmb = &report.analysis.nmb;
    match nmb.threshold {
        Some(t) => println!("    NMB break-even willingness-to-pay: {t:.2}"),
        None => println!("    NMB break-even willingness-to-pay: none"),
    }
    match nmb.incremental.last_negative_wtp() {
        Some(wtp) => println!("    Treatment significantly worse up to willingness-to-pay {wtp:.0}"),
        None => println!("    Treatment never significantly worse over the sweep"),
    }
}

fn run(cli: &Cli) -> ModelResult<()> {
    let config = cli.resolve_config()?;
    println!(
        "Stroke Markov simulation ({} patients x {} cycles per policy)",
        config.population_size, config.horizon
    );

    let start = Instant::now();
    let report = RunReport::run(&config)?;
    println!("  Elapsed: {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);
    println!();

    print_report(&report);

    let output_dir = cli.output.clone().unwrap_or_else(env_config::output_dir);
    let path = output_dir.join("report.json");
    save_report(&report, &path)?;
    println!();
    println!("Report: {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    env_config::init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
