//! Benefits Planner CLI
//!
//! Command-line interface for running household projections

use anyhow::{Context, Result};
use benefits_planner::household::{load_plan_batch, load_plan_inputs};
use benefits_planner::{
    format_month_index, resolve_mode, FilingStatus, Language, MonthFormat, PlanReport,
    PlannerConfig, PlannerSession,
};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "planner", version, about = "Retirement and benefits projection engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Project one household and print a monthly schedule
    Project {
        /// Household JSON file
        #[arg(long)]
        inputs: PathBuf,

        /// Tenant id (unknown ids use the default tenant)
        #[arg(long)]
        tenant: Option<String>,

        /// Write the full monthly series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full report as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Display language for month labels
        #[arg(long, default_value = "en")]
        lang: String,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Project a JSON array of households in parallel
    Batch {
        /// JSON file holding an array of households
        #[arg(long)]
        inputs: PathBuf,

        #[arg(long)]
        tenant: Option<String>,

        /// Write all reports as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Resolve federal and state marginal rates for an income
    Rate {
        #[arg(long)]
        filing_status: String,

        #[arg(long)]
        jurisdiction: Option<String>,

        /// Annual adjusted gross income
        #[arg(long, allow_hyphen_values = true)]
        income: f64,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Format a month index the way reports display it
    Month {
        #[arg(allow_hyphen_values = true)]
        index: f64,

        #[arg(long, default_value = "en")]
        lang: String,

        #[arg(long)]
        short: bool,

        #[arg(long)]
        dash: bool,
    },
}

/// Overrides for settings otherwise read from the environment
#[derive(Debug, Args)]
struct SessionArgs {
    /// Rule data directory (tax_brackets.csv, eligibility_thresholds.csv)
    #[arg(long)]
    rules_dir: Option<PathBuf>,

    #[arg(long)]
    tax_year: Option<u16>,

    /// Tenant registry JSON file
    #[arg(long)]
    tenants_file: Option<PathBuf>,

    /// Projection source: local or api
    #[arg(long)]
    source: Option<String>,

    /// Ignore state tax tables
    #[arg(long)]
    federal_only: bool,
}

impl SessionArgs {
    fn into_config(self) -> PlannerConfig {
        let mut config = PlannerConfig::from_env();
        if let Some(dir) = self.rules_dir {
            config.rules_dir = dir;
        }
        if self.tax_year.is_some() {
            config.tax_year = self.tax_year;
        }
        if self.tenants_file.is_some() {
            config.tenants_file = self.tenants_file;
        }
        if let Some(source) = self.source.as_deref() {
            config.source_mode = resolve_mode(Some(source));
        }
        if self.federal_only {
            config.include_state_tax = false;
        }
        config
    }

    fn into_session(self) -> Result<PlannerSession> {
        let config = self.into_config();
        PlannerSession::new(&config)
            .with_context(|| format!("Unable to load rule data from {}", config.rules_dir.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Project { inputs, tenant, csv, json, lang, session } => {
            let session = session.into_session()?;
            let household = load_plan_inputs(&inputs)
                .with_context(|| format!("Unable to load household {}", inputs.display()))?;
            let report = session.plan(tenant.as_deref(), &household).await;
            let language = Language::normalize(Some(&lang));

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, language);
            }

            if let Some(path) = csv {
                write_csv(&path, &report, language)?;
                println!("\nFull results written to: {}", path.display());
            }
        }

        Command::Batch { inputs, tenant, output, session } => {
            let session = session.into_session()?;
            let batch = load_plan_batch(&inputs)
                .with_context(|| format!("Unable to load households {}", inputs.display()))?;
            let reports = session.plan_batch(tenant.as_deref(), &batch);

            println!("{:>5} {:>8} {:>6} {:>14} {:>12} {:>8} {:>8}",
                "#", "Months", "Juris", "Final Balance", "Peak Income", "PeakRt", "SSI");
            println!("{}", "-".repeat(70));
            for (idx, report) in reports.iter().enumerate() {
                println!("{:>5} {:>8} {:>6} {:>14.2} {:>12.2} {:>8.4} {:>8}",
                    idx + 1,
                    report.summary.total_months,
                    report.jurisdiction.as_deref().unwrap_or("-"),
                    report.summary.final_total_balance,
                    report.summary.peak_monthly_income,
                    report.summary.peak_marginal_rate,
                    ssi_label(report),
                );
            }

            if let Some(path) = output {
                let file = File::create(&path)
                    .with_context(|| format!("Unable to create {}", path.display()))?;
                serde_json::to_writer_pretty(BufWriter::new(file), &reports)?;
                println!("\nReports written to: {}", path.display());
            }
        }

        Command::Rate { filing_status, jurisdiction, income, session } => {
            let session = session.into_session()?;
            let status = FilingStatus::normalize(&filing_status)
                .with_context(|| format!("Unknown filing status '{}'", filing_status))?;
            let rules = session.engine().rules();

            let federal = rules.resolve_federal_rate(status, income);
            let state = rules.resolve_state_rate(status, jurisdiction.as_deref(), income);
            let combined = rules.resolve_combined_rate(status, jurisdiction.as_deref(), income);

            println!("Tax year:  {}", rules.tax_year().map_or("-".to_string(), |y| y.to_string()));
            println!("Federal:   {:.4}", federal);
            println!("State:     {:.4} ({})", state, jurisdiction.as_deref().unwrap_or("none"));
            println!("Combined:  {:.4}", combined);
        }

        Command::Month { index, lang, short, dash } => {
            let mut format = if short { MonthFormat::short() } else { MonthFormat::long() };
            if dash {
                format = format.with_prefix_dash();
            }
            println!("{}", format_month_index(index, Language::normalize(Some(&lang)), format));
        }
    }

    Ok(())
}

fn ssi_label(report: &PlanReport) -> &'static str {
    if report.ssi.exceeds_threshold {
        "WARN"
    } else if report.ssi.eligible_below_threshold {
        "OK"
    } else {
        "-"
    }
}

fn print_report(report: &PlanReport, language: Language) {
    let projection = &report.projection;

    println!("Tenant: {}  Source: {}  Jurisdiction: {}  Tax year: {}",
        report.tenant_id,
        report.source_mode,
        report.jurisdiction.as_deref().unwrap_or("-"),
        projection.tax_year.map_or("-".to_string(), |y| y.to_string()),
    );
    println!();

    println!("Projection Results ({} months):", projection.len());
    println!("{:>5} {:>16} {:>12} {:>12} {:>8} {:>8} {:>8} {:>14}",
        "Month", "Label", "Income", "Annualized", "FedRt", "StateRt", "MargRt", "Balance");
    println!("{}", "-".repeat(92));

    for point in projection.points.iter().take(24) {
        println!("{:>5} {:>16} {:>12.2} {:>12.2} {:>8.4} {:>8.4} {:>8.4} {:>14.2}",
            point.month_index,
            format_month_index(point.month_index as f64, language, MonthFormat::short()),
            point.income,
            point.annualized_income,
            point.federal_rate,
            point.state_rate,
            point.marginal_rate,
            point.total_balance(),
        );
    }
    if projection.len() > 24 {
        println!("... ({} more months)", projection.len() - 24);
    }

    let summary = &report.summary;
    println!("\nSummary:");
    println!("  Total Months: {}", summary.total_months);
    println!("  Total Income: ${:.2}", summary.total_income);
    println!("  Total Withdrawals: ${:.2}", summary.total_withdrawals);
    println!("  Total Benefits: ${:.2}", summary.total_benefits);
    println!("  Peak Monthly Income: ${:.2}", summary.peak_monthly_income);
    println!("  Peak Marginal Rate: {:.4}", summary.peak_marginal_rate);
    println!("  Final Balance: ${:.2}", summary.final_total_balance);

    println!("\nSSI:");
    match report.ssi_threshold {
        Some(threshold) => println!("  Monthly threshold: ${:.2}", threshold),
        None => println!("  Monthly threshold: (not in rule data)"),
    }
    println!("  Exceeds threshold: {}", report.ssi.exceeds_threshold);
    println!("  Eligible below threshold: {}", report.ssi.eligible_below_threshold);
}

fn write_csv(path: &Path, report: &PlanReport, language: Language) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Unable to create CSV file {}", path.display()))?;

    let mut header = vec![
        "Month".to_string(),
        "Label".to_string(),
        "Withdrawals".to_string(),
        "Benefits".to_string(),
        "OtherIncome".to_string(),
        "Income".to_string(),
        "AnnualizedIncome".to_string(),
        "FederalRate".to_string(),
        "StateRate".to_string(),
        "MarginalRate".to_string(),
    ];
    header.extend(report.projection.final_balances.iter().map(|b| b.account_id.clone()));
    writer.write_record(&header)?;

    for point in &report.projection.points {
        let mut record = vec![
            point.month_index.to_string(),
            format_month_index(point.month_index as f64, language, MonthFormat::long()),
            format!("{:.8}", point.withdrawals),
            format!("{:.8}", point.benefit_income),
            format!("{:.8}", point.other_income),
            format!("{:.8}", point.income),
            format!("{:.8}", point.annualized_income),
            format!("{:.8}", point.federal_rate),
            format!("{:.8}", point.state_rate),
            format!("{:.8}", point.marginal_rate),
        ];
        record.extend(point.balances.iter().map(|b| format!("{:.8}", b.balance)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
