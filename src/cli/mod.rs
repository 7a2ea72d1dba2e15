use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::LedgerService;
use crate::domain::{format_yen, parse_yen, sum_amounts, ExpenseRecord, Period};
use crate::io::Exporter;
use crate::storage::{CsvStore, LedgerStore, SheetConfig, SheetStore};

/// Seisan - expense-report ledger
#[derive(Parser)]
#[command(name = "seisan")]
#[command(about = "A small expense-report ledger with pluggable storage backends")]
#[command(version)]
pub struct Cli {
    /// Storage backend
    #[arg(short, long, value_enum, default_value_t = Backend::Csv)]
    pub backend: Backend,

    /// Ledger file path (csv backend only)
    #[arg(short, long, default_value = "expenses.csv")]
    pub file: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Backend {
    /// Local CSV table file
    Csv,
    /// Remote spreadsheet (configured via SEISAN_* environment variables)
    Sheet,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new expense
    Add {
        /// Submitting user's display name
        #[arg(long)]
        owner: String,

        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Who was paid
        #[arg(long)]
        payee: String,

        /// What it was for
        #[arg(long)]
        item: String,

        /// Optional note
        #[arg(long, default_value = "")]
        memo: String,

        /// Amount in whole yen (e.g. "1200" or "1,200")
        #[arg(long)]
        amount: String,
    },

    /// List expenses for a period
    List {
        /// Filter by owner
        #[arg(long)]
        owner: Option<String>,

        /// Period as YYYY-MM (defaults to the current month)
        #[arg(long)]
        period: Option<String>,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the running total for a period
    Total {
        /// Filter by owner
        #[arg(long)]
        owner: Option<String>,

        /// Period as YYYY-MM (defaults to the current month)
        #[arg(long)]
        period: Option<String>,
    },

    /// List the months present in the ledger, most recent first
    Periods,

    /// Per-owner totals for a period (admin view)
    Report {
        /// Period as YYYY-MM (defaults to the current month)
        #[arg(long)]
        period: Option<String>,

        /// Output as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete the first expense matching owner, date and amount
    Delete {
        #[arg(long)]
        owner: String,

        /// Expense date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Amount in whole yen
        #[arg(long)]
        amount: String,
    },

    /// Export expenses as CSV
    Export {
        /// Filter by owner
        #[arg(long)]
        owner: Option<String>,

        /// Period as YYYY-MM (omit to export the whole ledger)
        #[arg(long)]
        period: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.backend {
            Backend::Csv => {
                let service = LedgerService::new(CsvStore::new(&self.file));
                run_command(&service, self.command).await
            }
            Backend::Sheet => {
                let config = SheetConfig::from_env()?;
                let service = LedgerService::new(SheetStore::new(config)?);
                run_command(&service, self.command).await
            }
        }
    }
}

async fn run_command<S: LedgerStore>(
    service: &LedgerService<S>,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Add {
            owner,
            date,
            payee,
            item,
            memo,
            amount,
        } => {
            let date = match date {
                Some(s) => parse_date(&s)?,
                None => Local::now().date_naive(),
            };
            let amount = parse_yen(&amount).context("invalid --amount")?;

            let id = service
                .submit(&owner, date, &payee, &item, &memo, amount)
                .await?;
            println!("Recorded {} yen for {} ({})", format_yen(amount), owner, id);
        }

        Commands::List {
            owner,
            period,
            json,
        } => {
            let period = parse_period_or_current(period.as_deref())?;
            let records = service.list_for_period(owner.as_deref(), period).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
                return Ok(());
            }

            if records.is_empty() {
                println!("No expenses for {}", period);
                return Ok(());
            }

            println!("{:<12} {:<12} {:<20} {:<20} {:>10}", "owner", "date", "payee", "item", "amount");
            for r in &records {
                println!(
                    "{:<12} {:<12} {:<20} {:<20} {:>10}",
                    r.owner,
                    r.date,
                    r.payee,
                    r.item,
                    format_yen(r.amount)
                );
                if !r.memo.is_empty() {
                    println!("             memo: {}", r.memo);
                }
            }
            println!("Total: {} yen", format_yen(sum_amounts(&records)));
        }

        Commands::Total { owner, period } => {
            let period = parse_period_or_current(period.as_deref())?;
            let total = service.total_for_period(owner.as_deref(), period).await?;
            println!("{}: {} yen", period, format_yen(total));
        }

        Commands::Periods => {
            let periods = service.periods().await?;
            if periods.is_empty() {
                println!("Ledger is empty");
            }
            for period in periods {
                println!("{}", period);
            }
        }

        Commands::Report { period, json } => {
            let period = parse_period_or_current(period.as_deref())?;
            let report = service.monthly_report(period).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Report for {}", report.period);
            for summary in &report.owners {
                println!(
                    "  {:<12} {:>10} yen ({} entries)",
                    summary.owner,
                    format_yen(summary.total),
                    summary.count
                );
            }
            println!("  Total: {} yen", format_yen(report.total));
        }

        Commands::Delete {
            owner,
            date,
            amount,
        } => {
            let date = parse_date(&date)?;
            let amount = parse_yen(&amount).context("invalid --amount")?;

            // Match is on (owner, date, amount); payee/item play no part.
            let target = ExpenseRecord::new(&owner, date, "-", "-", amount);
            service.delete_record(&target).await?;
            println!("Deleted {} / {} / {} yen", owner, date, format_yen(amount));
        }

        Commands::Export {
            owner,
            period,
            output,
        } => {
            let exporter = Exporter::new(service);

            let count = match (period, output) {
                (Some(p), Some(path)) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path))?;
                    exporter
                        .export_period_csv(file, owner.as_deref(), p.parse()?)
                        .await?
                }
                (Some(p), None) => {
                    exporter
                        .export_period_csv(std::io::stdout(), owner.as_deref(), p.parse()?)
                        .await?
                }
                (None, Some(path)) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path))?;
                    exporter.export_all_csv(file, owner.as_deref()).await?
                }
                (None, None) => {
                    exporter
                        .export_all_csv(std::io::stdout(), owner.as_deref())
                        .await?
                }
            };

            eprintln!("Exported {} rows", count);
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date {:?}, expected YYYY-MM-DD", s))
}

fn parse_period_or_current(s: Option<&str>) -> Result<Period> {
    match s {
        Some(s) => Ok(s.parse()?),
        None => Ok(Period::of(Local::now().date_naive())),
    }
}
