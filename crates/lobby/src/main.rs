use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands::*, SearchArgs};
use colored::Colorize;
use dotenv::dotenv;
use lobby_lda::{resolve_credential, search, ConfigError, FetchOptions, Lda, ReportType};
use lobby_util::{render_table, save_csv};
use tracing::{debug, subscriber, trace, Level};
use tracing_subscriber::FmtSubscriber;

mod cli;
mod ui;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    let my_subscriber = FmtSubscriber::builder()
        .with_max_level(trace_level)
        .with_writer(std::io::stderr)
        .finish();
    subscriber::set_global_default(my_subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    preprocess(cli.trace.into())?;
    trace!("tracing at {:?}", cli.trace);

    // cli framework:
    // "> lobby <COMMAND>"
    match &cli.command {
        // "> lobby search --registrant AARP --report-type Q1 --csv"
        // page through the filings endpoint and show/export the result
        Search(args) => run_search(args).await?,

        // "> lobby report-types"
        ReportTypes => {
            for rt in ReportType::ALL {
                println!("{:<4}{}", rt.code().bold(), rt.description());
            }
        }
    }

    Ok(())
}

fn config_error(e: &ConfigError) {
    eprintln!("{} {e}", "⚠️  Configuration error:".red().bold());
}

async fn run_search(args: &SearchArgs) -> Result<()> {
    // 1. credentials, before anything touches the network
    let api_key = match resolve_credential(args.api_key.as_deref()) {
        Ok(key) => key,
        Err(e) => {
            config_error(&e);
            return Ok(());
        }
    };
    let lda = match &args.base_url {
        Some(url) => Lda::with_base_url(&api_key, url),
        None => Lda::new(&api_key),
    };
    let lda = match lda {
        Ok(lda) => lda,
        Err(e) => {
            config_error(&e);
            return Ok(());
        }
    };

    // 2. fetch & normalize
    let query = args.query();
    debug!("searching: {query:?}");
    let options = FetchOptions {
        page_cap: args.max_pages,
        ..Default::default()
    };
    let pb = ui::page_bar(args.max_pages);
    let report = search(&lda, &query, &options, |progress| ui::advance(&pb, progress)).await;
    pb.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            config_error(&e);
            return Ok(());
        }
    };

    for warning in &report.warnings {
        eprintln!("{} {warning}", "⚠️ ".yellow());
    }
    if let Some(e) = report.fetch_error() {
        debug!("search stopped after {} page(s)", report.pages);
        eprintln!("{}", e.to_string().red());
    }

    // 3. show & export
    if report.is_empty() {
        println!("{}", "No records found matching your criteria.".yellow());
        return Ok(());
    }
    println!(
        "{}",
        format!("Found {} records.", report.table.len()).green()
    );

    if !args.no_table {
        println!("{}", render_table(&report.table));
    }

    if let Some(path) = &args.csv {
        save_csv(&report.table, path)?;
        println!("Saved {} rows to {}", report.table.len(), path.display());
    }

    Ok(())
}
