use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use ipv4_preimage::benchmark::benchmark_hashing;
use ipv4_preimage::{Keyspace, SearchConfig, SearchOutcome, Searcher, TargetDigest};
use log::warn;
use num_format::{Locale, ToFormattedString};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SHA-256 digest of a dotted-decimal IPv4 address, in hex
    hash: Option<String>,

    #[arg(short, long, default_value_t = num_cpus::get())]
    cores: usize,

    /// Candidates a worker tests between progress counter updates
    #[arg(long, default_value_t = ipv4_preimage::DEFAULT_BATCH_SIZE)]
    batch_size: u64,

    /// Progress line refresh interval
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// First address to test
    #[arg(long, default_value = "0.0.0.0")]
    from: Ipv4Addr,

    /// Last address to test
    #[arg(long, default_value = "255.255.255.255")]
    to: Ipv4Addr,

    /// Do not render the live progress line
    #[arg(short, long)]
    quiet: bool,

    #[arg(long)]
    benchmark: bool,
}

fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = parse_cli();
    let Some(hash) = cli.hash.as_deref() else {
        println!("Please provide a SHA-256 hash.");
        return ExitCode::from(1);
    };

    match run(&cli, hash) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn outcome_message(outcome: &SearchOutcome, keyspace: Keyspace) -> String {
    match outcome {
        SearchOutcome::Found { ip } => format!("Found! IP: {}", ip),
        SearchOutcome::Exhausted => format!("No match found in keyspace {}.", keyspace),
        SearchOutcome::Interrupted => "Interrupted.".to_string(),
    }
}

fn run(cli: &Cli, hash: &str) -> anyhow::Result<()> {
    let target = TargetDigest::from_hex(hash).context("could not read the target hash")?;
    let keyspace =
        Keyspace::new(cli.from.into(), cli.to.into()).context("could not build the keyspace")?;

    let searcher = Searcher::new(SearchConfig {
        workers: cli.cores,
        batch_size: cli.batch_size,
        report_interval: Duration::from_millis(cli.interval_ms),
        keyspace,
        report: !cli.quiet,
    })?;

    if cli.benchmark {
        println!("=== Running Single Core Benchmark (1,000,000 candidates) ===");
        let report = benchmark_hashing(1_000_000);
        println!("Duration: {:.2} seconds", report.duration_secs);
        println!("Performance: {:.2} IPs/second", report.candidates_per_sec);
        println!("===============================");
    }

    println!("Brute forcing IP hash: {}", target);
    println!(
        "Using {} CPU cores for parallel processing over {} ({} candidates)",
        cli.cores,
        keyspace,
        keyspace.total().to_formatted_string(&Locale::en)
    );

    let ctx = Arc::new(searcher.context(target)?);
    let handler_ctx = ctx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        handler_ctx.interrupt();
    }) {
        warn!("could not install Ctrl-C handler: {}", e);
    }

    let summary = searcher.run(&ctx)?;

    println!("{}", outcome_message(&summary.outcome, keyspace));
    println!("Elapsed: {:.2}", summary.elapsed.as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages() {
        let keyspace = Keyspace::new(0x0A00_0000, 0x0A00_FFFF).unwrap();
        let found = SearchOutcome::Found {
            ip: "10.0.0.1".to_string(),
        };
        assert_eq!(outcome_message(&found, keyspace), "Found! IP: 10.0.0.1");
        assert_eq!(
            outcome_message(&SearchOutcome::Exhausted, keyspace),
            "No match found in keyspace 10.0.0.0-10.0.255.255."
        );
        assert_eq!(
            outcome_message(&SearchOutcome::Interrupted, keyspace),
            "Interrupted."
        );
    }
}
