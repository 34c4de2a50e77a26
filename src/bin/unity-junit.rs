//! unity-junit CLI
//!
//! Convert *.testpass / *.testfail result files into a JUnit XML report.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unity_junit::{ReportConfig, Reporter, RunReport};

#[derive(Parser, Debug)]
#[command(name = "unity-junit")]
#[command(version)]
#[command(about = "Convert *.testpass and *.testfail result files into JUnit XML")]
struct Cli {
    /// The location of your result files
    #[arg(value_name = "RESULT_FILE_DIRECTORY", default_value = "./")]
    result_file_directory: PathBuf,

    /// Prefix for file references in the verbose listing
    #[arg(value_name = "ROOT_PATH")]
    root_path: Option<String>,

    /// The name of the JUnit-formatted file (XML)
    #[arg(short, long, default_value = "result.xml")]
    output: PathBuf,

    /// Verbose output: debug logging plus failed/ignored test listings
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            if cli.verbose {
                print_listings(&report);
            }
            println!("{}", report.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    let config = ReportConfig {
        dir: cli.result_file_directory.clone(),
        output: cli.output.clone(),
        root_path: cli.root_path.clone(),
        ..Default::default()
    };

    let reporter = Reporter::new(config);
    let report = reporter.run().with_context(|| {
        format!(
            "failed to build JUnit report from '{}'",
            cli.result_file_directory.display()
        )
    })?;
    Ok(report)
}

/// `RUST_LOG` wins; otherwise `-v` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_listings(report: &RunReport) {
    let ignores = report.ignore_listing();
    if !ignores.is_empty() {
        print_section("UNITY IGNORED TEST SUMMARY", &ignores);
    }

    let failures = report.failure_listing();
    if !failures.is_empty() {
        print_section("UNITY FAILED TEST SUMMARY", &failures);
    }

    let totals = report.reported_totals();
    print_section(
        "OVERALL UNITY TEST SUMMARY",
        &[format!(
            "TOTAL TESTS: {} TOTAL FAILURES: {} IGNORED: {}",
            totals.tests, totals.failures, totals.ignored
        )],
    );
}

fn print_section(title: &str, lines: &[String]) {
    println!();
    println!("--------------------------");
    println!("{}", title);
    println!("--------------------------");
    for line in lines {
        println!("{}", line);
    }
}
