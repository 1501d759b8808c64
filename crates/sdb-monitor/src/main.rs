use anyhow::{bail, Context, Result};
use clap::Parser;
use sdb_lexer::{init_rules, Lexer};
use sdb_monitor::logging::initialize_logging;
use sdb_monitor::{check_corpus, Monitor, MonitorConfig, SimMachine};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

/// Simple debugger monitor over a simulated RV32 machine.
#[derive(Debug, Parser)]
#[command(name = "sdb", version, about)]
struct Args {
    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run to completion without prompting
    #[arg(short, long)]
    batch: bool,

    /// Check an expression corpus (`<expected> <expr>` per line) and exit
    #[arg(long, value_name = "PATH")]
    corpus: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = MonitorConfig::load_or_default(args.config.as_deref())?;
    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    initialize_logging(level).with_context(|| format!("invalid log level `{level}`"))?;
    init_rules();

    let machine = SimMachine::demo(config.memory_base, config.memory_size);

    if let Some(path) = &args.corpus {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let report = check_corpus(BufReader::new(file), &Lexer::new(config.limits), &machine)?;
        for failure in &report.failures {
            eprintln!("{failure}");
        }
        println!("{}/{} expressions passed", report.passed, report.total());
        if !report.is_ok() {
            bail!("{} corpus case(s) failed", report.failures.len());
        }
        return Ok(());
    }

    let mut monitor = Monitor::new(machine, config.limits);
    info!(limits = ?config.limits, "monitor started");

    if args.batch {
        let outcome = monitor.execute_line("c")?;
        if !outcome.output.is_empty() {
            println!("{}", outcome.output);
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("(sdb) ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        match monitor.execute_line(&line?) {
            Ok(outcome) => {
                if !outcome.output.is_empty() {
                    println!("{}", outcome.output);
                }
                if outcome.quit {
                    break;
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }
    Ok(())
}
