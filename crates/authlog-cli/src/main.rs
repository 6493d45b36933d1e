// authlog CLI - SSH auth-log parsing and analysis

use std::collections::HashMap;

use authlog_core::{read_csv, write_csv, LogFileParser, SecurityEventRecord};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "authlog")]
#[command(version = "0.1.0")]
#[command(about = "Parse SSH audit logs into a structured event table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw auth log into a structured CSV table
    Parse {
        /// Path to the input log file
        input: String,

        /// Path to the output CSV file
        #[arg(short, long, default_value = "ssh-audit.csv")]
        output: String,

        /// Fallback year for syslog timestamps (default: current year)
        #[arg(short, long, env = "AUTHLOG_YEAR")]
        year: Option<i32>,
    },

    /// Descriptive statistics for a parsed CSV table
    Stats {
        /// Path to the parsed CSV file
        input: String,

        /// Top K entries to show for counts
        #[arg(short, long, default_value = "10")]
        top: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { input, output, year } => {
            run_parse(&input, &output, year)?;
        }
        Commands::Stats { input, top } => {
            run_stats(&input, top)?;
        }
    }

    Ok(())
}

fn run_parse(input: &str, output: &str, year: Option<i32>) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{} {}", "📥 Parsing:".cyan().bold(), input);
    println!("{}", "─".repeat(40).dimmed());

    let records = LogFileParser::open(input, year)?;
    let count = write_csv(output, records)?;

    println!("  {} {}", "Records:".dimmed(), count.to_string().green());
    println!("  {} {}", "Output:".dimmed(), output);
    println!("\n{} Wrote CSV: {}", "✓".green().bold(), output);

    Ok(())
}

fn run_stats(input: &str, top: usize) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_csv(input)?;

    println!("\n{} {}", "📊 SSH Audit Summary:".cyan().bold(), input);
    println!("{}", "─".repeat(60).dimmed());
    println!("  {} {}", "Rows:".dimmed(), records.len().to_string().green());

    // empty fields per string column (empty = missing)
    let mut empty_counts: [(&str, usize); 4] = [
        ("timestamp", 0),
        ("ip_address", 0),
        ("username", 0),
        ("raw_message", 0),
    ];
    for r in &records {
        for (name, count) in empty_counts.iter_mut() {
            let value = match *name {
                "timestamp" => &r.timestamp,
                "ip_address" => &r.ip_address,
                "username" => &r.username,
                _ => &r.raw_message,
            };
            if value.is_empty() {
                *count += 1;
            }
        }
    }
    println!("\n{}", "Empty fields per column:".dimmed());
    for (name, count) in empty_counts {
        println!("  {}: {}", name, count);
    }

    // value counts
    let mut event_types: HashMap<String, u64> = HashMap::new();
    let mut ips: HashMap<String, u64> = HashMap::new();
    let mut usernames: HashMap<String, u64> = HashMap::new();
    for r in &records {
        *event_types.entry(r.event_type.as_str().to_string()).or_default() += 1;
        *ips.entry(r.ip_address.clone()).or_default() += 1;
        *usernames.entry(r.username.clone()).or_default() += 1;
    }

    print_top_table("Event types", &event_types, top);
    print_top_table("Top IPs", &ips, top);
    print_top_table("Top usernames", &usernames, top);

    print_time_summary(&records, top);

    println!();
    Ok(())
}

fn top_counts(counter: &HashMap<String, u64>, top: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<(String, u64)> = counter.iter().map(|(k, v)| (k.clone(), *v)).collect();
    // highest count first; ties broken by value for stable output
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(top);
    entries
}

fn print_top_table(title: &str, counter: &HashMap<String, u64>, top: usize) {
    println!("\n{}", format!("{} (top {}):", title, top).cyan().bold());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Value", "Count"]);
    for (value, count) in top_counts(counter, top) {
        table.add_row(vec![value, count.to_string()]);
    }
    println!("{table}");
}

fn print_time_summary(records: &[SecurityEventRecord], top: usize) {
    let mut first: Option<NaiveDateTime> = None;
    let mut last: Option<NaiveDateTime> = None;
    let mut per_day: HashMap<String, u64> = HashMap::new();
    let mut per_hour: HashMap<String, u64> = HashMap::new();

    for r in records {
        let Ok(ts) = NaiveDateTime::parse_from_str(&r.timestamp, TIMESTAMP_FORMAT) else {
            continue;
        };
        if first.map_or(true, |f| ts < f) {
            first = Some(ts);
        }
        if last.map_or(true, |l| ts > l) {
            last = Some(ts);
        }
        *per_day.entry(ts.format("%Y-%m-%d").to_string()).or_default() += 1;
        *per_hour.entry(ts.format("%Y-%m-%d %H:00").to_string()).or_default() += 1;
    }

    if let (Some(first), Some(last)) = (first, last) {
        println!(
            "\n{} {} {} {}",
            "Time range:".cyan().bold(),
            first.format(TIMESTAMP_FORMAT),
            "->".dimmed(),
            last.format(TIMESTAMP_FORMAT)
        );
    }

    println!("\n{}", format!("Events per day (top {}):", top).cyan().bold());
    for (day, count) in top_counts(&per_day, top) {
        println!("  {}: {}", day, count);
    }

    println!("\n{}", format!("Events per hour (top {}):", top).cyan().bold());
    for (hour, count) in top_counts(&per_hour, top) {
        println!("  {}: {}", hour, count);
    }
}
