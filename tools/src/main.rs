//! dataset-runner: headless fundraising dataset generator.
//!
//! Usage:
//!   dataset-runner --config config.json --seed 12345 --out ./output
//!   dataset-runner --config config.yml --format both

use anyhow::{bail, Result};
use fundraising_core::{
    config::GeneratorConfig,
    engine::{DatasetSummary, GenEngine},
    export::{write_contacts_csv, write_transactions_csv, ExportFormat},
    Dataset,
};
use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let Some(config_path) = str_arg(&args, "--config") else {
        bail!("missing --config <path.yml|path.json>");
    };
    let out_dir = str_arg(&args, "--out").unwrap_or("./output");
    let formats = match str_arg(&args, "--format").unwrap_or("internal") {
        "both" => vec![ExportFormat::Internal, ExportFormat::Crm],
        other => match ExportFormat::parse(other) {
            Some(f) => vec![f],
            None => bail!("unknown --format '{other}' (expected internal, crm or both)"),
        },
    };

    println!("Fundraising dataset — dataset-runner");
    println!("  config:  {config_path}");
    println!("  seed:    {seed}");
    println!("  out:     {out_dir}");
    println!();

    let config = GeneratorConfig::load(config_path)?;
    let engine = GenEngine::new(&config, seed)?;
    let (dataset, summary) = engine.run_with_summary()?;

    fs::create_dir_all(out_dir)?;
    for format in formats {
        write_dataset(&dataset, Path::new(out_dir), format)?;
    }
    print_summary(&config, &dataset, &summary);
    Ok(())
}

fn write_dataset(dataset: &Dataset, dir: &Path, format: ExportFormat) -> Result<()> {
    let (txn_file, contact_file) = match format {
        ExportFormat::Internal => ("transactions.csv", "contacts.csv"),
        ExportFormat::Crm => ("Gift_Transaction.csv", "Contact.csv"),
    };
    let txn_path = dir.join(txn_file);
    write_transactions_csv(BufWriter::new(File::create(&txn_path)?), &dataset.transactions, format)?;
    let contact_path = dir.join(contact_file);
    write_contacts_csv(BufWriter::new(File::create(&contact_path)?), &dataset.contacts, format)?;
    log::info!("wrote {} and {}", txn_path.display(), contact_path.display());
    Ok(())
}

fn print_summary(config: &GeneratorConfig, dataset: &Dataset, summary: &DatasetSummary) {
    let avg = if summary.transactions == 0 {
        0.0
    } else {
        summary.total_donated / summary.transactions as f64
    };

    println!("=== RUN SUMMARY ===");
    println!("  years:          {} (from {})", config.years, config.first_year);
    println!("  channels:       {}", config.channels.len());
    println!("  campaigns run:  {}", summary.campaigns_run);
    println!("  transactions:   {}", summary.transactions);
    println!("  contacts:       {}", summary.contacts);
    println!("  total donated:  {:.2}", summary.total_donated);
    println!("  avg donation:   {avg:.2}");

    println!();
    println!("=== BY CHANNEL ===");
    for channel in config.channels.keys() {
        let (n, sum) = dataset
            .transactions
            .iter()
            .filter(|t| &t.channel == channel)
            .fold((0usize, 0.0f64), |(n, s), t| (n + 1, s + t.donation_amount));
        println!("  {channel:<16} | txns: {n:>7} | donated: {sum:.0}");
    }
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
