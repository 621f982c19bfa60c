use clap::Parser;
use izvod::serialization::format_minor_units;
use izvod::{BankStatement, ConvertError, HtmlData};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "cli_converter",
    version,
    about = "Konvertuje HTML izvod banke u iBank XML notifikaciju.",
    long_about = None,
)]
struct Args {
    /// Ulazni HTML fajl
    input: PathBuf,

    /// Izlazni XML fajl (podrazumevano: ulazni fajl sa .xml ekstenzijom)
    output: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), ConvertError> {
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("input file does not exist: {}", args.input.display());
        process::exit(1)
    }

    let file = File::open(&args.input).unwrap_or_else(|err| {
        eprintln!("failed to open input file {}: {err}", args.input.display());
        process::exit(1);
    });

    let reader = io::BufReader::new(file);

    let data = HtmlData::parse(reader)?;
    let statement = BankStatement::from(data);

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("xml"));

    let mut writer = BufWriter::new(File::create(&output)?);
    statement.write_ibank(&mut writer)?;
    writer.flush()?;

    print_summary(&args.input, &statement);
    println!("\n✓ Konverzija uspešna!");

    Ok(())
}

fn print_summary(input: &Path, statement: &BankStatement) {
    let metadata = &statement.metadata;
    let currency = &metadata.currency;

    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());

    println!("✓ {file_name}");
    println!(
        "  Račun: {}",
        metadata.account_number.as_deref().unwrap_or("")
    );
    println!(
        "  Izvod #{} - {}",
        metadata.statement_number.as_deref().unwrap_or(""),
        metadata.statement_date.as_deref().unwrap_or("")
    );
    println!("  Valuta: {currency}");
    println!(
        "  Stanje: {} {currency}",
        format_minor_units(metadata.ending_balance.unwrap_or(0), '.')
    );
    println!("  Transakcije: {}", statement.transactions.len());
}
