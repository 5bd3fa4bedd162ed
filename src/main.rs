//! CLI binary for AVL Parser
//!
//! File mode decodes hex-dump or raw binary captures and prints/export
//! results; listen mode runs the TCP collector that devices connect to.

use anyhow::{anyhow, Context, Result};
use avl_parser::export::record_row;
use avl_parser::server::{Collector, CollectorConfig};
use avl_parser::types::AvlRecord;
use avl_parser::{parse_avl_bytes, parse_avl_hex};
use clap::{Arg, Command};
use glob::glob;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn cli() -> Command {
    Command::new("AVL Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode Teltonika-style AVL telemetry captures, or collect them over TCP.")
        .arg(
            Arg::new("files")
                .help("Capture files to decode (hex dump text or raw binary; supports globbing)")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Print every decoded record")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export decoded records to a .csv file next to each input")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export decoded records to a .json file next to each input (requires the json feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for export files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .help("Run the TCP collector on this address, e.g. 0.0.0.0:3030")
                .value_name("ADDR"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Directory for collector CSV logs (default: ./data)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("allowed-imei")
                .long("allowed-imei")
                .help("Accept only this device identity; repeat for several (default: accept all)")
                .value_name("IMEI")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("read-timeout")
                .long("read-timeout")
                .help("Idle seconds after which a device payload is considered complete")
                .value_name("SECS")
                .default_value("30"),
        )
}

fn main() -> Result<()> {
    let matches = cli().get_matches();

    if let Some(addr) = matches.get_one::<String>("listen") {
        let allowed: Vec<String> = matches
            .get_many::<String>("allowed-imei")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        let timeout_secs: u64 = matches
            .get_one::<String>("read-timeout")
            .map(String::as_str)
            .unwrap_or("30")
            .parse()
            .context("--read-timeout must be a number of seconds")?;

        let config = CollectorConfig {
            data_dir: matches
                .get_one::<String>("data-dir")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            allowed_imeis: if allowed.is_empty() { None } else { Some(allowed) },
            read_timeout: Duration::from_secs(timeout_secs),
        };

        let collector = Collector::bind(addr.as_str(), config)
            .map_err(|e| anyhow!("binding {}: {}", addr, e))?;
        println!("Listening on {}", addr);
        collector.run().map_err(|e| anyhow!("collector: {}", e))?;
        return Ok(());
    }

    let patterns: Vec<String> = matches
        .get_many::<String>("files")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if patterns.is_empty() {
        return Err(anyhow!("no input files given (or use --listen ADDR)"));
    }

    let files = expand_input_paths(&patterns)?;
    if files.is_empty() {
        return Err(anyhow!("no files matched the given paths"));
    }

    let debug = matches.get_flag("debug");
    let output_dir = matches.get_one::<String>("output-dir").map(PathBuf::from);

    for file in &files {
        let records = decode_capture_file(file)?;
        print_summary(file, &records, debug);

        if matches.get_flag("csv") {
            export_csv(file, output_dir.as_deref(), &records)?;
        }

        if matches.get_flag("json") {
            export_json(file, output_dir.as_deref(), &records)?;
        }
    }

    Ok(())
}

/// Expand plain paths and glob patterns into a file list.
fn expand_input_paths(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            let paths = glob(pattern)
                .with_context(|| format!("invalid glob pattern '{}'", pattern))?;
            for path in paths {
                let path = path.with_context(|| format!("expanding '{}'", pattern))?;
                if path.is_file() {
                    files.push(path);
                }
            }
        } else {
            let path = PathBuf::from(pattern);
            if path.is_file() {
                files.push(path);
            } else {
                eprintln!("Warning: path not found or not a file: {}", pattern);
            }
        }
    }
    Ok(files)
}

/// Decode one capture file. A file whose bytes are entirely hex digits and
/// whitespace is treated as a hex dump; anything else as raw binary.
fn decode_capture_file(path: &Path) -> Result<Vec<AvlRecord>> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_hex_text = !data.is_empty()
        && data
            .iter()
            .all(|b| b.is_ascii_hexdigit() || b.is_ascii_whitespace());
    if is_hex_text {
        let text = String::from_utf8_lossy(&data);
        let joined: String = text.split_whitespace().collect();
        Ok(parse_avl_hex(&joined))
    } else {
        Ok(parse_avl_bytes(&data))
    }
}

fn print_summary(path: &Path, records: &[AvlRecord], debug: bool) {
    match (records.first(), records.last()) {
        (Some(first), Some(last)) => println!(
            "{}: {} record(s), {} .. {}",
            path.display(),
            records.len(),
            first.iso_timestamp(),
            last.iso_timestamp()
        ),
        _ => println!("{}: no records recovered", path.display()),
    }
    if debug {
        for record in records {
            println!("  {}", record_row(record).join(","));
        }
    }
}

fn export_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let mut path = match output_dir {
        Some(dir) => dir.join(input.file_name().unwrap_or_default()),
        None => input.to_path_buf(),
    };
    path.set_extension(extension);
    path
}

#[cfg(feature = "csv")]
fn export_csv(input: &Path, output_dir: Option<&Path>, records: &[AvlRecord]) -> Result<()> {
    let path = export_path(input, output_dir, "csv");
    avl_parser::export::export_records_csv(&path, records)
        .map_err(|e| anyhow!("writing {}: {}", path.display(), e))?;
    println!("  CSV: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "csv"))]
fn export_csv(_input: &Path, _output_dir: Option<&Path>, _records: &[AvlRecord]) -> Result<()> {
    Err(anyhow!(
        "this build has no CSV support; rebuild with --features csv"
    ))
}

#[cfg(feature = "json")]
fn export_json(input: &Path, output_dir: Option<&Path>, records: &[AvlRecord]) -> Result<()> {
    let path = export_path(input, output_dir, "json");
    let json = avl_parser::export::records_to_json(records)
        .map_err(|e| anyhow!("serializing {}: {}", path.display(), e))?;
    std::fs::write(&path, json)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("  JSON: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "json"))]
fn export_json(_input: &Path, _output_dir: Option<&Path>, _records: &[AvlRecord]) -> Result<()> {
    Err(anyhow!(
        "this build has no JSON support; rebuild with --features json"
    ))
}
