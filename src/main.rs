//! CLI for ECDSA nonce reuse recovery

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nonceleak::curve::{Curve, Secp256k1};
use nonceleak::hint::{LinearRecurrenceHint, NonceHint};
use nonceleak::logging::{init_logging, LogFormat};
use nonceleak::math::{parse_integer_strict, ValueKind};
use nonceleak::provider::load_signatures;
use nonceleak::recover::{recover_batch, recover_nonces, RecoveryConfig, MAX_PROBES};
use nonceleak::report::RecoveryReport;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "nonceleak")]
#[command(about = "ECDSA private key and nonce recovery from reused nonces")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Command {
    Recover {
        #[arg(default_value = "-")]
        input: String,

        #[arg(
            long,
            value_parser = parse_pair,
            help = "Zero-based indices of the pair sharing a nonce, e.g. 0,1"
        )]
        pair: Option<(usize, usize)>,

        #[arg(long, help = "Known private key (decimal or 0x-hex); skips key recovery")]
        private_key: Option<String>,

        #[arg(
            long,
            env = "NONCELEAK_MAX_PROBES",
            default_value_t = MAX_PROBES,
            help = "Probe budget of the nonce search fallback"
        )]
        max_probes: usize,

        #[arg(long, help = "Use the bounded nonce search instead of the closed form")]
        search: bool,

        #[arg(
            long,
            value_enum,
            default_value = "none",
            help = "Seed for the nonce search fallback"
        )]
        hint: HintKind,

        #[arg(long, help = "Also write the JSON report to this file")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HintKind {
    None,
    Linear,
}

fn parse_pair(value: &str) -> Result<(usize, usize), String> {
    let (a, b) = value
        .split_once(',')
        .ok_or_else(|| format!("expected two indices separated by a comma, got '{}'", value))?;
    let a = a.trim().parse::<usize>().map_err(|e| e.to_string())?;
    let b = b.trim().parse::<usize>().map_err(|e| e.to_string())?;
    if a == b {
        return Err("pair indices must differ".to_string());
    }
    Ok((a, b))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging("warn", cli.log_format);
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Recover {
            input,
            pair,
            private_key,
            max_probes,
            search,
            hint,
            output,
        } => {
            let signatures = load_signatures(&input)?;
            let curve = Secp256k1::new();

            let private_key = private_key
                .map(|d| parse_integer_strict(d.trim(), ValueKind::RorS))
                .transpose()
                .map_err(|e| anyhow!("Invalid --private-key: {}", e))?;

            let hint: Option<Box<dyn NonceHint>> = match hint {
                HintKind::None => None,
                HintKind::Linear => {
                    Some(Box::new(LinearRecurrenceHint::new(curve.order().clone())))
                }
            };

            let config = RecoveryConfig {
                pair,
                max_probes,
                force_search: search,
            };

            let result = match &private_key {
                Some(d) => recover_nonces(d, &signatures, &curve, &config, hint.as_deref()),
                None => recover_batch(&signatures, &curve, &config, hint.as_deref()),
            };

            let report = RecoveryReport::new(curve.name(), &result);
            if let Some(path) = &output {
                report.write_json(path)?;
                info!(path = %path.display(), "report written");
            }

            if cli.json {
                println!("{}", report.to_json()?);
            } else {
                print!("{}", report.to_text());
            }

            Ok(if private_key.is_some() {
                !signatures.is_empty() && result.recovered_nonces() == signatures.len()
            } else {
                result.private_key.is_some()
            })
        }
    }
}
