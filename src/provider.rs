//! Input providers for loading signature corpora from files or stdin

use crate::signature::{Signature, SignatureInput};
use anyhow::{bail, Context, Result};
use std::io::{self, Read};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Json,
    Csv,
}

pub fn load_signatures(input: &str) -> Result<Vec<Signature>> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };

    parse_signatures(&content)
}

pub fn parse_signatures(content: &str) -> Result<Vec<Signature>> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let format = detect_format(content)?;
    let inputs = match format {
        Format::Json => parse_json(content)?,
        Format::Csv => parse_csv(content)?,
    };

    let sigs = inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            Signature::try_from(input).with_context(|| format!("Invalid signature #{}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(count = sigs.len(), ?format, "parsed signatures");
    Ok(sigs)
}

const BOM: &str = "\u{FEFF}";

/// JSON when the content opens an array, CSV when its header names `r`, `s`
/// and `z` in any case or order.
pub fn detect_format(content: &str) -> Result<Format> {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    if content.trim_start().starts_with('[') {
        return Ok(Format::Json);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    if let Ok(headers) = reader.headers() {
        let has = |name: &str| headers.iter().any(|h| h.eq_ignore_ascii_case(name));
        if has("r") && has("s") && has("z") {
            return Ok(Format::Csv);
        }
    }

    bail!("Unable to detect input format. Use JSON array or CSV with r,s,z header.")
}

fn parse_json(content: &str) -> Result<Vec<SignatureInput>> {
    serde_json::from_str(content).context("Malformed JSON signature array")
}

fn parse_csv(content: &str) -> Result<Vec<SignatureInput>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let headers: csv::StringRecord = reader.headers()?.iter().map(|h| h.to_lowercase()).collect();
    reader.set_headers(headers);

    let mut inputs = Vec::new();
    for (row, result) in reader.deserialize::<SignatureInput>().enumerate() {
        inputs.push(result.with_context(|| format!("Malformed CSV row {}", row + 2))?);
    }
    Ok(inputs)
}
