//! Presentation of recovery results: JSON documents and text summaries

use crate::math::{to_decimal_string, to_hex_string};
use crate::recover::RecoveryResult;
use anyhow::{Context, Result};
use num_bigint::BigUint;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RecoveryReport {
    pub curve: String,
    pub reference_pair: Option<[usize; 2]>,
    pub private_key: Option<ValueOutput>,
    pub key_error: Option<String>,
    /// One entry per input signature; `null` where recovery failed.
    pub nonces: Vec<Option<ValueOutput>>,
    pub failures: Vec<FailureOutput>,
    pub summary: SummaryOutput,
}

#[derive(Debug, Serialize)]
pub struct ValueOutput {
    pub decimal: String,
    pub hex: String,
}

impl From<&BigUint> for ValueOutput {
    fn from(value: &BigUint) -> Self {
        Self {
            decimal: to_decimal_string(value),
            hex: to_hex_string(value),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FailureOutput {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub total_signatures: usize,
    pub key_recovered: bool,
    pub nonces_recovered: usize,
}

impl RecoveryReport {
    pub fn new(curve: &str, result: &RecoveryResult) -> Self {
        Self {
            curve: curve.to_string(),
            reference_pair: result.pair.map(|(a, b)| [a, b]),
            private_key: result.private_key.as_ref().map(ValueOutput::from),
            key_error: result.key_error.as_ref().map(|e| e.to_string()),
            nonces: result
                .nonces
                .iter()
                .map(|k| k.as_ref().map(ValueOutput::from))
                .collect(),
            failures: result
                .nonce_errors
                .iter()
                .map(|(index, e)| FailureOutput {
                    index: *index,
                    reason: e.to_string(),
                })
                .collect(),
            summary: SummaryOutput {
                total_signatures: result.nonces.len(),
                key_recovered: result.private_key.is_some(),
                nonces_recovered: result.recovered_nonces(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Persists the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Analyzed {} signatures on {}\n\n",
            self.summary.total_signatures, self.curve
        ));

        if let Some([a, b]) = self.reference_pair {
            output.push_str(&format!("Reference pair: [{}] and [{}]\n", a, b));
        }

        let Some(key) = &self.private_key else {
            match &self.key_error {
                Some(reason) => {
                    output.push_str(&format!("Private key not recovered: {}\n", reason))
                }
                None => output.push_str("Private key not recovered\n"),
            }
            return output;
        };

        output.push_str(&format!("Private Key (decimal): {}\n", key.decimal));
        output.push_str(&format!("Private Key (hex): {}\n\n", key.hex));
        output.push_str(&format!(
            "Recovered {} of {} nonces:\n",
            self.summary.nonces_recovered, self.summary.total_signatures
        ));

        for (i, nonce) in self.nonces.iter().enumerate() {
            if let Some(k) = nonce {
                output.push_str(&format!("  [{}]: {}\n", i, k.hex));
            } else {
                let reason = self
                    .failures
                    .iter()
                    .find(|f| f.index == i)
                    .map(|f| f.reason.as_str())
                    .unwrap_or("not recovered");
                output.push_str(&format!("  [{}]: - ({})\n", i, reason));
            }
        }

        output
    }
}
