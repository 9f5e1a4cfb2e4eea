//! Sample acquisition — turns monitor output and plain text files into a
//! finite `Vec<f64>`.
//!
//! Two source formats are recognised:
//! 1. Process tables (`hogs`/`top`-style output): header lines are skipped
//!    and values are pulled out of each row by [`SampleKind`].
//! 2. Plain text: one value per line, falling back to whitespace/comma
//!    separated tokens when a line does not parse whole.
//!
//! Unparseable tokens and non-finite values are dropped and counted, so the
//! engine only ever sees finite samples.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the acquisition layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which metric to extract from process-table rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    /// Percentage readings such as `12.5%`.
    Cpu,
    /// Values suffixed by `%`, `MB` or `GB`.
    Memory,
    /// Every unsigned decimal number on the row.
    #[default]
    Generic,
}

impl SampleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleKind::Cpu => "cpu",
            SampleKind::Memory => "memory",
            SampleKind::Generic => "generic",
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(SampleKind::Cpu),
            "memory" | "mem" => Ok(SampleKind::Memory),
            "generic" => Ok(SampleKind::Generic),
            other => Err(format!(
                "unknown sample kind '{other}' (expected cpu, memory or generic)"
            )),
        }
    }
}

/// Detected layout of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    ProcessTable,
    PlainText,
}

/// Samples parsed from text, before any file metadata is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSamples {
    pub values: Vec<f64>,
    pub format: SourceFormat,
    /// Tokens that could not be read as a finite number.
    pub skipped_tokens: usize,
}

/// Samples loaded from a file, with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedSamples {
    pub path: PathBuf,
    pub values: Vec<f64>,
    pub format: SourceFormat,
    pub skipped_tokens: usize,
    /// BLAKE3 over the samples' little-endian bytes.
    pub fingerprint: String,
}

/// Read and parse one file.
pub fn load_samples(path: &Path, kind: SampleKind) -> Result<LoadedSamples, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_samples(&content, kind);
    if parsed.skipped_tokens > 0 {
        warn!(
            path = %path.display(),
            skipped = parsed.skipped_tokens,
            "dropped unparseable or non-finite tokens"
        );
    }
    debug!(
        path = %path.display(),
        count = parsed.values.len(),
        format = ?parsed.format,
        "samples loaded"
    );
    Ok(LoadedSamples {
        path: path.to_path_buf(),
        fingerprint: fingerprint(&parsed.values),
        values: parsed.values,
        format: parsed.format,
        skipped_tokens: parsed.skipped_tokens,
    })
}

/// Parse file content, detecting the format first.
pub fn parse_samples(content: &str, kind: SampleKind) -> ParsedSamples {
    if is_process_table(content) {
        parse_process_table(content, kind)
    } else {
        parse_plain_text(content)
    }
}

/// Deterministic BLAKE3 hash of a sample sequence.
pub fn fingerprint(values: &[f64]) -> String {
    let mut hasher = blake3::Hasher::new();
    for v in values {
        hasher.update(&v.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

// ─── Process tables ─────────────────────────────────────────────────

const HEADER_MARKERS: [&str; 5] = ["PID", "USER", "COMMAND", "CPU", "MEM"];

fn detection_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            compile(r"(?im)PID.*USER.*COMMAND"),
            compile(r"(?m)\d+\.\d+%.*\d+\.\d+%"),
            compile(r"(?m)\d+/\d+.*\d+\.\d+%"),
        ]
    })
}

fn percent_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(\d+\.?\d*)%"))
}

fn percent_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"^\d*\.?\d*%"))
}

fn memory_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(\d+\.?\d*)(?:%|MB|GB)"))
}

fn number_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"\d+\.?\d*"))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static regex must compile")
}

fn is_process_table(content: &str) -> bool {
    detection_patterns().iter().any(|re| re.is_match(content))
}

fn parse_process_table(content: &str, kind: SampleKind) -> ParsedSamples {
    let mut values = Vec::new();
    let mut skipped_tokens = 0;

    for line in content.lines().map(str::trim) {
        if line.is_empty() || HEADER_MARKERS.iter().any(|m| line.contains(m)) {
            continue;
        }
        for token in extract_tokens(line, kind) {
            match token.parse::<f64>() {
                Ok(v) if v.is_finite() => values.push(v),
                _ => skipped_tokens += 1,
            }
        }
    }

    ParsedSamples {
        values,
        format: SourceFormat::ProcessTable,
        skipped_tokens,
    }
}

fn extract_tokens(line: &str, kind: SampleKind) -> Vec<&str> {
    match kind {
        // A CPU reading is a percentage followed by another percentage or
        // by the end of the row.
        SampleKind::Cpu => percent_token()
            .captures_iter(line)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let rest = line[whole.end()..].trim_start();
                if rest.is_empty() || percent_prefix().is_match(rest) {
                    caps.get(1).map(|m| m.as_str())
                } else {
                    None
                }
            })
            .collect(),
        SampleKind::Memory => memory_token()
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect(),
        SampleKind::Generic => number_token()
            .find_iter(line)
            .map(|m| m.as_str())
            .collect(),
    }
}

// ─── Plain text ─────────────────────────────────────────────────────

fn parse_plain_text(content: &str) -> ParsedSamples {
    let mut values = Vec::new();
    let mut skipped_tokens = 0;

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Ok(v) = line.parse::<f64>() {
            if v.is_finite() {
                values.push(v);
            } else {
                skipped_tokens += 1;
            }
            continue;
        }
        for token in line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            match token.parse::<f64>() {
                Ok(v) if v.is_finite() => values.push(v),
                _ => skipped_tokens += 1,
            }
        }
    }

    ParsedSamples {
        values,
        format: SourceFormat::PlainText,
        skipped_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOGS: &str = "\
  PID USER     %CPU %MEM COMMAND
 1234 root     12.5% 3.1% nginx
 5678 www      7.25% 1.0% php-fpm
";

    #[test]
    fn plain_text_one_per_line() {
        let parsed = parse_samples("1.5\n2\n\n  3.25  \n", SampleKind::Generic);
        assert_eq!(parsed.format, SourceFormat::PlainText);
        assert_eq!(parsed.values, vec![1.5, 2.0, 3.25]);
        assert_eq!(parsed.skipped_tokens, 0);
    }

    #[test]
    fn plain_text_splits_mixed_lines() {
        let parsed = parse_samples("1 2,3\nload 4.5 x\n", SampleKind::Generic);
        assert_eq!(parsed.values, vec![1.0, 2.0, 3.0, 4.5]);
        assert_eq!(parsed.skipped_tokens, 2);
    }

    #[test]
    fn plain_text_drops_non_finite() {
        let parsed = parse_samples("1\nNaN\ninf\n2 -inf\n", SampleKind::Generic);
        assert_eq!(parsed.values, vec![1.0, 2.0]);
        assert_eq!(parsed.skipped_tokens, 3);
    }

    #[test]
    fn detects_process_table_header() {
        let parsed = parse_samples(HOGS, SampleKind::Cpu);
        assert_eq!(parsed.format, SourceFormat::ProcessTable);
    }

    #[test]
    fn cpu_kind_reads_percentages() {
        // The second percentage on each row is followed by the command name.
        let parsed = parse_samples(HOGS, SampleKind::Cpu);
        assert_eq!(parsed.values, vec![12.5, 7.25]);
    }

    #[test]
    fn cpu_kind_skips_percentage_followed_by_text() {
        let content = "3/120 procs 12.5% 4.0%\n 9 proc 50.0% busy\n";
        let parsed = parse_samples(content, SampleKind::Cpu);
        assert_eq!(parsed.format, SourceFormat::ProcessTable);
        assert_eq!(parsed.values, vec![12.5, 4.0]);
    }

    #[test]
    fn memory_kind_reads_units() {
        let content = "\
PID USER COMMAND
1 a 12.5% 300MB x
2 b 1.5GB 7 y
";
        let parsed = parse_samples(content, SampleKind::Memory);
        assert_eq!(parsed.values, vec![12.5, 300.0, 1.5]);
    }

    #[test]
    fn generic_kind_reads_every_number() {
        let content = "PID USER COMMAND\n42 bob 1.5% 7\n";
        let parsed = parse_samples(content, SampleKind::Generic);
        assert_eq!(parsed.values, vec![42.0, 1.5, 7.0]);
    }

    #[test]
    fn header_lines_are_skipped() {
        let content = "PID USER COMMAND\nCPU 99.0% 1.0%\n 1 x 2.0% 3.0%\n";
        let parsed = parse_samples(content, SampleKind::Cpu);
        assert_eq!(parsed.values, vec![2.0, 3.0]);
    }

    #[test]
    fn sample_kind_from_str() {
        assert_eq!("CPU".parse::<SampleKind>(), Ok(SampleKind::Cpu));
        assert_eq!("mem".parse::<SampleKind>(), Ok(SampleKind::Memory));
        assert!("disk".parse::<SampleKind>().is_err());
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint(&[1.0, 2.0]), fingerprint(&[1.0, 2.0]));
        assert_ne!(fingerprint(&[1.0, 2.0]), fingerprint(&[2.0, 1.0]));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_samples(Path::new("/definitely/not/here.txt"), SampleKind::Generic)
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("here.txt"));
    }
}
