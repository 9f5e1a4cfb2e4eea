//! Plain-text report generator.

use perfscope_core::AnalysisPolicy;

use super::{Block, ReportRenderer};
use crate::config::AnalysisConfig;

pub struct TextReportGenerator {
    precision: usize,
    policy: AnalysisPolicy,
}

impl TextReportGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            precision: config.report.precision,
            policy: config.policy.clone(),
        }
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(to.saturating_sub(width(s))));
    out
}

impl ReportRenderer for TextReportGenerator {
    fn precision(&self) -> usize {
        self.precision
    }

    fn policy(&self) -> &AnalysisPolicy {
        &self.policy
    }

    fn render(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            match block {
                Block::Title(title) => {
                    out.push_str(title);
                    out.push('\n');
                    out.push_str(&"=".repeat(width(title)));
                    out.push('\n');
                }
                Block::Heading(heading) => {
                    out.push('\n');
                    out.push_str(heading);
                    out.push('\n');
                    out.push_str(&"-".repeat(width(heading)));
                    out.push('\n');
                }
                Block::Pairs(pairs) => {
                    let label_width = pairs.iter().map(|(l, _)| width(l)).max().unwrap_or(0);
                    for (label, value) in pairs {
                        let label = pad(&format!("{label}:"), label_width + 1);
                        out.push_str(&format!("  {label}  {value}\n"));
                    }
                }
                Block::Table { headers, rows } => {
                    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
                    for row in rows {
                        for (i, cell) in row.iter().enumerate() {
                            if let Some(w) = widths.get_mut(i) {
                                *w = (*w).max(width(cell));
                            }
                        }
                    }
                    let line = |cells: &[String]| -> String {
                        let joined: Vec<String> = cells
                            .iter()
                            .zip(&widths)
                            .map(|(c, w)| pad(c, *w))
                            .collect();
                        format!("  {}\n", joined.join("  ").trim_end())
                    };
                    out.push_str(&line(headers.as_slice()));
                    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                    out.push_str(&format!("  {}\n", rule.join("  ")));
                    for row in rows {
                        out.push_str(&line(row.as_slice()));
                    }
                }
                Block::Notes(notes) => {
                    for note in notes {
                        out.push_str(&format!("  - {note}\n"));
                    }
                }
                Block::Warning(warning) => {
                    out.push_str(&format!("\n!! {warning}\n"));
                }
            }
        }
        out
    }
}
