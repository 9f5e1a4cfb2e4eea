//! Markdown report generator.

use perfscope_core::AnalysisPolicy;

use super::{Block, ReportRenderer};
use crate::config::AnalysisConfig;

pub struct MarkdownReportGenerator {
    precision: usize,
    policy: AnalysisPolicy,
}

impl MarkdownReportGenerator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            precision: config.report.precision,
            policy: config.policy.clone(),
        }
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

impl ReportRenderer for MarkdownReportGenerator {
    fn precision(&self) -> usize {
        self.precision
    }

    fn policy(&self) -> &AnalysisPolicy {
        &self.policy
    }

    fn render(&self, blocks: &[Block]) -> String {
        let mut report = String::new();
        for block in blocks {
            match block {
                Block::Title(title) => report.push_str(&format!("# {title}\n\n")),
                Block::Heading(heading) => report.push_str(&format!("## {heading}\n\n")),
                Block::Pairs(pairs) => {
                    for (label, value) in pairs {
                        report.push_str(&format!("- **{label}**: {value}\n"));
                    }
                    report.push('\n');
                }
                Block::Table { headers, rows } => {
                    let cells: Vec<String> = headers.iter().map(|h| escape_cell(h)).collect();
                    report.push_str(&format!("| {} |\n", cells.join(" | ")));
                    let rule: Vec<&str> = headers.iter().map(|_| "---").collect();
                    report.push_str(&format!("|{}|\n", rule.join("|")));
                    for row in rows {
                        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
                        report.push_str(&format!("| {} |\n", cells.join(" | ")));
                    }
                    report.push('\n');
                }
                Block::Notes(notes) => {
                    for note in notes {
                        report.push_str(&format!("- {note}\n"));
                    }
                    report.push('\n');
                }
                Block::Warning(warning) => {
                    report.push_str(&format!("> **Warning:** {warning}\n\n"));
                }
            }
        }
        report
    }
}
