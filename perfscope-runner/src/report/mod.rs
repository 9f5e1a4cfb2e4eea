//! Report generators.
//!
//! Report content is assembled once as a list of [`Block`]s and then
//! rendered by [`TextReportGenerator`] or [`MarkdownReportGenerator`].

mod markdown;
mod text;

pub use markdown::MarkdownReportGenerator;
pub use text::TextReportGenerator;

use perfscope_core::{AnalysisPolicy, DataQuality, MetricsRecord};

use crate::config::AnalysisConfig;
use crate::session::{ComparisonRun, DatasetAnalysis};

/// One unit of report content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Heading(String),
    /// Label/value lines.
    Pairs(Vec<(String, String)>),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Notes(Vec<String>),
    Warning(String),
}

/// Renders blocks into a finished document.
pub trait ReportRenderer {
    fn render(&self, blocks: &[Block]) -> String;

    fn precision(&self) -> usize;

    fn policy(&self) -> &AnalysisPolicy;

    fn analysis(&self, analysis: &DatasetAnalysis) -> String {
        self.render(&analysis_blocks(analysis, self.policy(), self.precision()))
    }

    fn comparison(&self, run: &ComparisonRun) -> String {
        self.render(&comparison_blocks(run, self.precision()))
    }
}

/// Available human-readable renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStyle {
    Text,
    Markdown,
}

impl ReportStyle {
    pub fn generator(self, config: &AnalysisConfig) -> Box<dyn ReportRenderer> {
        match self {
            ReportStyle::Text => Box::new(TextReportGenerator::new(config)),
            ReportStyle::Markdown => Box::new(MarkdownReportGenerator::new(config)),
        }
    }
}

fn num(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

fn pct(value: f64, precision: usize) -> String {
    format!("{value:.precision$}%")
}

fn quality_label(quality: Option<DataQuality>) -> String {
    quality.map_or_else(|| "-".to_string(), |q| q.label().to_string())
}

fn pairs(items: &[(&str, String)]) -> Block {
    Block::Pairs(
        items
            .iter()
            .map(|(label, value)| (label.to_string(), value.clone()))
            .collect(),
    )
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Content of a single-dataset report.
pub fn analysis_blocks(
    analysis: &DatasetAnalysis,
    policy: &AnalysisPolicy,
    precision: usize,
) -> Vec<Block> {
    let record = &analysis.record;
    let p = precision;
    let mut blocks = vec![Block::Title(format!("Performance analysis: {}", analysis.name))];

    let mut overview = vec![
        ("Samples", record.count().to_string()),
        ("Data quality", quality_label(record.quality())),
    ];
    if let Some(source) = &analysis.source {
        if source.skipped_tokens > 0 {
            overview.push(("Skipped tokens", source.skipped_tokens.to_string()));
        }
    }
    blocks.push(Block::Heading("Overview".into()));
    blocks.push(pairs(&overview));

    let Some(summary) = record.summary() else {
        blocks.push(Block::Warning("No samples were collected; nothing to analyse.".into()));
        return blocks;
    };

    if record.is_insufficient() {
        let status = record
            .data_status()
            .map_or("", |s| s.label());
        blocks.push(Block::Warning(format!(
            "Data volume {status}: fewer than {} samples. Statistical results are unreliable; \
             the values below are for reference only.",
            policy.min_stats_count
        )));
        blocks.push(Block::Heading("Reference statistics".into()));
        blocks.push(pairs(&[
            ("Mean", num(summary.mean, p)),
            ("Median", num(summary.median, p)),
            ("Min", num(summary.min, p)),
            ("Max", num(summary.max, p)),
        ]));
        blocks.extend(advisory_blocks(analysis, policy));
        return blocks;
    }

    let mut core = vec![("Mean", num(summary.mean, p)), ("Median", num(summary.median, p))];
    if let Some(spread) = record.spread() {
        core.push(("Std deviation", num(spread.std, p)));
        core.push(("Variance", num(spread.variance, p)));
    }
    core.push(("Min", num(summary.min, p)));
    core.push(("Max", num(summary.max, p)));
    core.push(("Range", num(summary.range(), p)));
    blocks.push(Block::Heading("Core statistics".into()));
    blocks.push(pairs(&core));

    blocks.push(Block::Heading("Sigma levels".into()));
    match record.sigma() {
        Some(table) => blocks.push(Block::Table {
            headers: strings(&["Level", "Lower", "Upper", "Within"]),
            rows: table
                .iter()
                .map(|row| {
                    vec![
                        format!("±{}σ", row.k),
                        num(row.lower, p),
                        num(row.upper, p),
                        pct(row.within, p),
                    ]
                })
                .collect(),
        }),
        None => blocks.push(Block::Notes(vec![format!(
            "Sigma analysis needs at least {} samples ({} available).",
            policy.sigma_min_count,
            record.count()
        )])),
    }

    if let Some(table) = record.percentiles() {
        blocks.push(Block::Heading("Percentiles".into()));
        blocks.push(Block::Table {
            headers: strings(&["Percentile", "Value"]),
            rows: table
                .iter()
                .map(|row| vec![format!("P{}", row.level), num(row.value, p)])
                .collect(),
        });
    }

    blocks.push(Block::Heading("Intervals".into()));
    match record.intervals() {
        Some(iv) => blocks.push(Block::Table {
            headers: strings(&["Interval", "Method", "Lower", "Upper", "Within", "Nominal"]),
            rows: [("Recommended", &iv.recommended), ("Strict", &iv.strict)]
                .into_iter()
                .map(|(name, interval)| {
                    vec![
                        name.to_string(),
                        interval.method.label().to_string(),
                        num(interval.lower, p),
                        num(interval.upper, p),
                        pct(interval.within, p),
                        pct(interval.nominal_coverage, p),
                    ]
                })
                .collect(),
        }),
        None => blocks.push(Block::Notes(vec![format!(
            "Interval recommendation needs at least {} samples ({} available).",
            policy.interval_min_count,
            record.count()
        )])),
    }

    blocks.extend(advisory_blocks(analysis, policy));
    blocks
}

fn advisory_blocks(analysis: &DatasetAnalysis, policy: &AnalysisPolicy) -> Vec<Block> {
    let messages = analysis.advisories.messages(policy);
    if messages.is_empty() {
        return Vec::new();
    }
    vec![Block::Heading("Advisories".into()), Block::Notes(messages)]
}

/// Content of a multi-dataset comparison report.
pub fn comparison_blocks(run: &ComparisonRun, precision: usize) -> Vec<Block> {
    let p = precision;
    let mut blocks = vec![
        Block::Title("Performance comparison".into()),
        pairs(&[
            ("Datasets analysed", run.datasets.len().to_string()),
            ("Datasets failed", run.failures.len().to_string()),
            ("Pooled samples", run.pooled.count().to_string()),
        ]),
    ];

    let row = |name: &str, record: &MetricsRecord| -> Vec<String> {
        let summary = record.summary();
        vec![
            name.to_string(),
            record.count().to_string(),
            summary.map_or_else(|| "-".into(), |s| num(s.mean, p)),
            summary.map_or_else(|| "-".into(), |s| num(s.median, p)),
            record.spread().map_or_else(|| "-".into(), |s| num(s.std, p)),
            quality_label(record.quality()),
        ]
    };

    let mut rows: Vec<Vec<String>> = run
        .datasets
        .iter()
        .map(|d| row(&d.name, &d.record))
        .collect();
    rows.push(row(&run.pooled.name, &run.pooled.record));
    blocks.push(Block::Heading("Datasets".into()));
    blocks.push(Block::Table {
        headers: strings(&["Dataset", "Count", "Mean", "Median", "Std", "Quality"]),
        rows,
    });

    let mut distribution: Vec<Vec<String>> = run
        .histogram
        .iter()
        .map(|(quality, n)| vec![quality.label().to_string(), n.to_string()])
        .collect();
    if run.histogram.unrated > 0 {
        distribution.push(vec!["-".into(), run.histogram.unrated.to_string()]);
    }
    blocks.push(Block::Heading("Quality distribution".into()));
    blocks.push(Block::Table {
        headers: strings(&["Quality", "Datasets"]),
        rows: distribution,
    });

    if !run.failures.is_empty() {
        blocks.push(Block::Heading("Failures".into()));
        blocks.push(Block::Notes(
            run.failures
                .iter()
                .map(|f| format!("{}: {}", f.identifier, f.reason))
                .collect(),
        ));
    }

    blocks
}
