/*!
 * Reporting functionality for mdbundle
 *
 * Renders a console summary of an export using the tabled library.
 */

use std::time::Duration;

use strum::IntoEnumIterator;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::exporter::ExportSummary;
use crate::types::Verdict;
use crate::utils::format_file_size;

/// Statistics for a finished export
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Result of the export
    pub summary: ExportSummary,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Total bytes written across documents
    pub bytes_written: u64,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ExportReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ExportReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let documents = report
            .summary
            .documents
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: documents,
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Processed".to_string(),
                value: self.format_number(report.summary.files_processed),
            },
            SummaryRow {
                key: "📝 Embedded Lines".to_string(),
                value: self.format_number(report.summary.total_lines),
            },
            SummaryRow {
                key: "🔤 Embedded Characters".to_string(),
                value: self.format_number(report.summary.total_chars),
            },
            SummaryRow {
                key: "💾 Output Size".to_string(),
                value: format_file_size(report.bytes_written),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_verdict_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct VerdictRow {
            #[tabled(rename = "Classification")]
            verdict: String,

            #[tabled(rename = "Files")]
            files: String,
        }

        let rows: Vec<VerdictRow> = Verdict::iter()
            .filter_map(|verdict| {
                let count = report.summary.verdicts.get(&verdict).copied().unwrap_or(0);
                (count > 0).then(|| VerdictRow {
                    verdict: verdict.to_string(),
                    files: self.format_number(count),
                })
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ExportReport) -> String {
        let verdict_table = self.create_verdict_table(report);
        let summary_table = self.create_summary_table(report);

        format!(
            "📋  FILES BY CLASSIFICATION\n{}\n\n✅  EXPORT COMPLETE\n{}",
            verdict_table, summary_table
        )
    }
}
