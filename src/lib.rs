/*!
 * mdbundle - Bundle a directory tree into Markdown documents
 *
 * Walks a directory, classifies every file, and writes one or more Markdown
 * documents holding a project tree, each text file in a fenced code block,
 * and an optional TypeScript check report.
 */

pub mod analysis;
pub mod config;
pub mod error;
pub mod exporter;
pub mod normalizer;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use analysis::{ProcessOutput, ProcessRunner, SystemRunner, TypeChecker};
pub use config::{Config, RuleConfig};
pub use error::{BundleError, Result};
pub use exporter::{ExportSummary, Exporter};
pub use report::{ExportReport, ReportFormat, Reporter};
pub use scanner::Scanner;
pub use types::{Document, FileEntry, RenderedSection, Verdict};
pub use utils::format_file_size;
pub use writer::MarkdownWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
