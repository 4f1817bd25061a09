/*!
 * Document assembly: single-file and split exports
 */

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use indicatif::ProgressBar;

use crate::analysis::{ProcessRunner, SystemRunner, TypeChecker};
use crate::config::Config;
use crate::error::{Result, ResultExt};
use crate::scanner::Scanner;
use crate::tree::render_tree;
use crate::types::{Document, FileEntry, Verdict};
use crate::writer::MarkdownWriter;

/// Directory, next to the output path, that receives split parts
pub const SPLIT_DIR: &str = "export";

/// What an export produced
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Documents written, in order
    pub documents: Vec<PathBuf>,
    /// Number of files rendered
    pub files_processed: usize,
    /// Files per verdict
    pub verdicts: HashMap<Verdict, usize>,
    /// Lines of embedded content
    pub total_lines: usize,
    /// Characters of embedded content
    pub total_chars: usize,
}

/// Builds and writes the Markdown export for one scan root
pub struct Exporter {
    config: Config,
    writer: MarkdownWriter,
    checker: Option<TypeChecker>,
    progress: Arc<ProgressBar>,
}

impl Exporter {
    /// Create an exporter; the type check uses the system runner when enabled
    pub fn new(
        config: Config,
        generated_at: DateTime<FixedOffset>,
        progress: Arc<ProgressBar>,
    ) -> Self {
        let checker = config.type_check.then(|| {
            TypeChecker::new(Box::new(SystemRunner::new(config.type_check_timeout)))
        });
        Self {
            writer: MarkdownWriter::new(config.clone(), generated_at),
            config,
            checker,
            progress,
        }
    }

    /// Replace the process runner used by the type check
    pub fn with_runner(mut self, runner: Box<dyn ProcessRunner>) -> Self {
        if self.config.type_check {
            self.checker = Some(TypeChecker::new(runner));
        }
        self
    }

    /// Scan the target directory and write the export
    pub fn compile(&self) -> Result<ExportSummary> {
        let files = Scanner::new(self.config.clone()).scan()?;
        self.progress.set_length(files.len() as u64);

        if self.config.split <= 1 {
            self.compile_single(&files)
        } else {
            self.compile_split(&files, self.config.split)
        }
    }

    fn compile_single(&self, files: &[FileEntry]) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();
        let doc = self.build_document(files, None, true, &mut summary);
        write_atomic(&self.config.output_file, &doc.render())?;
        log::info!("Wrote {}", self.config.output_file.display());
        summary.documents.push(self.config.output_file.clone());
        Ok(summary)
    }

    fn compile_split(&self, files: &[FileEntry], split: usize) -> Result<ExportSummary> {
        let mut summary = ExportSummary::default();
        let chunks = chunk_files(files, split);
        let total = chunks.len();

        let export_dir = split_dir(&self.config.output_file);
        fs::create_dir_all(&export_dir)
            .with_context(|| format!("creating {}", export_dir.display()))?;

        for (i, chunk) in chunks.iter().enumerate() {
            let index = i + 1;
            let doc = self.build_document(chunk, Some((index, total)), index == 1, &mut summary);
            let path = export_dir.join(format!("export_{}.md", index));
            write_atomic(&path, &doc.render())?;
            log::info!("Part {}/{} written: {}", index, total, path.display());
            summary.documents.push(path);
        }

        Ok(summary)
    }

    fn build_document(
        &self,
        files: &[FileEntry],
        part: Option<(usize, usize)>,
        with_report: bool,
        summary: &mut ExportSummary,
    ) -> Document {
        let mut doc = Document::new();
        doc.push_lines(&self.writer.header(part));

        let paths: Vec<&Path> = files.iter().map(|f| f.rel_path.as_path()).collect();
        doc.push_lines(&render_tree(&paths));

        for file in files {
            let section = self.writer.render_file(file);
            *summary.verdicts.entry(section.verdict).or_insert(0) += 1;
            summary.files_processed += 1;
            if let Some(content) = &section.content {
                summary.total_lines += content.lines().count();
                summary.total_chars += content.chars().count();
            }
            doc.push_section(&section);
            self.progress.inc(1);
        }

        if with_report {
            if let Some(report) = self
                .checker
                .as_ref()
                .and_then(|checker| checker.report(&self.config.target_dir))
            {
                doc.push_lines(&report);
            }
        }

        doc
    }
}

/// Split `files` into contiguous chunks of `ceil(len / split)` entries
///
/// Never yields an empty chunk, except a single one when `files` is empty.
pub fn chunk_files(files: &[FileEntry], split: usize) -> Vec<&[FileEntry]> {
    if files.is_empty() {
        return vec![files];
    }
    let split = split.max(1);
    let size = (files.len() + split - 1) / split;
    files.chunks(size).collect()
}

/// Directory receiving split parts for a given output path
pub fn split_dir(output: &Path) -> PathBuf {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(SPLIT_DIR),
        _ => PathBuf::from(SPLIT_DIR),
    }
}

/// Write `text` to a sibling temp file and rename it over `path`
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let mut tmp_name = OsString::from(".");
    tmp_name.push(path.file_name().unwrap_or_default());
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, text).with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
