/*!
 * Markdown rendering for headers and per-file sections
 */

use chrono::{DateTime, FixedOffset};

use crate::config::Config;
use crate::normalizer::read_text;
use crate::rules::{classify, is_collapsible};
use crate::types::{FileEntry, RenderedSection, Verdict};

/// Renders document headers and file sections
pub struct MarkdownWriter {
    /// Writer configuration
    config: Config,
    /// Timestamp stamped into every header of the run
    generated_at: DateTime<FixedOffset>,
}

impl MarkdownWriter {
    /// Create a new Markdown writer
    pub fn new(config: Config, generated_at: DateTime<FixedOffset>) -> Self {
        Self {
            config,
            generated_at,
        }
    }

    /// Header block, with a `PART i/n` line in split mode
    pub fn header(&self, part: Option<(usize, usize)>) -> Vec<String> {
        let mut lines = vec![
            format!(
                "# Compilation of files from `{}`",
                self.config.target_dir.display()
            ),
            String::new(),
            format!(
                "**Generated at:** {}  ",
                self.generated_at.format("%d/%m/%Y at %H:%M:%S")
            ),
            format!("**ISO:** `{}`", self.generated_at.to_rfc3339()),
        ];
        if let Some((index, total)) = part {
            lines.push(String::new());
            lines.push(format!("### PART {}/{}", index, total));
        }
        lines.push(String::new());
        lines.push("> Automatic export.".to_string());
        lines
    }

    /// Render one file's section
    pub fn render_file(&self, entry: &FileEntry) -> RenderedSection {
        let rules = &self.config.rules;
        let verdict = classify(entry, rules);
        log::trace!("{} -> {:?}", entry.rel_display(), verdict);

        let mut lines = vec![format!("## {}", entry.rel_display())];

        if verdict == Verdict::Media {
            lines.push(format!("- **Media file**: `{}`", entry.name()));
            return RenderedSection {
                verdict,
                lines,
                content: None,
            };
        }

        if verdict.is_ignored() {
            let size_kib = entry.size().unwrap_or(0) as f64 / 1024.0;
            lines.push(format!("- **Ignored file** ({:.2} KB)", size_kib));
            return RenderedSection {
                verdict,
                lines,
                content: None,
            };
        }

        let Some(text) = read_text(entry, rules, self.config.strip_noise) else {
            lines.push("- **Non-textual or unreadable**".to_string());
            return RenderedSection {
                verdict: Verdict::Unreadable,
                lines,
                content: None,
            };
        };

        let lang = rules.language_for(&entry.extension());
        let fence = [format!("```{}", lang), text.clone(), "```".to_string()];

        if is_collapsible(entry, rules) {
            lines.push(format!("<details><summary>{}</summary>", entry.name()));
            lines.push(String::new());
            lines.extend(fence);
            lines.push("</details>".to_string());
        } else {
            lines.extend(fence);
        }

        RenderedSection {
            verdict,
            lines,
            content: Some(text),
        }
    }
}
