/*!
 * Core types and data structures for the mdbundle application
 */

use std::fs;
use std::path::{Path, PathBuf};

use strum::{Display, EnumIter};

/// Classification outcome for a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum Verdict {
    /// Text content is embedded in the document
    Included,
    /// Name matched an exact, suffix or fragment ignore rule
    #[strum(to_string = "Ignored (name)")]
    IgnoredByName,
    /// Font file by MIME type or extension
    #[strum(to_string = "Ignored (font)")]
    IgnoredByFont,
    /// Larger than the configured maximum size
    #[strum(to_string = "Ignored (size)")]
    IgnoredBySize,
    /// Image, audio or font MIME type
    Media,
    /// Content could not be read
    Unreadable,
}

impl Verdict {
    /// Whether this verdict is one of the `IgnoredBy*` variants
    pub fn is_ignored(self) -> bool {
        matches!(
            self,
            Verdict::IgnoredByName | Verdict::IgnoredByFont | Verdict::IgnoredBySize
        )
    }
}

/// A file found below the scan root
///
/// Metadata is queried lazily and never cached, so a file that vanishes
/// mid-run simply reports no size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the scan root
    pub rel_path: PathBuf,
}

impl FileEntry {
    /// Create an entry from an absolute path and the scan root it was found under
    pub fn new(path: PathBuf, root: &Path) -> Self {
        let rel_path = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.clone());
        Self { path, rel_path }
    }

    /// File name, lossily converted
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// File stem (name without the last extension)
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Lower-cased last extension including the leading dot, or an empty string
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }

    /// MIME type guessed from the extension
    pub fn mime(&self) -> Option<String> {
        mime_guess::from_path(&self.path)
            .first_raw()
            .map(str::to_string)
    }

    /// Size in bytes, `None` if the file cannot be stat'ed
    pub fn size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|m| m.len())
    }

    /// Relative path rendered with `/` separators
    pub fn rel_display(&self) -> String {
        self.rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Key used to order entries within a document
    pub fn sort_key(&self) -> String {
        self.rel_path.to_string_lossy().to_lowercase()
    }
}

/// One file's Markdown contribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    /// Verdict the section was rendered under
    pub verdict: Verdict,
    /// Markdown lines
    pub lines: Vec<String>,
    /// Embedded text, present only for included files
    pub content: Option<String>,
}

impl RenderedSection {
    /// Join the section lines into a single block
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// An output document assembled from blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<String>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block made of lines
    pub fn push_lines(&mut self, lines: &[String]) {
        self.blocks.push(lines.join("\n"));
    }

    /// Append a rendered file section
    pub fn push_section(&mut self, section: &RenderedSection) {
        self.blocks.push(section.render());
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Final text, blocks separated by a blank line
    pub fn render(&self) -> String {
        let mut text = self.blocks.join("\n\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_parts() {
        let root = Path::new("/project");
        let entry = FileEntry::new(PathBuf::from("/project/src/App.Min.JS"), root);
        assert_eq!(entry.name(), "App.Min.JS");
        assert_eq!(entry.stem(), "App.Min");
        assert_eq!(entry.extension(), ".js");
        assert_eq!(entry.rel_display(), "src/App.Min.JS");
        assert_eq!(entry.sort_key(), "src/app.min.js");
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        let entry = FileEntry::new(PathBuf::from("/project/.env"), Path::new("/project"));
        assert_eq!(entry.extension(), "");
        assert_eq!(entry.stem(), ".env");
    }

    #[test]
    fn test_document_render() {
        let mut doc = Document::new();
        doc.push_lines(&["# Title".to_string(), "text".to_string()]);
        doc.push_section(&RenderedSection {
            verdict: Verdict::Media,
            lines: vec!["## a.png".to_string()],
            content: None,
        });
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.render(), "# Title\ntext\n\n## a.png\n");
    }

    #[test]
    fn test_verdict_is_ignored() {
        assert!(Verdict::IgnoredBySize.is_ignored());
        assert!(!Verdict::Media.is_ignored());
        assert!(!Verdict::Included.is_ignored());
        assert_eq!(Verdict::IgnoredByFont.to_string(), "Ignored (font)");
    }
}
