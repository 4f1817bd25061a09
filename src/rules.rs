/*!
 * File classification rules
 *
 * Pure predicates over a [`FileEntry`] and the [`RuleConfig`] tables. The
 * only I/O is a `stat` for the size check.
 */

use crate::config::RuleConfig;
use crate::types::{FileEntry, Verdict};

/// Classify a file. The first matching rule wins.
///
/// Media detection runs first, so an oversized image is still reported as
/// media rather than as ignored.
pub fn classify(entry: &FileEntry, rules: &RuleConfig) -> Verdict {
    let mime = entry.mime();

    if is_media(mime.as_deref(), rules) {
        return Verdict::Media;
    }
    if is_ignored_by_name(entry, rules) {
        return Verdict::IgnoredByName;
    }
    if is_font(entry, mime.as_deref(), rules) {
        return Verdict::IgnoredByFont;
    }
    if is_large(entry, rules) {
        return Verdict::IgnoredBySize;
    }
    Verdict::Included
}

/// MIME type starts with one of the media prefixes
pub fn is_media(mime: Option<&str>, rules: &RuleConfig) -> bool {
    mime.map_or(false, |m| {
        rules
            .media_mime_prefixes
            .iter()
            .any(|prefix| m.starts_with(prefix.as_str()))
    })
}

/// Exact name, suffix or stem fragment match, all case-insensitive
pub fn is_ignored_by_name(entry: &FileEntry, rules: &RuleConfig) -> bool {
    let lower_name = entry.name().to_lowercase();
    if rules.ignored_exact_filenames.contains(&lower_name) {
        return true;
    }
    if rules
        .ignored_suffixes
        .iter()
        .any(|suffix| lower_name.ends_with(suffix.as_str()))
    {
        return true;
    }

    let lower_stem = entry.stem().to_lowercase();
    rules
        .ignored_name_fragments
        .iter()
        .any(|fragment| lower_stem.contains(fragment.as_str()))
}

/// Font by MIME type or by extension
pub fn is_font(entry: &FileEntry, mime: Option<&str>, rules: &RuleConfig) -> bool {
    if mime.map_or(false, |m| rules.font_mimes.contains(m)) {
        return true;
    }
    rules.font_extensions.contains(&entry.extension())
}

/// Larger than the size limit; a vanished file is not large
pub fn is_large(entry: &FileEntry, rules: &RuleConfig) -> bool {
    entry
        .size()
        .map_or(false, |size| size > rules.max_file_size)
}

/// Whether an included file is rendered inside a `<details>` block
pub fn is_collapsible(entry: &FileEntry, rules: &RuleConfig) -> bool {
    if rules.collapsible_extensions.contains(&entry.extension()) {
        return true;
    }
    let rel = entry.rel_display();
    rules
        .collapsible_paths
        .iter()
        .any(|fragment| rel.contains(fragment.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn entry(rel: &str) -> FileEntry {
        FileEntry::new(PathBuf::from("/project").join(rel), Path::new("/project"))
    }

    #[test]
    fn test_ignored_by_name() {
        let rules = RuleConfig::default();
        // exact names
        assert_eq!(classify(&entry("pnpm-lock.yaml"), &rules), Verdict::IgnoredByName);
        assert_eq!(classify(&entry("TSConfig.TSBuildInfo"), &rules), Verdict::IgnoredByName);
        // suffixes
        assert_eq!(classify(&entry("static/app.min.js"), &rules), Verdict::IgnoredByName);
        assert_eq!(classify(&entry("STYLE.MIN.CSS"), &rules), Verdict::IgnoredByName);
        // stem fragments
        assert_eq!(classify(&entry("vendor/jquery-3.7.js"), &rules), Verdict::IgnoredByName);
        assert_eq!(classify(&entry(".env.local"), &rules), Verdict::IgnoredByName);
        assert_eq!(classify(&entry("yarn.lock"), &rules), Verdict::IgnoredByName);
    }

    #[test]
    fn test_fragment_only_checks_stem() {
        let rules = RuleConfig::default();
        // ".env" appears in the extension part only, not in the stem
        assert!(!is_ignored_by_name(&entry("settings.envrc"), &rules));
    }

    #[test]
    fn test_font_by_extension_and_mime() {
        let rules = RuleConfig::default();
        assert_eq!(classify(&entry("fonts/icons.eot"), &rules), Verdict::IgnoredByFont);
        assert_eq!(classify(&entry("fonts/type1.PFB"), &rules), Verdict::IgnoredByFont);
        assert!(is_font(
            &entry("blob.bin"),
            Some("application/x-font-woff"),
            &rules
        ));
    }

    #[test]
    fn test_media() {
        let rules = RuleConfig::default();
        assert_eq!(classify(&entry("photo.png"), &rules), Verdict::Media);
        assert_eq!(classify(&entry("sound.mp3"), &rules), Verdict::Media);
        assert!(is_media(Some("font/woff2"), &rules));
        assert!(!is_media(Some("text/plain"), &rules));
        assert!(!is_media(None, &rules));
    }

    #[test]
    fn test_missing_file_is_not_large() {
        let rules = RuleConfig::default().with_max_file_size(0);
        assert!(!is_large(&entry("gone.txt"), &rules));
        assert_eq!(classify(&entry("gone.txt"), &rules), Verdict::Included);
    }

    #[test]
    fn test_size_limit() -> std::io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("big.txt"), vec![b'a'; 64])?;
        fs::write(dir.path().join("small.txt"), vec![b'a'; 8])?;
        let rules = RuleConfig::default().with_max_file_size(32);

        let big = FileEntry::new(dir.path().join("big.txt"), dir.path());
        let small = FileEntry::new(dir.path().join("small.txt"), dir.path());
        assert_eq!(classify(&big, &rules), Verdict::IgnoredBySize);
        assert_eq!(classify(&small, &rules), Verdict::Included);
        Ok(())
    }

    #[test]
    fn test_media_takes_precedence_over_size() -> std::io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("huge.png"), vec![0u8; 128])?;
        let rules = RuleConfig::default().with_max_file_size(16);

        let image = FileEntry::new(dir.path().join("huge.png"), dir.path());
        assert!(is_large(&image, &rules));
        assert_eq!(classify(&image, &rules), Verdict::Media);
        Ok(())
    }

    #[test]
    fn test_collapsible() {
        let rules = RuleConfig::default();
        assert!(is_collapsible(&entry("package.json"), &rules));
        assert!(is_collapsible(&entry("README.MD"), &rules));
        assert!(is_collapsible(&entry("src/components/ui/button.tsx"), &rules));
        assert!(!is_collapsible(&entry("src/main.rs"), &rules));
    }
}
