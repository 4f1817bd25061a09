/*!
 * Content normalization: decoding, comment and blank-line stripping
 *
 * Stripping is line and regex based. It does not know about string
 * literals, so `"http://x"` inside code loses everything after `//`.
 */

use std::borrow::Cow;
use std::fs;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RuleConfig;
use crate::types::FileEntry;

/// How comments are removed for a language tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripRule {
    /// Only blank lines are removed
    None,
    /// `/* */` blocks, then `//`, `#` and `--` to end of line
    CodeLike,
    /// `<!-- -->` blocks
    Markup,
}

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static SLASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"//.*").unwrap());
static HASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"#.*").unwrap());
static DASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"--.*").unwrap());
static MARKUP_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Read a file as text, optionally stripping noise
///
/// Returns `None` only when the file cannot be read at all.
pub fn read_text(entry: &FileEntry, rules: &RuleConfig, strip: bool) -> Option<String> {
    let bytes = match fs::read(&entry.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("Failed to read {}: {}", entry.path.display(), e);
            return None;
        }
    };

    let content = normalize_separators(&decode(bytes));
    if !strip {
        return Some(content);
    }

    let lang = rules.language_for(&entry.extension());
    Some(strip_noise(&content, rules.strip_rule_for(lang)))
}

/// Decode bytes as UTF-8, falling back to Latin-1 which accepts any input
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Replace Unicode line and paragraph separators with `\n`
pub fn normalize_separators(text: &str) -> String {
    text.replace(['\u{2028}', '\u{2029}'], "\n")
}

/// Remove comments per `rule`, then drop every blank line
pub fn strip_noise(content: &str, rule: StripRule) -> String {
    let stripped: Cow<'_, str> = match rule {
        StripRule::None => Cow::Borrowed(content),
        StripRule::CodeLike => {
            let text = BLOCK_COMMENT.replace_all(content, "");
            let text = SLASH_COMMENT.replace_all(&text, "").into_owned();
            let text = HASH_COMMENT.replace_all(&text, "").into_owned();
            Cow::Owned(DASH_COMMENT.replace_all(&text, "").into_owned())
        }
        StripRule::Markup => MARKUP_COMMENT.replace_all(content, ""),
    };

    stripped
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_hash_comment_and_blank_lines() {
        let out = strip_noise("# comment\nprint(1)\n\n", StripRule::CodeLike);
        assert_eq!(out, "print(1)");
    }

    #[test]
    fn test_code_like_rules_apply_in_order() {
        let src = "/* header\n spans lines */\nlet a = 1; // trailing\n  \nselect 1 -- sql\nx = 2 # py\n";
        let out = strip_noise(src, StripRule::CodeLike);
        assert_eq!(out, "let a = 1; \nselect 1 \nx = 2 ");
    }

    #[test]
    fn test_stripping_is_not_string_aware() {
        let out = strip_noise("let url = \"http://example.com\";", StripRule::CodeLike);
        assert_eq!(out, "let url = \"http:");
    }

    #[test]
    fn test_markup_comments() {
        let src = "<div>\n<!-- note\n more -->\n<p>hi</p><!-- x -->\n</div>";
        assert_eq!(strip_noise(src, StripRule::Markup), "<div>\n<p>hi</p>\n</div>");
    }

    #[test]
    fn test_none_rule_keeps_comments() {
        let out = strip_noise("# Title\n\n// not a comment here\n", StripRule::None);
        assert_eq!(out, "# Title\n// not a comment here");
    }

    #[test]
    fn test_decode_fallback() {
        assert_eq!(decode("héllo".as_bytes().to_vec()), "héllo");
        // 0xE9 alone is invalid UTF-8 and is 'é' in Latin-1
        assert_eq!(decode(vec![b'c', b'a', b'f', 0xE9]), "café");
        assert_eq!(decode(vec![0xFF, 0x00]), "\u{ff}\u{0}");
    }

    #[test]
    fn test_separators() {
        assert_eq!(normalize_separators("a\u{2028}b\u{2029}c"), "a\nb\nc");
    }

    #[test]
    fn test_read_text() -> std::io::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("main.rs");
        std::fs::write(&path, "// header\nfn main() {}\n\n")?;
        let entry = FileEntry::new(path, dir.path());
        let rules = RuleConfig::default();

        assert_eq!(read_text(&entry, &rules, true).as_deref(), Some("fn main() {}"));
        assert_eq!(
            read_text(&entry, &rules, false).as_deref(),
            Some("// header\nfn main() {}\n\n")
        );
        Ok(())
    }

    #[test]
    fn test_read_text_missing_file() {
        let entry = FileEntry::new(PathBuf::from("/nope/missing.rs"), std::path::Path::new("/nope"));
        assert_eq!(read_text(&entry, &RuleConfig::default(), true), None);
    }
}
