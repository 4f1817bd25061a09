/*!
 * Configuration handling for mdbundle
 */

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::error::{BundleError, Result};
use crate::normalizer::StripRule;

/// Default maximum size of a file whose content is embedded (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Default timeout for the external type-check, in seconds
pub const DEFAULT_TYPE_CHECK_TIMEOUT_SECS: u64 = 120;

/// Command-line arguments for mdbundle
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "mdbundle",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle a directory tree into Markdown documents",
    long_about = "Walks a directory and writes a Markdown document with a project tree, the content of every text file in fenced code blocks, and an optional TypeScript check report. Output can be split into N parts."
)]
pub struct Args {
    /// Directory to bundle
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output Markdown file name
    #[clap(default_value = "export.md")]
    pub output_file: String,

    /// Include the mdbundle executable itself when it lives inside the directory
    #[clap(long)]
    pub include_self: bool,

    /// Split the export into N parts written to an `export/` directory
    #[clap(long, value_name = "N", default_value = "0")]
    pub split: usize,

    /// Keep comments and blank lines in embedded files
    #[clap(long)]
    pub no_strip: bool,

    /// Skip the TypeScript check even when a package.json is present
    #[clap(long)]
    pub no_type_check: bool,

    /// Timeout for the TypeScript check in seconds
    #[clap(long, value_name = "SECS", default_value_t = DEFAULT_TYPE_CHECK_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum size in bytes of a file whose content is embedded
    #[clap(long, value_name = "BYTES")]
    pub max_size: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging and the summary report
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Static rule tables driving classification, normalization and rendering
///
/// Built once at startup and passed by reference; nothing mutates it during
/// a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    /// Directory (or file) names that are never visited
    pub ignored_dirs: HashSet<String>,
    /// Lower-cased file names ignored exactly
    pub ignored_exact_filenames: HashSet<String>,
    /// Fragments matched against the lower-cased file stem
    pub ignored_name_fragments: Vec<String>,
    /// Suffixes matched against the lower-cased file name
    pub ignored_suffixes: Vec<String>,
    /// Extensions rendered inside a `<details>` block
    pub collapsible_extensions: HashSet<String>,
    /// Relative path fragments rendered inside a `<details>` block
    pub collapsible_paths: Vec<String>,
    /// MIME prefixes treated as media
    pub media_mime_prefixes: Vec<String>,
    /// MIME types treated as fonts
    pub font_mimes: HashSet<String>,
    /// Extensions treated as fonts
    pub font_extensions: HashSet<String>,
    /// Files larger than this are not embedded
    pub max_file_size: u64,
    /// Extension (with dot, lower-cased) to language tag
    pub languages: HashMap<String, String>,
    /// Language tag to comment stripping rule
    pub strip_rules: HashMap<String, StripRule>,
}

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleConfig {
    fn default() -> Self {
        let languages = [
            (".md", "md"),
            (".markdown", "md"),
            (".txt", ""),
            (".rst", "rst"),
            (".html", "html"),
            (".htm", "html"),
            (".xml", "xml"),
            (".json", "json"),
            (".yml", "yaml"),
            (".yaml", "yaml"),
            (".csv", "csv"),
            (".tsv", "tsv"),
            (".py", "python"),
            (".ipynb", "json"),
            (".js", "javascript"),
            (".ts", "ts"),
            (".tsx", "tsx"),
            (".jsx", "jsx"),
            (".java", "java"),
            (".c", "c"),
            (".h", "c"),
            (".cpp", "cpp"),
            (".hpp", "cpp"),
            (".cs", "csharp"),
            (".go", "go"),
            (".rb", "ruby"),
            (".php", "php"),
            (".sh", "bash"),
            (".bash", "bash"),
            (".zsh", "bash"),
            (".ps1", "powershell"),
            (".lua", "lua"),
            (".rs", "rust"),
            (".kt", "kotlin"),
            (".swift", "swift"),
            (".sql", "sql"),
            (".r", "r"),
            (".dockerfile", "dockerfile"),
        ]
        .into_iter()
        .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
        .collect();

        let code_like = [
            "python",
            "javascript",
            "ts",
            "tsx",
            "jsx",
            "java",
            "c",
            "cpp",
            "csharp",
            "go",
            "rust",
            "swift",
            "kt",
            "kotlin",
            "sql",
        ];
        let strip_rules = code_like
            .iter()
            .map(|tag| (tag.to_string(), StripRule::CodeLike))
            .chain(
                ["html", "xml"]
                    .iter()
                    .map(|tag| (tag.to_string(), StripRule::Markup)),
            )
            .collect();

        Self {
            ignored_dirs: set(&[
                ".git",
                ".vscode",
                "__pycache__",
                "node_modules",
                "dist",
                "build",
                ".venv",
                ".cache",
                ".idea",
                ".next",
                "generated",
                "migrations",
                ".vercel",
                "android",
                "messages",
                "export",
            ]),
            ignored_exact_filenames: set(&["tsconfig.tsbuildinfo", "pnpm-lock.yaml"]),
            ignored_name_fragments: list(&[
                "jquery",
                "font-awesome",
                "fontawesome",
                "pnpm-lock",
                "package-lock",
                "yarn",
                ".env",
            ]),
            ignored_suffixes: list(&[".min.css", ".min.js"]),
            collapsible_extensions: set(&[
                ".json", ".css", ".html", ".svg", ".md", ".xml", ".yml", ".yaml",
            ]),
            collapsible_paths: list(&["components/ui"]),
            media_mime_prefixes: list(&["image/", "audio/", "font/"]),
            font_mimes: set(&[
                "application/font-ttf",
                "application/x-font-ttf",
                "application/x-font-truetype",
                "application/font-sfnt",
                "application/x-font-sfnt",
                "application/vnd.ms-fontobject",
                "application/font-woff",
                "application/x-font-woff",
                "application/font-woff2",
                "application/x-font-opentype",
            ]),
            font_extensions: set(&[
                ".ttf", ".otf", ".woff", ".woff2", ".eot", ".sfnt", ".pfa", ".pfb",
            ]),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            languages,
            strip_rules,
        }
    }
}

impl RuleConfig {
    /// Replace the maximum embedded file size
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Language tag for a lower-cased extension (with dot); empty if unknown
    pub fn language_for(&self, extension: &str) -> &str {
        self.languages
            .get(extension)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Stripping rule for a language tag
    pub fn strip_rule_for(&self, lang: &str) -> StripRule {
        self.strip_rules.get(lang).copied().unwrap_or(StripRule::None)
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to bundle
    pub target_dir: PathBuf,

    /// Output Markdown file path
    pub output_file: PathBuf,

    /// Whether the running executable may appear in the output
    pub include_self: bool,

    /// Number of parts to split the export into (0 or 1 means a single file)
    pub split: usize,

    /// Whether comments and blank lines are stripped from code
    pub strip_noise: bool,

    /// Whether the TypeScript check runs
    pub type_check: bool,

    /// Upper bound on the TypeScript check run time
    pub type_check_timeout: Duration,

    /// Rule tables
    pub rules: RuleConfig,
}

impl Config {
    /// Create a configuration with defaults for everything but the paths
    pub fn new(target_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_file: output_file.into(),
            include_self: false,
            split: 0,
            strip_noise: true,
            type_check: true,
            type_check_timeout: Duration::from_secs(DEFAULT_TYPE_CHECK_TIMEOUT_SECS),
            rules: RuleConfig::default(),
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let mut rules = RuleConfig::default();
        if let Some(max_size) = args.max_size {
            rules = rules.with_max_file_size(max_size);
        }

        Self {
            target_dir: PathBuf::from(args.directory_path),
            output_file: PathBuf::from(args.output_file),
            include_self: args.include_self,
            split: args.split,
            strip_noise: !args.no_strip,
            type_check: !args.no_type_check,
            type_check_timeout: Duration::from_secs(args.timeout),
            rules,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.target_dir.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            self.target_dir.display()
        );
        crate::ensure!(
            !self.output_file.is_dir(),
            Config,
            "Output path is a directory: {}",
            self.output_file.display()
        );

        // Check if output file directory exists
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(BundleError::PathNotFound(format!(
                    "Output directory not found: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}
