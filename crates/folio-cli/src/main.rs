//! Folio CLI - validate, summarize and export site content.

use clap::{Parser, Subcommand};
use folio_content::{ContentError, SiteConfig, SiteContent, SITE_YAML};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site content tooling")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the content manifest and tuning config
    Check {
        /// Content manifest (default: the embedded site.yaml)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Tuning config in TOML
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print entry counts per section
    Summary {
        /// Content manifest (default: the embedded site.yaml)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export the content manifest as JSON
    ExportJson {
        /// Content manifest (default: the embedded site.yaml)
        #[arg(long)]
        content: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let result = match cli.command {
        Commands::Check { content, config } => check(
            content.as_deref(),
            config.as_deref(),
            &mut stdout,
            &mut stderr,
        ),
        Commands::Summary { content, json } => summary(content.as_deref(), json, &mut stdout),
        Commands::ExportJson { content, output } => {
            export_json(content.as_deref(), output.as_deref(), &mut stdout)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            let _ = writeln!(stderr, "error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse the manifest at `path`, or the embedded one. Validation is left to
/// the caller.
fn load_content(path: Option<&Path>) -> Result<SiteContent, CliError> {
    let content = match path {
        Some(path) => SiteContent::from_path(path)?,
        None => SiteContent::from_yaml(SITE_YAML)?,
    };
    Ok(content)
}

fn source_name(path: Option<&Path>) -> String {
    path.map_or_else(|| "embedded site.yaml".to_string(), |p| p.display().to_string())
}

/// Returns `Ok(false)` when the content or config has problems; each one is
/// written to `err`.
fn check(
    content: Option<&Path>,
    config: Option<&Path>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, CliError> {
    writeln!(out, "Checking content: {}", source_name(content))?;
    let site = load_content(content)?;
    let issues = site.issues();
    for issue in &issues {
        writeln!(err, "  {issue}")?;
    }
    let mut ok = issues.is_empty();

    if let Some(path) = config {
        writeln!(out, "Checking config: {}", path.display())?;
        if let Err(e) = SiteConfig::from_path(path) {
            writeln!(err, "  {e}")?;
            ok = false;
        }
    }

    if ok {
        writeln!(out, "Content valid!")?;
        let summary = site.summary();
        writeln!(out, "  Services: {}", summary.services)?;
        writeln!(out, "  Jobs: {}", summary.jobs)?;
        writeln!(out, "  Creative projects: {}", summary.creative_projects)?;
    } else {
        tracing::info!(issues = issues.len(), "check failed");
        writeln!(err, "Check failed: {} content issue(s)", issues.len())?;
    }
    Ok(ok)
}

fn summary(content: Option<&Path>, json: bool, out: &mut impl Write) -> Result<bool, CliError> {
    let summary = load_content(content)?.summary();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write!(out, "{summary}")?;
    }
    Ok(true)
}

fn export_json(
    content: Option<&Path>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<bool, CliError> {
    let site = load_content(content)?;
    site.validate()?;
    let json = site.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json.as_bytes())?;
            tracing::info!(path = %path.display(), bytes = json.len(), "exported content");
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("folio-cli-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).expect("write temp file");
        path
    }

    fn run_check(content: Option<&Path>, config: Option<&Path>) -> (bool, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let ok = check(content, config, &mut out, &mut err).expect("check");
        (
            ok,
            String::from_utf8(out).expect("utf8"),
            String::from_utf8(err).expect("utf8"),
        )
    }

    // ===== Argument Parsing =====

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_paths() {
        let cli = Cli::parse_from(["folio", "check", "--content", "a.yaml", "--config", "b.toml"]);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Check { content, config } => {
                assert_eq!(content, Some(PathBuf::from("a.yaml")));
                assert_eq!(config, Some(PathBuf::from("b.toml")));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["folio", "summary", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_export_json() {
        let cli = Cli::parse_from(["folio", "export-json", "-o", "site.json"]);
        assert!(matches!(
            cli.command,
            Commands::ExportJson { output: Some(_), content: None }
        ));
    }

    // ===== Check =====

    #[test]
    fn test_check_embedded_content() {
        let (ok, out, err) = run_check(None, None);
        assert!(ok);
        assert!(out.contains("embedded site.yaml"));
        assert!(out.contains("Content valid!"));
        assert!(out.contains("Creative projects: 4"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_check_reports_each_issue() {
        let mut yaml = SITE_YAML.replace("id: tech-recruiting", "id: ai-hr-ops");
        yaml = yaml.replace("href: \"#contact\"", "href: \"#nowhere\"");
        let path = temp_file("dup.yaml", &yaml);
        let (ok, _, err) = run_check(Some(&path), None);
        assert!(!ok);
        assert!(err.contains("ai-hr-ops"));
        assert!(err.contains("Check failed: 2 content issue(s)"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_check_rejects_bad_config() {
        let path = temp_file("bad.toml", "hero_fade_threshold = 2.0\n");
        let (ok, _, err) = run_check(None, Some(&path));
        assert!(!ok);
        assert!(err.contains("hero_fade_threshold"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_check_accepts_default_config() {
        let path = temp_file("good.toml", &SiteConfig::default().to_toml());
        let (ok, out, _) = run_check(None, Some(&path));
        assert!(ok);
        assert!(out.contains("Checking config"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_check_missing_file_is_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = check(
            Some(Path::new("/nonexistent/site.yaml")),
            None,
            &mut out,
            &mut err,
        );
        assert!(matches!(result, Err(CliError::Content(ContentError::Io { .. }))));
    }

    // ===== Summary and Export =====

    #[test]
    fn test_summary_table() {
        let mut out = Vec::new();
        assert!(summary(None, false, &mut out).expect("summary"));
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("hero stats"));
        assert!(text.contains("creative projects"));
    }

    #[test]
    fn test_summary_json() {
        let mut out = Vec::new();
        summary(None, true, &mut out).expect("summary");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["hero_stats"], 3);
        assert_eq!(value["creative_projects"], 4);
    }

    #[test]
    fn test_export_json_to_stdout() {
        let mut out = Vec::new();
        export_json(None, None, &mut out).expect("export");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(value["creative"]["projects"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn test_export_json_to_file() {
        let path = std::env::temp_dir().join(format!("folio-cli-{}-out.json", std::process::id()));
        let mut out = Vec::new();
        export_json(None, Some(&path), &mut out).expect("export");
        assert!(out.is_empty());
        let written = std::fs::read_to_string(&path).expect("read");
        assert!(written.contains("\"services\""));
        std::fs::remove_file(path).ok();
    }
}
