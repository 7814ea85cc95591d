//! Sitegrade: SEO Page Auditor CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sitegrade::analyzer::{AuditEngine, AuditTarget};
use sitegrade::config::{build_ignore_set, is_ignored, load_config, page_url_for, Config, CONFIG_FILENAME};
use sitegrade::history::{append_run, find_project_root, format_delta, load_history, previous_score, save_history};
use sitegrade::reporter::{ConsoleReporter, JsonReporter};
use sitegrade::sample::{SAMPLE_DOCUMENT, SAMPLE_URL};
use sitegrade::AnalysisResult;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// Sitegrade: rule-based SEO auditor for HTML pages
#[derive(Parser, Debug)]
#[command(name = "sitegrade")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTML file, directory, or `-` for stdin (omit when using a subcommand or --sample)
    #[arg(required_unless_present = "sample")]
    path: Option<PathBuf>,

    /// Page URL to audit the markup as (default: derived from baseUrl, else empty)
    #[arg(long, short)]
    url: Option<String>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<u8>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (show informational and passing checks)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .sitegraderc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run analysis in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Do not read or write .sitegrade-history.json
    #[arg(long)]
    no_history: bool,

    /// Audit the built-in sample page
    #[arg(long, conflicts_with = "path")]
    sample: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .sitegraderc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,

        /// Site root used to derive page URLs (e.g. https://example.com)
        #[arg(long)]
        base_url: Option<String>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Where the markup comes from
enum Input {
    Sample,
    Stdin,
    Files(Vec<PathBuf>),
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init {
        threshold,
        base_url,
        dir,
    }) = args.command
    {
        return run_init(threshold, base_url, dir.as_deref());
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let path = args.path.clone();

    // Resolve work directory for config and history search
    let work_dir: PathBuf = match path.as_deref() {
        Some(p) if p.is_file() => p.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone()),
        Some(p) if p.is_dir() => p.to_path_buf(),
        _ => cwd.clone(),
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(args.threshold, None);

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore).context("Invalid ignore pattern in config")?)
    };

    let input = if args.sample {
        Input::Sample
    } else {
        match path.as_deref() {
            Some(p) if p.as_os_str() == "-" => Input::Stdin,
            Some(p) => Input::Files(collect_html_files(p, ignore_set.as_ref())?),
            None => anyhow::bail!("No input given; pass a path, `-`, or --sample"),
        }
    };

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = AuditEngine::new();
    let mut had_errors = false;

    let results: Vec<(String, AnalysisResult)> = match input {
        Input::Sample => {
            let url = args.url.as_deref().unwrap_or(SAMPLE_URL);
            vec![(
                url.to_string(),
                engine.analyze_with_config(SAMPLE_DOCUMENT, url, &config),
            )]
        }
        Input::Stdin => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("Failed to read markup from stdin")?;
            let markup = String::from_utf8_lossy(&bytes);
            let url = args.url.as_deref().unwrap_or_default();
            vec![("-".to_string(), engine.analyze_with_config(&markup, url, &config))]
        }
        Input::Files(files) => {
            if files.is_empty() {
                eprintln!("{}: No HTML files found", "Warning".yellow());
                return Ok(ExitCode::from(2));
            }
            let root = path.as_deref().unwrap_or(Path::new("."));
            let targets = build_targets(&files, root, args.url.as_deref(), &config)?;
            let use_parallel = args.parallel || targets.len() > 10;
            let outcomes = if use_parallel {
                engine.audit_parallel(&targets, Some(&config))
            } else {
                engine.audit_many(&targets, Some(&config))
            };

            let mut results = Vec::with_capacity(outcomes.len());
            for (target, outcome) in targets.iter().zip(outcomes) {
                match outcome {
                    Ok(result) => results.push((target.path.display().to_string(), result)),
                    Err(e) => {
                        had_errors = true;
                        if !args.quiet {
                            eprintln!("{}: Failed to audit {}: {}", "Error".red(), target.path.display(), e);
                        }
                    }
                }
            }
            results
        }
    };

    if results.is_empty() {
        eprintln!("{}: All files failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let plain: Vec<AnalysisResult> = results.iter().map(|(_, r)| r.clone()).collect();
    let stats = AuditEngine::aggregate_stats(&plain);

    let project_root = if args.no_history {
        None
    } else {
        find_project_root(&work_dir)
    };

    // Output results
    if args.json {
        let reporter = JsonReporter::new().pretty();
        if plain.len() == 1 {
            println!("{}", reporter.report(&plain[0]));
        } else {
            println!("{}", reporter.report_with_summary(&plain, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        let history = project_root.as_deref().map(load_history);
        for (label, result) in &results {
            let delta = history
                .as_ref()
                .map(|h| format_delta(previous_score(h, label), result.overall_score))
                .unwrap_or_default();
            reporter.report_quiet(label, result, &delta);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if results.len() == 1 {
            reporter.report(&results[0].0, &results[0].1);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    // Persist trend history
    if let Some(ref root) = project_root {
        let mut h = load_history(root);
        append_run(&mut h, &results, None);
        if let Err(e) = save_history(root, &h) {
            log::warn!("Failed to save history in {}: {}", root.display(), e);
        }
    }

    // Check threshold (CLI, then per-file override, then config)
    let threshold = args.threshold.or_else(|| match args.path.as_deref() {
        Some(p) if p.is_file() && results.len() == 1 => config.effective_for_file(p).threshold,
        _ => config.threshold,
    });
    if let Some(threshold) = threshold {
        let score = if plain.len() == 1 {
            plain[0].overall_score
        } else {
            stats.average_score
        };

        if score < threshold {
            if !args.quiet && !args.json {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Pair each file with the URL it is audited as. An explicit `--url` wins;
/// otherwise `baseUrl` is joined with the path relative to `root`.
fn build_targets(
    files: &[PathBuf],
    root: &Path,
    url: Option<&str>,
    config: &Config,
) -> Result<Vec<AuditTarget>> {
    let site_root = if root.is_file() {
        root.parent().unwrap_or(Path::new(""))
    } else {
        root
    };

    files
        .iter()
        .map(|file| {
            let page_url = match (url, config.base_url.as_deref()) {
                (Some(u), _) => u.to_string(),
                (None, Some(base)) => {
                    let relative = file.strip_prefix(site_root).unwrap_or(file);
                    page_url_for(base, relative)
                        .with_context(|| format!("Cannot derive a URL for {}", file.display()))?
                }
                (None, None) => String::new(),
            };
            Ok(AuditTarget::new(file.clone(), page_url))
        })
        .collect()
}

fn collect_html_files(path: &Path, ignore_set: Option<&globset::GlobSet>) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if entry.file_type().is_file() && is_html_file(file_path) {
            if let Some(set) = ignore_set {
                if is_ignored(file_path, set) {
                    continue;
                }
            }
            files.push(file_path.to_path_buf());
        }
    }

    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn is_html_file(path: &Path) -> bool {
    if path.components().any(|c| c.as_os_str() == "node_modules") {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

fn run_init(threshold: Option<u8>, base_url: Option<String>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(ref url) = base_url {
        page_url_for(url, Path::new("")).context("Invalid --base-url")?;
    }

    let threshold_value = threshold.unwrap_or(70);
    let base_url_line = base_url
        .as_deref()
        .map(|u| format!("\n  \"baseUrl\": {},", serde_json::Value::from(u)))
        .unwrap_or_default();

    let json = format!(
        r#"{{
  "threshold": {},{}
  "rules": {{
    "perf-4": "info",
    "meta-4": "info"
  }},
  "ignore": [
    "**/node_modules/**",
    "**/drafts/**"
  ],
  "overrides": [
    {{
      "files": ["**/legacy/**"],
      "threshold": 50
    }}
  ]
}}
"#,
        threshold_value, base_url_line
    );

    std::fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}
