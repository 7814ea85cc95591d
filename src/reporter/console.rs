//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::{AnalysisResult, Grade, Issue, Severity};
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single analysis result. `label` names the source (path, `-` or URL).
    pub fn report(&self, label: &str, result: &AnalysisResult) {
        self.print_header(label, result);
        self.print_score(result);
        self.print_breakdown(result);
        self.print_issues(result);
        self.print_recommendations(result);
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[(String, AnalysisResult)], stats: &AggregateStats) {
        for (label, result) in results {
            self.report(label, result);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score, with an optional trend suffix).
    /// Plain text so the line stays grep-friendly.
    pub fn report_quiet(&self, label: &str, result: &AnalysisResult, delta: &str) {
        println!(
            "{}: {} ({}){}",
            label, result.overall_score, result.grade, delta
        );
    }

    fn print_header(&self, label: &str, result: &AnalysisResult) {
        println!();
        println!("{}", format!("🔍 SEO Audit: {}", label).bold());
        let info = &result.page_info;
        if !result.url.is_empty() && result.url != label {
            println!("   URL: {}", result.url);
        }
        if !info.title.is_empty() {
            println!("   Title: {}", info.title);
        }
        println!(
            "   Words: {} | Size: {:.1} KB | Est. load: {:.2}s",
            info.word_count,
            info.page_size as f64 / 1024.0,
            info.load_time
        );
        println!();
    }

    fn print_score(&self, result: &AnalysisResult) {
        let grade_str = self.colorize_grade(&result.grade);
        let score_bar = self.create_score_bar(result.overall_score);

        println!("   Score: {} {}", score_bar, grade_str.bold());
        println!(
            "   {}",
            ScoreCalculator::grade_description(result.grade).dimmed()
        );
        let s = &result.summary;
        println!(
            "   {} critical, {} warnings, {} info, {} passed",
            s.critical.to_string().red(),
            s.warning.to_string().yellow(),
            s.info.to_string().blue(),
            s.success.to_string().green()
        );
        println!();
    }

    fn print_breakdown(&self, result: &AnalysisResult) {
        println!("   {}", "Categories:".bold());
        for (_, cat) in result.categories.iter() {
            let bar = self.create_mini_bar(cat.score, cat.max_score);
            let score_str = format!("{:>3}/{}", cat.score, cat.max_score);
            let colored_score = if cat.percentage >= 80 {
                score_str.green()
            } else if cat.percentage >= 60 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            println!("   {} {} {} {}", bar, colored_score, cat.icon, cat.name);
        }
        println!();
    }

    fn print_issues(&self, result: &AnalysisResult) {
        let problems = result.summary.critical + result.summary.warning;
        if problems == 0 && !self.verbose {
            return;
        }
        println!("   {}", "Issues Found:".bold());

        for cat in result.categories.iter().map(|(_, c)| c) {
            let shown: Vec<&Issue> = cat
                .issues
                .iter()
                .filter(|i| {
                    self.verbose || matches!(i.severity, Severity::Critical | Severity::Warning)
                })
                .collect();
            if shown.is_empty() {
                continue;
            }
            println!("   {} {}", cat.icon, cat.name.bold());
            for issue in shown {
                self.print_issue(issue);
            }
        }

        if !self.verbose {
            let hidden = result.summary.info + result.summary.success;
            if hidden > 0 {
                println!(
                    "   {} {} informational and passing checks (use --verbose to show)",
                    "ℹ".blue(),
                    hidden
                );
            }
        }

        println!();
    }

    fn print_issue(&self, issue: &Issue) {
        let icon = match issue.severity {
            Severity::Critical => "✗".red(),
            Severity::Warning => "⚠".yellow(),
            Severity::Info => "ℹ".blue(),
            Severity::Success => "✓".green(),
        };

        let points = format!("{}/{}", issue.points, issue.max_points);
        println!(
            "     {} {} [{}] {}",
            icon,
            points.dimmed(),
            issue.id.dimmed(),
            issue.title
        );

        if self.verbose {
            println!("         {}", issue.description.dimmed());
        }

        if let Some(ref fix) = issue.fix_guidance {
            println!("         {} {}", "→".dimmed(), fix.italic());
        }
    }

    fn print_recommendations(&self, result: &AnalysisResult) {
        if result.overall_score >= 90 {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        for rec in ScoreCalculator::recommendations(&result.categories) {
            println!("   {} {}", "→".cyan(), rec);
        }
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Pages analyzed: {}",
            stats.pages_analyzed.to_string().bold()
        );
        println!(
            "   Average score:  {} ({})",
            stats.average_score.to_string().bold(),
            self.colorize_grade(&stats.average_grade)
        );
        println!(
            "   Issues:         {} critical, {} warnings",
            stats.summary.critical, stats.summary.warning
        );
        println!();
    }

    fn colorize_grade(&self, grade: &Grade) -> colored::ColoredString {
        let s = grade.to_string();
        match grade {
            Grade::APlus | Grade::A => s.green().bold(),
            Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: u8) -> String {
        let filled = (score.min(100) as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), score);

        if self.use_colors {
            if score >= 80 {
                bar.green().to_string()
            } else if score >= 60 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u32, max: u32) -> String {
        let filled = if max == 0 {
            0
        } else {
            (score.min(max) as usize * 10) / max as usize
        };
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
