//! Output formatters for console and JSON presentation

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::*;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering reports in one output format
pub trait OutputFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String>;
    fn format_progress(&self, report: &ProgressReport) -> Result<String>;
    fn format_trends(&self, report: &TrendReport) -> Result<String>;
    fn format_roles(&self, listing: &RoleListing) -> Result<String>;
    fn format_summary(&self, summary: &SummaryReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Report generator that dispatches to the configured formatter
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, percentage: f64) -> String {
        let (badge, color) = match percentage {
            p if p >= 80.0 => ("STRONG", Color::Green),
            p if p >= 60.0 => ("GOOD", Color::BrightGreen),
            p if p >= 40.0 => ("PARTIAL", Color::Yellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_skill_list(&self, skills: &[String], color: Color) -> String {
        if skills.is_empty() {
            return format!("  {}\n", self.colorize("(none)", Color::BrightBlack));
        }
        skills
            .iter()
            .map(|skill| format!("  • {}\n", self.colorize(skill, color)))
            .collect()
    }

    fn format_money(value: f64) -> String {
        let cents = (value * 100.0).round() as i64;
        let whole = (cents / 100).to_string();

        let mut grouped = String::new();
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!("${}.{:02}", grouped, cents % 100)
    }

    fn bar(&self, count: usize, max: usize) -> String {
        const WIDTH: usize = 30;
        let filled = if max == 0 { 0 } else { (count * WIDTH).div_ceil(max) };
        self.colorize(&"■".repeat(filled), Color::Cyan)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("SKILL GAP ANALYSIS", 1));
        output.push_str(&format!(
            "Role: {} | Experience: {}\n",
            self.colorize(&report.job_title, Color::Cyan),
            report.experience_level
        ));

        output.push_str(&self.format_header("Match", 2));
        output.push_str(&format!(
            "Match Score: {:.2}% {}\n",
            report.match_percentage,
            self.format_score_badge(report.match_percentage)
        ));
        output.push_str(&format!("Raw Similarity: {:.4}\n", report.raw_similarity));
        output.push_str(&format!("Verdict: {}\n", self.colorize(report.verdict(), Color::Cyan)));

        output.push_str(&self.format_header("Skills You Have", 3));
        output.push_str(&self.format_skill_list(&report.acquired_skills, Color::Green));

        output.push_str(&self.format_header("Skills To Learn", 3));
        output.push_str(&self.format_skill_list(&report.missing_skills, Color::Yellow));

        if let Some(resources) = &report.learning_resources {
            output.push_str(&self.format_header("Learning Resources", 3));
            output.push_str(&format!("  {}\n", resources));
        }

        output.push_str(&self.format_header("Salary", 2));
        output.push_str(&format!("Base Compensation: {}\n", Self::format_money(report.base_compensation)));
        output.push_str(&format!(
            "Predicted Salary: {}\n",
            self.colorize(&Self::format_money(report.predicted_salary), Color::Green)
        ));

        if let Some(company) = &report.company {
            output.push_str(&self.format_header(&format!("Skills Required At {}", company.company), 2));
            output.push_str(&self.format_skill_list(&company.skills, Color::White));
        }

        output.push_str(&format!(
            "\n{} skill-gap v{} | Model: {}\n",
            self.colorize("ℹ", Color::Blue),
            report.metadata.tool_version,
            report.metadata.embedding_model
        ));

        Ok(output)
    }

    fn format_progress(&self, report: &ProgressReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&format!("PROGRESS: {}", report.job_title), 1));
        output.push_str(&format!("Completed: {:.2}%\n", report.percentage));

        output.push_str(&self.format_header("Completed Skills", 3));
        output.push_str(&self.format_skill_list(&report.completed_skills, Color::Green));

        output.push_str(&self.format_header("Remaining Skills", 3));
        output.push_str(&self.format_skill_list(&report.remaining_skills, Color::Yellow));

        if report.complete {
            output.push_str(&format!(
                "\n{}\n",
                self.colorize("All required skills completed!", Color::Green)
            ));
        }

        Ok(output)
    }

    fn format_trends(&self, report: &TrendReport) -> Result<String> {
        let mut output = String::new();

        match report {
            TrendReport::Skills(skills) => {
                output.push_str(&self.format_header("IN-DEMAND SKILLS", 1));
                let max = skills.first().map_or(0, |s| s.count);
                for (i, demand) in skills.iter().enumerate() {
                    output.push_str(&format!(
                        "{:>3}. {:<30} {:>5} {}\n",
                        i + 1,
                        demand.skill,
                        demand.count,
                        self.bar(demand.count, max)
                    ));
                }
            }
            TrendReport::Locations(locations) => {
                output.push_str(&self.format_header("JOB POSTINGS BY LOCATION", 1));
                let max = locations.first().map_or(0, |l| l.count);
                for demand in locations {
                    output.push_str(&format!(
                        "  {:<30} {:>5} {}\n",
                        demand.location,
                        demand.count,
                        self.bar(demand.count, max)
                    ));
                }
            }
            TrendReport::Monthly(months) => {
                output.push_str(&self.format_header("MONTHLY DEMAND BY ROLE", 1));
                for month in months {
                    output.push_str(&self.format_header(&month.month, 3));
                    for (title, count) in &month.postings {
                        output.push_str(&format!("  {:<30} {:>5}\n", title, count));
                    }
                }
            }
            TrendReport::Salaries(stats) => {
                output.push_str(&self.format_header("SALARY DISTRIBUTION BY ROLE", 1));
                for role in stats {
                    output.push_str(&self.format_header(&format!("{} ({} postings)", role.job_title, role.count), 3));
                    output.push_str(&format!(
                        "  min {} | q1 {} | median {} | q3 {} | max {}\n  mean {}\n",
                        Self::format_money(role.min),
                        Self::format_money(role.q1),
                        Self::format_money(role.median),
                        Self::format_money(role.q3),
                        Self::format_money(role.max),
                        Self::format_money(role.mean)
                    ));
                }
            }
        }

        Ok(output)
    }

    fn format_roles(&self, listing: &RoleListing) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("JOB ROLES", 2));
        for role in &listing.roles {
            output.push_str(&format!("  • {}\n", role));
        }

        output.push_str(&self.format_header("COMPANIES", 2));
        for company in &listing.companies {
            output.push_str(&format!("  • {}\n", company));
        }

        Ok(output)
    }

    fn format_summary(&self, summary: &SummaryReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("DATASET SUMMARY", 1));
        output.push_str(&format!("Rows: {}\n", summary.rows));
        output.push_str(&format!("Job Roles: {}\n", summary.roles));
        output.push_str(&format!("Companies: {}\n", summary.companies));
        if let (Some(min), Some(max), Some(mean)) =
            (summary.compensation_min, summary.compensation_max, summary.compensation_mean)
        {
            output.push_str(&format!(
                "Compensation: {} - {} (mean {})\n",
                Self::format_money(min),
                Self::format_money(max),
                Self::format_money(mean)
            ));
        }

        if !summary.missing_values.is_empty() {
            output.push_str(&self.format_header("Missing Values", 3));
            for column in &summary.missing_values {
                let count = column.missing.to_string();
                let count = if column.missing > 0 {
                    self.colorize(&count, Color::Yellow)
                } else {
                    count
                };
                output.push_str(&format!("  {:<25} {}\n", column.column, count));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_progress(&self, report: &ProgressReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_trends(&self, report: &TrendReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_roles(&self, listing: &RoleListing) -> Result<String> {
        self.to_json(listing)
    }

    fn format_summary(&self, summary: &SummaryReport) -> Result<String> {
        self.to_json(summary)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true),
            json_formatter: JsonFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, true)
    }

    pub fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}
