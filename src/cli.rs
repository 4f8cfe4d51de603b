//! CLI interface for the skill gap toolkit

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skill-gap")]
#[command(about = "Career skill gap analysis, salary estimation and market trends")]
#[command(long_about = "Match your skills against job roles using semantic embeddings, estimate salaries by experience level, explore in-demand skills and track learning progress")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Job skills dataset (CSV); overrides the configured path
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match your skills against a job role
    Analyze {
        /// Your skills, comma separated
        #[arg(short, long)]
        skills: String,

        /// Target job title, exactly as listed by `roles`
        #[arg(short, long)]
        role: String,

        /// Experience level: beginner, intermediate, advanced
        #[arg(short, long, default_value = "intermediate")]
        level: String,

        /// Show the skills a specific company asks for in this role
        #[arg(long)]
        company: Option<String>,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Explore market trends across the dataset
    Trends {
        #[command(subcommand)]
        view: TrendView,

        /// Output format: console, json
        #[arg(short, long, global = true)]
        output: Option<String>,
    },

    /// Show progress on a role given the skills you have completed
    Progress {
        /// Target job title
        #[arg(short, long)]
        role: String,

        /// Completed skills, comma separated
        #[arg(long, default_value = "")]
        completed: String,

        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List job roles and companies in the dataset
    Roles {
        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize the dataset
    Summary {
        /// Output format: console, json
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Interactive session
    Session,

    /// Embedding model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum TrendView {
    /// Most demanded skills
    Skills {
        /// Number of skills to show (defaults to output.top_skills)
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Job postings per location
    Locations,

    /// Job postings per month and role
    Monthly,

    /// Compensation distribution per role
    Salaries,
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known and downloaded embedding models
    List,

    /// Download the configured embedding model
    Download {
        /// Force re-download if the model exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show model information
    Info {
        /// Model name or HuggingFace repo ID (defaults to the configured model)
        model: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "embedding.revision")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}
