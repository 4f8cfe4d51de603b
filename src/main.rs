//! skill-gap: career skill gap analysis, salary estimation and market trends

use clap::Parser;
use log::{error, info};
use skill_gap::cli::{self, Cli, Commands, ConfigAction, ModelAction, TrendView};
use skill_gap::config::{Config, EmbeddingBackend, OutputFormat};
use skill_gap::dataset::{DatasetLoader, JobDataset};
use skill_gap::error::{Result, SkillGapError};
use skill_gap::output::formatter::save_report_to_file;
use skill_gap::output::{AnalysisReport, ProgressReport, ReportGenerator, RoleListing, TrendReport};
use skill_gap::processing::embedding_manager::EmbeddingModelManager;
use skill_gap::processing::{ExperienceLevel, MarketTrendAggregator, SkillGapAnalyzer, TextNormalizer};
use skill_gap::session::{Session, SessionAction, SessionResponse};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    let generator = ReportGenerator::from_config(&config.output);

    match command {
        Commands::Analyze {
            skills,
            role,
            level,
            company,
            output,
            save,
        } => {
            let level: ExperienceLevel = level.parse()?;
            let format = resolve_format(output.as_deref(), &config)?;

            let dataset = load_dataset(&config)?;
            let mut analyzer = build_analyzer(&config).await?;
            let user_skills = analyzer.normalizer().normalize(&skills);

            info!("Analyzing {} skills against role '{}'", user_skills.len(), role);
            let report = AnalysisReport::generate(
                &dataset,
                &mut analyzer,
                &user_skills,
                &role,
                level,
                company.as_deref(),
            )?;

            let rendered = generator.formatter(&format).format_analysis(&report)?;
            println!("{}", rendered);

            if let Some(path) = save {
                let content = match format {
                    OutputFormat::Console => ReportGenerator::with_options(false, true)
                        .formatter(&format)
                        .format_analysis(&report)?,
                    OutputFormat::Json => rendered,
                };
                save_report_to_file(&content, &path)?;
                println!("💾 Report saved to {}", path.display());
            }
        }

        Commands::Trends { view, output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let dataset = load_dataset(&config)?;
            let records = dataset.records();

            let report = match view {
                TrendView::Skills { top } => {
                    TrendReport::Skills(MarketTrendAggregator::top(records, top.unwrap_or(config.output.top_skills)))
                }
                TrendView::Locations => TrendReport::Locations(MarketTrendAggregator::location_distribution(records)),
                TrendView::Monthly => TrendReport::Monthly(MarketTrendAggregator::monthly_demand(records)),
                TrendView::Salaries => TrendReport::Salaries(MarketTrendAggregator::salary_distribution(records)),
            };

            println!("{}", generator.formatter(&format).format_trends(&report)?);
        }

        Commands::Progress { role, completed, output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let dataset = load_dataset(&config)?;

            let completed = TextNormalizer::new().normalize(&completed);
            let report = ProgressReport::generate(&dataset, &role, &completed)?;
            println!("{}", generator.formatter(&format).format_progress(&report)?);
        }

        Commands::Roles { output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let dataset = load_dataset(&config)?;
            let listing = RoleListing::from_dataset(&dataset);
            println!("{}", generator.formatter(&format).format_roles(&listing)?);
        }

        Commands::Summary { output } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let dataset = load_dataset(&config)?;
            println!("{}", generator.formatter(&format).format_summary(&dataset.summary())?);
        }

        Commands::Session => {
            let dataset = load_dataset(&config)?;
            let mut analyzer = build_analyzer(&config).await?;
            run_session(&dataset, &mut analyzer, &generator, &config)?;
        }

        Commands::Models { action } => {
            let manager = EmbeddingModelManager::new(config.embedding.models_dir.clone()).await?;

            match action {
                ModelAction::List => {
                    println!("📚 Embedding Models\n");
                    let downloaded = manager.list_downloaded_models().await?;

                    for model in manager.list_available_models() {
                        let is_downloaded = downloaded.iter().any(|id| id.starts_with(&format!("{}@", model.repo_id)));
                        let status = if is_downloaded { "✅ Downloaded" } else { "⬇️  Available" };
                        println!(
                            "  • {} ({}) - {} MB, {} dims [{}]",
                            model.name, model.repo_id, model.size_mb, model.dimensions, status
                        );
                        println!("    {}", model.description);
                    }

                    if !downloaded.is_empty() {
                        println!("\n📁 On disk:");
                        for id in &downloaded {
                            println!("  • {}", id);
                        }
                    }

                    println!("\n🔧 Configured: {}", config.embedding.model_id());
                }

                ModelAction::Download { force } => {
                    if config.embedding.backend == EmbeddingBackend::Hashed {
                        println!("⚠️  The hashed backend needs no model files");
                        return Ok(());
                    }

                    println!("⬇️  Downloading model: {}", config.embedding.model_id());
                    if force {
                        println!("🔄 Force download enabled");
                    }

                    let model_path = manager.ensure_model_available(&config.embedding, force).await?;
                    println!("✅ Model ready");
                    println!("📁 Location: {}", model_path.display());
                }

                ModelAction::Info { model } => {
                    let model = model.unwrap_or_else(|| config.embedding.repo_id.clone());
                    let model_info = manager
                        .get_model_info(&model)
                        .ok_or_else(|| SkillGapError::ModelError(format!("Unknown embedding model: {}", model)))?;

                    println!("📋 Model Information for '{}'\n", model);
                    println!("Name: {}", model_info.name);
                    println!("Repository: {}", model_info.repo_id);
                    println!("Dimensions: {}", model_info.dimensions);
                    println!("Size: {} MB", model_info.size_mb);
                    println!("Description: {}", model_info.description);

                    let revisions: Vec<String> = manager
                        .list_downloaded_models()
                        .await?
                        .into_iter()
                        .filter_map(|id| id.strip_prefix(&format!("{}@", model_info.repo_id)).map(String::from))
                        .collect();
                    if revisions.is_empty() {
                        println!("Status: ⬇️  Available for download");
                    } else {
                        println!("Status: ✅ Downloaded (revisions: {})", revisions.join(", "));
                    }
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| SkillGapError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("{}", rendered);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut updated = Config::load_from(config_path)?;
                updated.set_value(&key, &value)?;
                updated.save_to(config_path)?;
                println!("✅ Set {} = {}", key, value);
            }
        },
    }

    Ok(())
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(SkillGapError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn load_dataset(config: &Config) -> Result<JobDataset> {
    let normalizer = TextNormalizer::new();
    DatasetLoader::new(&normalizer).load_path(&config.dataset.path)
}

/// Build the analyzer, downloading the pinned model first when needed
async fn build_analyzer(config: &Config) -> Result<SkillGapAnalyzer> {
    if config.embedding.backend == EmbeddingBackend::Model2Vec {
        let manager = EmbeddingModelManager::new(config.embedding.models_dir.clone()).await?;
        manager.ensure_model_available(&config.embedding, false).await?;
    }

    info!("Using embedding model {}", config.embedding.model_id());
    SkillGapAnalyzer::from_config(config)
}

fn run_session(
    dataset: &JobDataset,
    analyzer: &mut SkillGapAnalyzer,
    generator: &ReportGenerator,
    config: &Config,
) -> Result<()> {
    let formatter = generator.formatter(&OutputFormat::Console);
    let mut session = Session::new(session_id()).with_top_skills(config.output.top_skills);

    println!("🎯 skill-gap interactive session ({} job postings loaded)", dataset.len());
    println!("Type `help` for commands.\n");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let response = line
            .parse::<SessionAction>()
            .and_then(|action| session.handle(action, dataset, analyzer));

        match response {
            Ok(SessionResponse::Quit) => break,
            Ok(SessionResponse::Message(message)) => println!("{}", message),
            Ok(SessionResponse::Analysis(report)) => println!("{}", formatter.format_analysis(&report)?),
            Ok(SessionResponse::Progress(report)) => println!("{}", formatter.format_progress(&report)?),
            Ok(SessionResponse::Trends(report)) => println!("{}", formatter.format_trends(&report)?),
            Ok(SessionResponse::Roles(listing)) => println!("{}", formatter.format_roles(&listing)?),
            Err(e) => println!("❌ {}", e),
        }
    }

    info!("Session {} ended", session.id());
    Ok(())
}

fn session_id() -> String {
    format!("cli-{}", chrono::Utc::now().format("%Y%m%d%H%M%S"))
}
