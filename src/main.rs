// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use adsync::app_config::{self, Config, ConfigOverrides, TranslationProvider};
use adsync::app_controller::{Controller, FieldEdits};
use adsync::database::models::{truncate_chars, AdCopy, CountryPrompt, NewAdCopy, Translation, TranslationFilter};
use adsync::errors::AppError;
use adsync::translation::{BulkSummary, IndicatifProgress};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    OpenAI,
    Anthropic,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Text fields shared by ad copy and translation edits
#[derive(clap::Args, Debug)]
struct FieldArgs {
    /// New headline
    #[arg(long)]
    headline: Option<String>,

    /// New body; may contain <placeholder> tokens
    #[arg(long)]
    body: Option<String>,

    /// New link text (empty string clears it)
    #[arg(long)]
    link_text: Option<String>,

    /// New product name (empty string clears it)
    #[arg(long)]
    product: Option<String>,
}

impl From<FieldArgs> for FieldEdits {
    fn from(args: FieldArgs) -> Self {
        FieldEdits {
            headline: args.headline,
            body: args.body,
            link_text: args.link_text,
            product: args.product,
        }
    }
}

#[derive(Subcommand, Debug)]
enum AdsCommand {
    /// Create an ad copy template
    Create {
        #[arg(long)]
        headline: String,
        #[arg(long)]
        body: String,
        #[arg(long, default_value = "")]
        link_text: String,
        #[arg(long, default_value = "")]
        product: String,
    },
    /// List ad copies, newest first
    List,
    /// Show one ad copy
    Show { id: i64 },
    /// Edit fields of an ad copy
    Update {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete an ad copy (its translations are kept)
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum CountriesCommand {
    /// Add a target country
    Add {
        /// Two-letter country code, e.g. FR
        code: String,
        /// Language name or ISO code, e.g. French or fr
        language: String,
        /// System prompt (defaults to the configured one)
        #[arg(long)]
        system: Option<String>,
        /// User prompt
        #[arg(long)]
        user: Option<String>,
    },
    /// List configured countries
    List,
    /// Remove a country
    Delete { code: String },
}

#[derive(Subcommand, Debug)]
enum TranslationsCommand {
    /// List translations, newest first
    List {
        /// Only this country code
        #[arg(long)]
        country: Option<String>,
        /// Only translations of this ad copy
        #[arg(long)]
        ad: Option<i64>,
        /// Minimum quality score
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_quality: u8,
    },
    /// Edit fields of a translation (the score is kept)
    Update {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a translation
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum PromptsCommand {
    /// Translate sample text with candidate prompts for a country
    Test {
        /// Country code
        code: String,
        /// Candidate system prompt (defaults to the live one)
        #[arg(long)]
        system: Option<String>,
        /// Candidate user prompt (defaults to the live one)
        #[arg(long)]
        user: Option<String>,
        /// Sample text
        #[arg(long)]
        text: Option<String>,
        /// Save the tested prompts to the country afterwards
        #[arg(long)]
        save: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ProvidersCommand {
    /// Send a short request to the configured provider
    Check,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage ad copy templates
    Ads {
        #[command(subcommand)]
        action: AdsCommand,
    },
    /// Manage target countries and their prompts
    Countries {
        #[command(subcommand)]
        action: CountriesCommand,
    },
    /// Browse and curate translations
    Translations {
        #[command(subcommand)]
        action: TranslationsCommand,
    },
    /// Translate selected ad copies into selected countries
    Translate {
        /// Ad copy ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        ads: Vec<i64>,
        /// Country codes, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        countries: Vec<String>,
    },
    /// Translate every ad copy into one country, skipping existing ones
    TranslateAll {
        /// Country code
        code: String,
    },
    /// Experiment with country prompts
    Prompts {
        #[command(subcommand)]
        action: PromptsCommand,
    },
    /// Check the configured model provider
    Providers {
        #[command(subcommand)]
        action: ProvidersCommand,
    },
    /// Show record counts
    Stats,
    /// Generate shell completions for adsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// AdSync - multilingual ad copy console
///
/// Translates ad copy templates per country with a hosted language model,
/// keeping <placeholder> tokens intact, and scores every translation.
#[derive(Parser, Debug)]
#[command(name = "adsync")]
#[command(version)]
#[command(about = "AI-powered ad copy translation console")]
#[command(long_about = "AdSync stores ad copy templates, translates them per country with a language model and proofreads the results.

EXAMPLES:
    adsync ads create --headline \"Summer sale\" --body \"Get <discount>% off <product>\"
    adsync countries add FR French
    adsync translate --ads 1,2 --countries FR,DE
    adsync translate-all JP
    adsync translations list --country FR --min-quality 80
    adsync prompts test FR --user \"Keep it playful\" --save
    adsync providers check
    adsync completions bash > adsync.bash

CONFIGURATION:
    Configuration is stored in adsync.json by default. If the file doesn't
    exist, a default one is created. The API key can also be given through
    the ADSYNC_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "adsync.json", global = true)]
    config: String,

    /// SQLite database file (overrides the config)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Model provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// API key for the selected provider
    #[arg(long, env = "ADSYNC_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger itself lets everything through; set_max_level filters
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(AppError::from(e).exit_code());
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "adsync", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Ads { action } => run_ads(&controller, action).await,
        Commands::Countries { action } => run_countries(&controller, action).await,
        Commands::Translations { action } => run_translations(&controller, action).await,
        Commands::Translate { ads, countries } => {
            let progress = IndicatifProgress::new("pairs");
            let summary = controller.translate(&ads, &countries, &progress).await?;
            print_summary(&summary);
            Ok(())
        }
        Commands::TranslateAll { code } => {
            let progress = IndicatifProgress::new("ad copies");
            let summary = controller.translate_all(&code, &progress).await?;
            print_summary(&summary);
            Ok(())
        }
        Commands::Prompts {
            action: PromptsCommand::Test { code, system, user, text, save },
        } => {
            let (report, promoted) = controller.test_prompts(&code, system, user, text, save).await?;
            println!("Original:    {}", report.original);
            println!("Translation: {}", report.translation);
            println!("Score:       {} ({})", report.score, report.band);
            println!("Feedback:    {}", report.feedback);
            if report.degraded {
                warn!("Proofreading reply was unusable; score is the auto-approve default");
            }
            if let Some(country) = promoted {
                info!("Prompts saved for {}", country.country_code);
            }
            Ok(())
        }
        Commands::Providers { action: ProvidersCommand::Check } => {
            let name = controller.check_provider().await?;
            println!("{} is reachable", name);
            Ok(())
        }
        Commands::Stats => {
            let stats = controller.stats().await?;
            println!("{}", stats);
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the configuration file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    config.apply_overrides(ConfigOverrides {
        provider: cli.provider.clone().map(Into::into),
        model: cli.model.clone(),
        api_key: cli.api_key.clone(),
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone().map(Into::into),
    });

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_ads(controller: &Controller, action: AdsCommand) -> Result<()> {
    match action {
        AdsCommand::Create { headline, body, link_text, product } => {
            let ad = controller
                .create_ad_copy(NewAdCopy::new(headline, body).link_text(link_text).product(product))
                .await?;
            print_ad(&ad);
        }
        AdsCommand::List => {
            let ads = controller.list_ad_copies().await?;
            if ads.is_empty() {
                println!("No ad copies yet.");
            }
            for ad in &ads {
                println!("{:>5}  {}  {}", ad.id, ad.created_at, ad.short_headline(50));
            }
        }
        AdsCommand::Show { id } => print_ad(&controller.get_ad_copy(id).await?),
        AdsCommand::Update { id, fields } => {
            let edits: FieldEdits = fields.into();
            if edits.is_empty() {
                warn!("Nothing to update");
                return Ok(());
            }
            print_ad(&controller.update_ad_copy(id, &edits).await?);
        }
        AdsCommand::Delete { id } => controller.delete_ad_copy(id).await?,
    }
    Ok(())
}

async fn run_countries(controller: &Controller, action: CountriesCommand) -> Result<()> {
    match action {
        CountriesCommand::Add { code, language, system, user } => {
            let country = controller.add_country(&code, &language, system, user).await?;
            print_country(&country);
        }
        CountriesCommand::List => {
            let countries = controller.list_countries().await?;
            if countries.is_empty() {
                println!("No countries configured.");
            }
            for country in &countries {
                print_country(country);
            }
        }
        CountriesCommand::Delete { code } => controller.delete_country(&code).await?,
    }
    Ok(())
}

async fn run_translations(controller: &Controller, action: TranslationsCommand) -> Result<()> {
    match action {
        TranslationsCommand::List { country, ad, min_quality } => {
            let filter = TranslationFilter {
                country_code: country,
                ad_copy_id: ad,
                min_quality,
            };
            let translations = controller.list_translations(&filter).await?;
            if translations.is_empty() {
                println!("No translations match.");
            }
            for translation in &translations {
                print_translation(translation);
            }
        }
        TranslationsCommand::Update { id, fields } => {
            let edits: FieldEdits = fields.into();
            if edits.is_empty() {
                warn!("Nothing to update");
                return Ok(());
            }
            print_translation(&controller.update_translation(id, &edits).await?);
        }
        TranslationsCommand::Delete { id } => controller.delete_translation(id).await?,
    }
    Ok(())
}

fn print_ad(ad: &AdCopy) {
    println!("Ad copy #{} ({})", ad.id, ad.created_at);
    println!("  Headline:  {}", ad.headline);
    println!("  Body:      {}", ad.body);
    println!("  Link text: {}", ad.link_text().unwrap_or("-"));
    println!("  Product:   {}", ad.product().unwrap_or("-"));
}

fn print_country(country: &CountryPrompt) {
    println!("{}  {}", country.country_code, country.language);
    println!("  System: {}", truncate_chars(&country.system_prompt, 70));
    if !country.user_prompt.is_empty() {
        println!("  User:   {}", truncate_chars(&country.user_prompt, 70));
    }
}

fn print_translation(translation: &Translation) {
    println!(
        "#{} ad {} -> {} ({})  score {} [{}]",
        translation.id,
        translation.ad_copy_id,
        translation.country_code,
        translation.language,
        translation.quality_score,
        translation.quality_band()
    );
    println!("  Headline: {}", translation.headline);
    println!("  Body:     {}", truncate_chars(&translation.body, 100));
}

fn print_summary(summary: &BulkSummary) {
    println!(
        "Created {} translation(s), skipped {}, auto-approved {}",
        summary.created_count(),
        summary.skipped,
        summary.degraded
    );
    if let Some(average) = summary.average_score() {
        println!("Average quality score: {:.1}", average);
    }
}
