use anyhow::Context;
use clap::Parser;
use plant_doctor::app::PlantDoctor;
use plant_doctor::cli::{Cli, Commands};
use plant_doctor::config::Config;
use plant_doctor::confirm::{Confirm, TerminalConfirm};
use plant_doctor::gateway::GeminiClient;
use plant_doctor::image_input::load_image;
use plant_doctor::storage::FileStore;
use plant_doctor::interactive;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

type App = PlantDoctor<GeminiClient, GeminiClient, FileStore>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().context("failed to load config")?;

    match cli.command {
        Commands::Config { set_api_key, set_model, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ API key saved");
            }
            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("✔ Model set to {}", config.model);
            }
            if show {
                println!("Settings ({}):", Config::config_path()?.display());
                println!("  Model: {}", config.model);
                println!("  Timeout: {}s", config.timeout_seconds);
                println!("  History: {}", config.history_dir()?.display());
                println!(
                    "  API key: {}",
                    if config.get_api_key().is_ok() { "set" } else { "not set" }
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Scan { image, language } => {
            config.get_api_key()?;
            let image = load_image(&image)?;
            let mut app = open_app(&config)?;
            app.start_plant_scan()?;
            app.analyze_plant(image).await?;
            let failed = app.session().plant().error.is_some();
            finish(&mut app, language.as_deref(), failed).await
        }

        Commands::Soil { image, language } => {
            config.get_api_key()?;
            let image = load_image(&image)?;
            let mut app = open_app(&config)?;
            app.start_soil_scan()?;
            app.analyze_soil(image).await?;
            let failed = app.session().soil().error.is_some();
            finish(&mut app, language.as_deref(), failed).await
        }

        Commands::Tips { language } => {
            config.get_api_key()?;
            let mut app = open_app(&config)?;
            app.open_care_tips().await;
            let failed = app.session().tips().error.is_some();
            finish(&mut app, language.as_deref(), failed).await
        }

        Commands::History { show, clear, yes, language } => {
            let mut app = open_app(&config)?;
            app.open_history();

            if clear {
                let confirm: &dyn Confirm = if yes { &true } else { &TerminalConfirm };
                if app.clear_history(confirm)? {
                    println!("✔ History cleared");
                } else {
                    println!("History kept");
                }
                return Ok(ExitCode::SUCCESS);
            }

            if let Some(id) = show {
                app.select_history_item(&id)?;
                return finish(&mut app, language.as_deref(), false).await;
            }

            println!("{}", app.frame());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Interactive => {
            if config.get_api_key().is_err() {
                eprintln!("⚠ Gemini API key is not set; analyses will fail until it is configured");
            }
            let mut app = open_app(&config)?;
            interactive::run(&mut app).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_app(config: &Config) -> anyhow::Result<App> {
    let client = GeminiClient::from_config(config)?;
    let dir = config.history_dir()?;
    Ok(PlantDoctor::new(client.clone(), client, FileStore::new(dir)))
}

/// 必要なら翻訳して画面を出力
async fn finish(app: &mut App, language: Option<&str>, failed: bool) -> anyhow::Result<ExitCode> {
    if let (Some(language), false) = (language, failed) {
        app.change_language(language)
            .await
            .with_context(|| format!("cannot translate into {language}"))?;
    }
    println!("{}", app.frame());
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
