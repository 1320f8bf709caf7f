//! InsightDeck — business document analysis server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use insightdeck_core::InsightConfig;
use insightdeck_llm::{create_generator, run_canary, GenerationConfig, TextGenerator};
use insightdeck_pipeline::Analyzer;
use insightdeck_server::routes;
use insightdeck_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn load_generator() -> Arc<dyn TextGenerator> {
    let config_path = std::env::var("INSIGHTDECK_GENERATION_CONFIG")
        .ok()
        .map(PathBuf::from);
    create_generator(GenerationConfig::load(config_path.as_deref()))
}

fn print_usage() {
    println!("InsightDeck — business document analysis server");
    println!();
    println!("Usage: insightdeck [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve           Start the server");
    println!("  analyze <file>           Analyze a text file and print the JSON result");
    println!("  help                     Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => {}
            "analyze" => {
                if args.len() < 3 {
                    eprintln!("Usage: insightdeck analyze <file>");
                    std::process::exit(1);
                }
                return analyze_file(Path::new(&args[2])).await;
            }
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'insightdeck help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let config = InsightConfig::from_env()?;
    let port = config.port;
    let generator = load_generator();

    info!(
        "Generation backend: {} (configured: {})",
        generator.name(),
        generator.is_configured()
    );
    info!("Processing mode: {}", config.analysis.mode());

    if generator.is_configured() {
        let canary_generator = generator.clone();
        tokio::spawn(async move {
            let report = run_canary(canary_generator.as_ref()).await;
            if report.success {
                info!("Generation canary passed");
            } else {
                warn!("Generation canary failed: {}", report.result);
            }
        });
    }

    let state = Arc::new(AppState::new(config.analysis, generator));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("InsightDeck server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn analyze_file(path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let config = InsightConfig::from_env()?;
    let analyzer = Analyzer::new(load_generator());

    let result = analyzer.analyze(&text, &config.analysis).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
