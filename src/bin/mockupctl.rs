use clap::{Parser, Subcommand};
use fabric_mockup_api::{catalog, Config, GeminiClient, MockupGenerator, PromptCatalog, PromptConstructor};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "mockupctl", about = "CLI for the fabric mockup API", version)]
struct Cli {
    /// Override PROMPTS_CSV
    #[arg(global = true, long, value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Override GEMINI_MODEL
    #[arg(global = true, long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List prompt ids and outfits from the CSV
    Prompts {
        /// Output raw JSON instead of lines
        #[arg(long)]
        json: bool,
    },
    /// Generate a mannequin mockup from a fabric swatch
    Mockup {
        /// Row id in the prompts CSV
        #[arg(long)]
        prompt_id: String,
        /// Fabric swatch image
        #[arg(long, value_name = "PATH")]
        fabric: PathBuf,
        /// Output path (defaults to ./mockup_<prompt_id>.png)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Put the fabric on a customer photo
    TryOn {
        /// Row id in the prompts CSV
        #[arg(long)]
        prompt_id: String,
        /// Fabric swatch image
        #[arg(long, value_name = "PATH")]
        fabric: PathBuf,
        /// Customer photo
        #[arg(long, value_name = "PATH")]
        customer: PathBuf,
        /// Output path (defaults to ./try_on_<prompt_id>.png)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env and parse CLI
    Config::dotenv_load();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Prompts { json } => {
            let path = cli.csv.unwrap_or_else(|| {
                PathBuf::from(std::env::var("PROMPTS_CSV").unwrap_or_else(|_| "prompts.csv".to_string()))
            });
            let outfits = catalog::list_outfits(&path).await.map_err(|e| {
                eprintln!("Error: {}", e);
                e
            })?;
            if json {
                println!("{}", serde_json::to_string(&outfits)?);
            } else {
                for o in outfits {
                    println!("{}\t{}", o.id, o.outfit.unwrap_or_default());
                }
            }
            Ok(())
        }
        Commands::Mockup { prompt_id, fabric, out } => {
            let (catalog, generator) = setup(cli.csv, cli.model)?;
            let Some(entry) = catalog.lookup(&prompt_id) else {
                eprintln!("Prompt ID '{}' not found in {}", prompt_id, source_name(&catalog));
                std::process::exit(1);
            };
            let fabric_bytes = tokio::fs::read(&fabric).await?;
            let png = generator.generate_mockup(&fabric_bytes, &entry.prompt).await;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("mockup_{}.png", prompt_id)));
            write_result(png, path).await
        }
        Commands::TryOn { prompt_id, fabric, customer, out } => {
            let (catalog, generator) = setup(cli.csv, cli.model)?;
            let Some(outfit_type) = catalog.outfit_type(&prompt_id) else {
                eprintln!("No try-on outfit for prompt ID '{}' in {}", prompt_id, source_name(&catalog));
                std::process::exit(1);
            };
            let prompt = PromptConstructor::try_on().construct_prompt(outfit_type);
            let fabric_bytes = tokio::fs::read(&fabric).await?;
            let customer_bytes = tokio::fs::read(&customer).await?;
            let png = generator.generate_try_on(&fabric_bytes, &customer_bytes, &prompt).await;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("try_on_{}.png", prompt_id)));
            write_result(png, path).await
        }
    }
}

fn setup(csv: Option<PathBuf>, model: Option<String>) -> Result<(PromptCatalog, MockupGenerator), Box<dyn std::error::Error>> {
    let mut conf = Config::new()?;
    if let Some(csv) = csv {
        conf.prompts_csv = csv;
    }
    if let Some(model) = model {
        conf.gemini_model = model;
    }
    let catalog = PromptCatalog::load(&conf.prompts_csv)?;
    let client = GeminiClient::from_config(&conf)?;
    Ok((catalog, MockupGenerator::new(Arc::new(client))))
}

fn source_name(catalog: &PromptCatalog) -> String {
    catalog.source().map(|p| p.display().to_string()).unwrap_or_else(|| "<catalog>".to_string())
}

async fn write_result(
    png: fabric_mockup_api::AppResult<Vec<u8>>,
    path: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    match png {
        Ok(bytes) => {
            tokio::fs::write(&path, &bytes).await?;
            println!("Saved {} ({} bytes)", path.display(), bytes.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
