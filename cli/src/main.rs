use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pantry_core::{
    synthesize, GenerationMode, GenerationOptions, GenerationRequest, GeneratorConfig,
    ImprovementPreferences, ImprovementRequest, RecipeGenerator,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(about = "Turn the ingredients you have into recipes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one or more recipes from a comma-separated ingredient list
    Generate {
        /// Ingredients, e.g. "chicken, rice, garlic"
        ingredients: String,
        /// Generate several recipes instead of one
        #[arg(long)]
        multiple: bool,
        /// Number of recipes in --multiple mode (1-5, default 3)
        #[arg(long)]
        count: Option<u32>,
        #[arg(long)]
        dietary: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        cuisine: Option<String>,
        /// Difficulty from 1 (easy) to 5 (expert)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        difficulty: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Refine an existing recipe according to an instruction
    Improve {
        /// Recipe text
        #[arg(long, conflicts_with = "recipe_file")]
        recipe: Option<String>,
        /// File containing the recipe text
        #[arg(long)]
        recipe_file: Option<PathBuf>,
        /// What to change, e.g. "make it spicier"
        #[arg(long, default_value = "")]
        request: String,
        #[arg(long)]
        dietary: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
    },
    /// Print the model-free fallback recipes for an ingredient list
    Fallback {
        ingredients: String,
        #[arg(long)]
        multiple: bool,
        #[arg(long)]
        count: Option<u32>,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn mode(multiple: bool) -> GenerationMode {
    if multiple {
        GenerationMode::Multiple
    } else {
        GenerationMode::Single
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            ingredients,
            multiple,
            count,
            dietary,
            allergies,
            cuisine,
            difficulty,
            notes,
        } => {
            let config = GeneratorConfig::from_env()?;
            let generator = RecipeGenerator::from_config(&config);

            let request = GenerationRequest {
                ingredients,
                mode: mode(multiple),
                count,
                options: GenerationOptions {
                    dietary_preferences: dietary,
                    allergies,
                    cuisine_type: cuisine,
                    difficulty_level: difficulty,
                    additional_notes: notes,
                },
            };

            print_json(&generator.generate(&request).await)?;
        }
        Commands::Improve {
            recipe,
            recipe_file,
            request,
            dietary,
            allergies,
        } => {
            let recipe_text = match (recipe, recipe_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => bail!("Provide the recipe with --recipe or --recipe-file"),
            };

            let preferences = (dietary.is_some() || allergies.is_some()).then(|| {
                ImprovementPreferences {
                    dietary_preferences: dietary,
                    allergies,
                }
            });

            let config = GeneratorConfig::from_env()?;
            let generator = RecipeGenerator::from_config(&config);
            let result = generator
                .improve(&ImprovementRequest {
                    recipe_text,
                    improvement_request: request,
                    preferences,
                })
                .await?;

            print_json(&result)?;
        }
        Commands::Fallback {
            ingredients,
            multiple,
            count,
        } => {
            let count = count.unwrap_or(0);
            print_json(&synthesize(&ingredients, mode(multiple), count))?;
        }
    }

    Ok(())
}
