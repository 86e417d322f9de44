//! mise - recipe recommendations from the command line
//!
//! ```text
//! mise recommend --data recipes.csv --time 30 --complexity 50 -k 5
//! mise summary --data recipes.csv
//! mise ingredients --data raw_recipes.csv --top 20
//! ```

mod cli;
mod output;

use clap::Parser;
use mise_core::{IngredientEncoder, RecipeRecommender, RecommenderConfig, TableLoader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, IngredientArgs, RecommendArgs};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mise=info,mise_core=info,mise_io=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Command::Recommend(args) => recommend(config, &args),
        Command::Summary(args) => {
            config.data.drop_invalid |= args.drop_invalid;
            let table = TableLoader::new(&config).load_path(&args.data)?;
            print!("{}", output::summary_table(&table.describe()));
            Ok(())
        }
        Command::Ingredients(args) => ingredients(config, &args),
    }
}

/// Explicit `--config`, else the per-user file when present, else defaults
fn load_config(cli: &Cli) -> Result<RecommenderConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "loading config");
        return Ok(RecommenderConfig::load(path)?);
    }

    match RecommenderConfig::default_path() {
        Some(path) if path.is_file() => {
            info!(path = %path.display(), "loading config");
            Ok(RecommenderConfig::load(path)?)
        }
        _ => {
            debug!("no config file, using defaults");
            Ok(RecommenderConfig::default())
        }
    }
}

fn recommend(
    mut config: RecommenderConfig,
    args: &RecommendArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    config.data.drop_invalid |= args.data.drop_invalid;
    if let Some(k) = args.k {
        config.k = k;
    }
    if let Some(scale) = args.scale {
        config.scale = scale.into();
    }
    if let Some(metric) = args.metric {
        config.metric = metric.into();
    }
    config.validate()?;

    let table = TableLoader::new(&config).load_path(&args.data.data)?;
    let recommender = RecipeRecommender::with_config(table, &config)?;
    let results = recommender.recommend_recipes(args.time, args.complexity)?;

    if args.json {
        println!("{}", output::recommendation_json(&results)?);
    } else {
        print!(
            "{}",
            output::recommendation_table(args.time, args.complexity, &results)
        );
    }
    Ok(())
}

fn ingredients(
    mut config: RecommenderConfig,
    args: &IngredientArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    config.data.drop_invalid |= args.data.drop_invalid;
    if let Some(column) = &args.column {
        config.data.ingredients_column = column.clone();
    }
    let reader = mise_io::open_file(&args.data.data)?;
    let (table, lists) = TableLoader::new(&config).load_with_ingredients(reader.as_ref())?;

    let encoder = IngredientEncoder::fit(&lists);
    let encoded = encoder.encode_table(&table, &lists)?;
    info!(
        recipes = encoded.nrows(),
        vocabulary = encoded.ncols(),
        "encoded ingredient lists"
    );

    print!(
        "{}",
        output::ingredient_table(encoder.len(), &encoder.most_common(args.top))
    );
    Ok(())
}
