//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mise_core::{DistanceMetric, ScaleMethod};

#[derive(Debug, Parser)]
#[command(name = "mise", version, about = "Recipe recommendations by time and complexity")]
pub struct Cli {
    /// Config file (defaults to <config dir>/mise/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recommend recipes closest to a desired time and complexity
    Recommend(RecommendArgs),
    /// Print summary statistics of the feature columns
    Summary(DataArgs),
    /// Encode ingredient lists and show the most used ingredients
    Ingredients(IngredientArgs),
}

#[derive(Debug, Args)]
pub struct DataArgs {
    /// Recipe table (CSV or TSV)
    #[arg(long, short)]
    pub data: PathBuf,

    /// Drop rows with missing or out-of-range features instead of failing
    #[arg(long)]
    pub drop_invalid: bool,
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Desired preparation time in minutes
    #[arg(long, short = 't')]
    pub time: f64,

    /// Desired complexity score
    #[arg(long, short = 'c')]
    pub complexity: f64,

    /// Number of recommendations (overrides config)
    #[arg(short)]
    pub k: Option<usize>,

    /// Feature scaling (overrides config)
    #[arg(long, value_enum)]
    pub scale: Option<ScaleArg>,

    /// Distance metric (overrides config)
    #[arg(long, value_enum)]
    pub metric: Option<MetricArg>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct IngredientArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Ingredient list column (overrides config)
    #[arg(long)]
    pub column: Option<String>,

    /// How many of the most used ingredients to show
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ScaleArg {
    MinMax,
    ZScore,
}

impl From<ScaleArg> for ScaleMethod {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::MinMax => ScaleMethod::MinMax,
            ScaleArg::ZScore => ScaleMethod::ZScore,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MetricArg {
    Euclidean,
    Manhattan,
}

impl From<MetricArg> for DistanceMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Euclidean => DistanceMetric::Euclidean,
            MetricArg::Manhattan => DistanceMetric::Manhattan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_recommend() {
        let cli = Cli::parse_from([
            "mise", "recommend", "--data", "recipes.csv", "-t", "30", "-c", "50", "-k", "3",
            "--scale", "z-score", "--drop-invalid",
        ]);
        match cli.command {
            Command::Recommend(args) => {
                assert_eq!(args.time, 30.0);
                assert_eq!(args.complexity, 50.0);
                assert_eq!(args.k, Some(3));
                assert!(matches!(args.scale, Some(ScaleArg::ZScore)));
                assert!(!args.json);
                assert!(args.data.drop_invalid);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
