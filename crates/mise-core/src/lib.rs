//! mise-core - Recipe recommendation by preparation time and complexity
//!
//! Given a cleaned, feature-selected recipe table this crate:
//!
//! - **Normalizes** numeric feature columns onto a common scale
//!   (`FeatureNormalizer`, `FittedTransform`)
//! - **Indexes** the normalized rows for nearest-neighbor search
//!   (`NeighborIndex`)
//! - **Recommends** the k recipes closest to a desired time and complexity
//!   (`RecipeRecommender`)
//!
//! Supporting modules load tables through `mise-io` readers, engineer the
//! complexity score, encode ingredient lists and hold configuration.
//!
//! # Design
//!
//! The fitted transform is owned by each recommender and applied unchanged
//! to queries, so the index and the query always share one scale. Queries
//! take `&self` and never mutate the index.

pub mod complexity;
pub mod config;
pub mod error;
pub mod index;
pub mod ingredients;
pub mod loader;
pub mod matrix;
pub mod normalize;
pub mod recipe;
pub mod recommender;
pub mod schema;

pub use complexity::ComplexityConfig;
pub use config::{ConfigError, DataConfig, RecommenderConfig};
pub use error::{MiseError, MiseResult};
pub use index::{DistanceMetric, Neighbor, NeighborIndex};
pub use ingredients::{parse_ingredient_list, IngredientEncoder};
pub use loader::TableLoader;
pub use matrix::FeatureMatrix;
pub use normalize::{ColumnScale, FeatureNormalizer, FittedTransform, ScaleMethod};
pub use recipe::{RecipeId, RecipeRecord, RecipeTable};
pub use recommender::{QueryPoint, Recommendation, RecipeRecommender};
pub use schema::{Bounds, FeatureColumn, FeatureSchema, COMPLEXITY_SCORE, MINUTES};
