pub mod analyzer;
pub mod db;
pub mod difficulty;
pub mod remote;

pub use analyzer::{HighlightMode, TextAnalysis, TextAnalyzer, VocabularySets};
pub use db::{DbError, WordDatabase};
pub use difficulty::{DifficultyIndex, DifficultyTier};
pub use remote::{HttpWordApi, RemoteError, RemoteWordSource};
