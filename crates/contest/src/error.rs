use std::io;
use std::path::PathBuf;

use chess_rules::ChessError;
use search_engine::SearchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContestError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid contest configuration")]
    Config(#[from] toml::de::Error),

    #[error("failed to encode the result record")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rules(#[from] ChessError),

    #[error(transparent)]
    Search(#[from] SearchError),
}
