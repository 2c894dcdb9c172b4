use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Erreurs du Resource Store (lecture, écriture, clés).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed json in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected shape for key {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("atomic rename to {} failed: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid store key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("date is required")]
    MissingDate,
    #[error("insufficient data to generate a timetable")]
    InsufficientData,
    #[error("timetable data or date missing")]
    MissingTimetable,
    #[error("timetable not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TimetableError {
    /// Statut HTTP équivalent, pour une couche de transport éventuelle.
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingDate | Self::InsufficientData | Self::MissingTimetable => 400,
            Self::NotFound(_) => 404,
            Self::Store(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

/// Corps d'erreur `{ "error": message }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&TimetableError> for ErrorBody {
    fn from(err: &TimetableError) -> Self {
        let error = if err.is_client_error() {
            err.to_string()
        } else {
            "server error".to_string()
        };
        Self { error }
    }
}
