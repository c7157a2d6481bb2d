use std::fmt;
use std::path::PathBuf;

/// Pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Metrics,
    Narrative,
    Charts,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Metrics => "metrics",
            Stage::Narrative => "narrative",
            Stage::Charts => "charts",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("load: cannot read table from {path}: {source}")]
    DataLoad {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{stage}: required column '{column}' is missing")]
    Schema { stage: Stage, column: String },
    #[error("narrative: {0}")]
    NarrativeService(String),
    #[error("{stage}: {message}")]
    Render { stage: Stage, message: String },
}

impl Error {
    pub fn render(stage: Stage, message: impl Into<String>) -> Self {
        Error::Render {
            stage,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Error::DataLoad { .. } => Stage::Load,
            Error::Schema { stage, .. } | Error::Render { stage, .. } => *stage,
            Error::NarrativeService(_) => Stage::Narrative,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
