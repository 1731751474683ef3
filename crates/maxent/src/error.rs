use std::error::Error;
use std::fmt;

/// Reasons a training corpus cannot be turned into an objective.
#[derive(Debug)]
pub enum CorpusError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Empty,
    MissingLabel { doc: usize },
    LabelNotString { doc: usize },
    UnknownLabel { doc: usize, label: String },
    ClassSetMismatch { doc: usize },
    FeaturesNotArray { doc: usize, class: String },
    FeatureNotString { doc: usize, class: String },
}

impl CorpusError {
    /// True when the corpus could not be read at all, as opposed to being malformed.
    pub fn is_io(&self) -> bool {
        matches!(self, CorpusError::Io(_))
    }
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CorpusError::Io(e) => write!(f, "Failed to read corpus: {}", e),
            CorpusError::Parse(e) => write!(f, "Invalid corpus JSON: {}", e),
            CorpusError::Empty => write!(f, "Corpus contains no documents"),
            CorpusError::MissingLabel { doc } => {
                write!(f, "Document {} has no \"__label__\" key", doc)
            }
            CorpusError::LabelNotString { doc } => {
                write!(f, "Document {} has a non-string \"__label__\"", doc)
            }
            CorpusError::UnknownLabel { doc, label } => {
                write!(f, "Document {} is labeled with unknown class {:?}", doc, label)
            }
            CorpusError::ClassSetMismatch { doc } => write!(
                f,
                "Document {} does not have the same class keys as the first document",
                doc
            ),
            CorpusError::FeaturesNotArray { doc, class } => write!(
                f,
                "Document {} class {:?}: features must be an array of strings",
                doc, class
            ),
            CorpusError::FeatureNotString { doc, class } => write!(
                f,
                "Document {} class {:?}: feature names must be strings",
                doc, class
            ),
        }
    }
}

impl Error for CorpusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CorpusError::Io(e) => Some(e),
            CorpusError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CorpusError {
    fn from(e: std::io::Error) -> Self {
        CorpusError::Io(e)
    }
}

impl From<serde_json::Error> for CorpusError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            CorpusError::Io(e.into())
        } else {
            CorpusError::Parse(e)
        }
    }
}

/// Invalid optimizer settings, or a worker pool that could not be started.
#[derive(Debug)]
pub enum ConfigError {
    LearningRate(f64),
    Threshold(f64),
    ZeroThreads,
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::LearningRate(v) => {
                write!(f, "Learning rate must be finite and positive, got {}", v)
            }
            ConfigError::Threshold(v) => {
                write!(f, "Gradient threshold must be finite and positive, got {}", v)
            }
            ConfigError::ZeroThreads => write!(f, "Worker pool needs at least one thread"),
            ConfigError::ThreadPool(e) => write!(f, "Failed to build worker pool: {}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for ConfigError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        ConfigError::ThreadPool(e)
    }
}

/// A weight vector that does not line up with its feature names.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightsError {
    LengthMismatch { features: usize, weights: usize },
}

impl fmt::Display for WeightsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WeightsError::LengthMismatch { features, weights } => write!(
                f,
                "Cannot pair {} features with {} weights",
                features, weights
            ),
        }
    }
}

impl Error for WeightsError {}
