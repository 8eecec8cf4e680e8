//! Error types for threshold tuning

/// Tuning operation result type
pub type GcResult<T> = Result<T, GcError>;

/// Errors that can occur while configuring or running the generation model
#[derive(Debug, thiserror::Error)]
pub enum GcError {
    /// Invalid configuration
    #[error("Invalid GC configuration: {0}")]
    InvalidConfig(String),

    /// Threshold adaptation requested for an empty collection
    #[error("Degenerate trash ratio: generation {generation} collected zero objects")]
    DegenerateRatio {
        /// Index of the generation being adapted
        generation: usize,
    },

    /// Generation index outside the set
    #[error("Generation {index} out of range (set has {len} generations)")]
    GenerationOutOfRange {
        /// Requested index
        index: usize,
        /// Number of generations in the set
        len: usize,
    },

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl GcError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a degenerate ratio error
    pub fn degenerate_ratio(generation: usize) -> Self {
        Self::DegenerateRatio { generation }
    }

    /// Create an out-of-range error
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::GenerationOutOfRange { index, len }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<toml::de::Error> for GcError {
    fn from(err: toml::de::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<serde_json::Error> for GcError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GcError::invalid_config("target out of range");
        assert!(err.to_string().contains("target out of range"));
    }

    #[test]
    fn test_degenerate_ratio() {
        let err = GcError::degenerate_ratio(2);
        assert!(matches!(err, GcError::DegenerateRatio { generation: 2 }));
        assert!(err.to_string().contains("generation 2"));
    }

    #[test]
    fn test_out_of_range() {
        let err = GcError::out_of_range(5, 3);
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('3'));
    }
}
