//! Configuration for network analysis.

use crate::logging::VERBOSITY_SILENT;

/// Per-network analysis settings.
///
/// Carried over into derived networks (critical path scratch copies and
/// sub-networks).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
    /// Maximum number of paths a single enumeration may produce (None = unlimited).
    pub path_limit: Option<usize>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            verbosity: VERBOSITY_SILENT,
            path_limit: None,
        }
    }
}

impl NetworkConfig {
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_path_limit(mut self, limit: usize) -> Self {
        self.path_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.verbosity, 0);
        assert_eq!(config.path_limit, None);
    }

    #[test]
    fn test_builders() {
        let config = NetworkConfig::default()
            .with_verbosity(2)
            .with_path_limit(16);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.path_limit, Some(16));
    }
}
