//! Error types for the engine binary.

/// Errors that can occur while bootstrapping the service.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded or parsed.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: drivesim_core::config::ConfigError,
    },

    /// The gateway server failed to start.
    #[error("gateway startup error: {source}")]
    Gateway {
        /// The underlying startup error.
        #[from]
        source: drivesim_api::startup::StartupError,
    },
}
