//! Error types for the metrics registry.

/// Errors raised while registering or updating metric instruments.
///
/// Registration errors are configuration errors: they happen at startup
/// and are fatal. Update errors reject values that would break an
/// instrument's contract.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An instrument with this name is already registered.
    #[error("metric `{name}` is already registered")]
    Duplicate {
        /// The conflicting metric name.
        name: String,
    },

    /// A gauge was set to NaN or an infinity.
    #[error("gauge `{name}` cannot be set to non-finite value {value}")]
    NonFinite {
        /// The gauge name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// A counter increment was negative or non-finite.
    #[error("counter `{name}` cannot be incremented by {delta}")]
    InvalidIncrement {
        /// The counter name.
        name: String,
        /// The rejected delta.
        delta: f64,
    },

    /// The exposition library rejected an instrument or registration.
    #[error("prometheus error: {source}")]
    Prometheus {
        /// The underlying library error.
        #[from]
        source: prometheus::Error,
    },

    /// The rendered exposition was not valid UTF-8.
    #[error("exposition encoding error: {reason}")]
    Encoding {
        /// Description of the failure.
        reason: String,
    },

    /// The process-level collector could not be created.
    #[error("process collector error: {reason}")]
    Process {
        /// Description of the failure.
        reason: String,
    },
}
