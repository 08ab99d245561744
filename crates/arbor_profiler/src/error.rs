use arbor_core::SettingsError;
use thiserror::Error;

/// Errors from configuring the process-wide profiler.
#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("the process-wide profiler is already initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
