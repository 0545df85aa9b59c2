use thiserror::Error;

use crate::hresult::HResult;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("configuration error: ${variable} {reason}")]
    Configuration {
        variable: String,
        reason: &'static str,
    },

    #[error("failed to get absolute path for {path}: {reason}")]
    PathResolution { path: String, reason: String },

    #[error("failed to open the CoreCLR library {path}: {source}")]
    LibraryLoad {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("function {symbol} not found in CoreCLR library")]
    SymbolResolution { symbol: &'static str },

    #[error("coreclr_initialize failed - status: {status}")]
    RuntimeInitialization { status: HResult },

    #[error("could not create delegate for {method} - status: {status}")]
    DelegateBinding { method: &'static str, status: HResult },

    #[error("coreclr_execute_assembly failed - status: {status}")]
    ExecuteAssembly { status: HResult },

    #[error("coreclr_shutdown failed - status: {status}")]
    RuntimeShutdown { status: HResult },

    #[error("string cannot cross the native boundary: {0:?} contains a NUL")]
    InvalidString(String),

    #[error("a runtime session is already active in this process")]
    SessionAlreadyActive,

    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}
