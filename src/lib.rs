//! Native bootstrap host for CoreCLR.
//!
//! Loads `libcoreclr` from `$CORE_ROOT`, initializes it with a trusted platform
//! assembly list, and hands control to the managed assembly load context
//! initializer found under `$PWRSH_ROOT`. Every runtime export is resolved by
//! name at run time.

#[cfg(not(unix))]
compile_error!("coreclr-host loads the runtime with dlopen and supports Unix targets only");

pub mod clr;
pub mod config;
pub mod delegate;
mod error;
pub mod hresult;
pub mod library;
pub mod logging;
pub mod path;
pub mod properties;
mod strings;
pub mod tpa;

pub use crate::clr::{RuntimeHandle, RuntimeSession, SessionState};
pub use crate::config::HostConfig;
pub use crate::error::{HostError, HostResult};
pub use crate::strings::{to_wide, CoreClrString};

/// Starts the runtime described by `CORE_ROOT`/`PWRSH_ROOT` and runs the
/// managed bootstrap initializer.
pub fn start_session(app_domain_name: &str) -> HostResult<RuntimeSession> {
    let config = HostConfig::from_env()?;
    start_session_with(&config, app_domain_name)
}

/// Like [`start_session`] with an explicit layout. If the bootstrap fails the
/// runtime is shut down and unloaded before the error is returned.
pub fn start_session_with(config: &HostConfig, app_domain_name: &str) -> HostResult<RuntimeSession> {
    let mut session = RuntimeSession::start(config, app_domain_name)?;
    session.run_bootstrap()?;
    Ok(session)
}

/// Shuts the runtime down and unloads it.
pub fn stop_session(session: RuntimeSession) -> HostResult<()> {
    session.stop()
}
