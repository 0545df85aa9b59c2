//! Where the runtime and the application live, and the fixed names of the
//! managed bootstrap contract.

use crate::error::HostResult;
use crate::path::{resolve_from_environment, AbsolutePath};
use crate::tpa::PATH_LIST_SEPARATOR;

/// Directory holding the runtime library and its platform assemblies.
pub const RUNTIME_ROOT_VAR: &str = "CORE_ROOT";
/// Directory holding the application's managed assemblies.
pub const APP_ROOT_VAR: &str = "PWRSH_ROOT";

#[cfg(target_os = "macos")]
pub const CORECLR_LIBRARY: &str = "libcoreclr.dylib";
#[cfg(not(target_os = "macos"))]
pub const CORECLR_LIBRARY: &str = "libcoreclr.so";

pub const BOOTSTRAP_ASSEMBLY_FILE: &str = "Microsoft.PowerShell.CoreCLR.AssemblyLoadContext.dll";
pub const BOOTSTRAP_ASSEMBLY_NAME: &str = "Microsoft.PowerShell.CoreCLR.AssemblyLoadContext, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null";
pub const BOOTSTRAP_TYPE_NAME: &str =
    "System.Management.Automation.PowerShellAssemblyLoadContextInitializer";
pub const BOOTSTRAP_METHOD_NAME: &str = "SetPowerShellAssemblyLoadContext";

pub const APP_DOMAIN_COMPAT_SWITCH: &str = "UseLatestBehaviorWhenTFMNotSpecified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    runtime_root: AbsolutePath,
    app_root: AbsolutePath,
}

impl HostConfig {
    pub fn new(runtime_root: AbsolutePath, app_root: AbsolutePath) -> Self {
        Self {
            runtime_root,
            app_root,
        }
    }

    /// Reads `CORE_ROOT` and `PWRSH_ROOT`.
    pub fn from_env() -> HostResult<Self> {
        Self::from_env_vars(RUNTIME_ROOT_VAR, APP_ROOT_VAR)
    }

    /// Both variables are resolved up front, so a bad application root is
    /// reported before the runtime library is ever opened.
    pub fn from_env_vars(runtime_var: &str, app_var: &str) -> HostResult<Self> {
        let runtime_root = resolve_from_environment(runtime_var)?;
        let app_root = resolve_from_environment(app_var)?;
        Ok(Self::new(runtime_root, app_root))
    }

    pub fn runtime_root(&self) -> &AbsolutePath {
        &self.runtime_root
    }

    pub fn app_root(&self) -> &AbsolutePath {
        &self.app_root
    }

    pub fn runtime_library_path(&self) -> AbsolutePath {
        self.runtime_root.join(CORECLR_LIBRARY)
    }

    pub fn bootstrap_assembly_path(&self) -> AbsolutePath {
        self.app_root.join(BOOTSTRAP_ASSEMBLY_FILE)
    }

    /// Application directory first, then the runtime directory.
    pub fn native_search_directories(&self) -> String {
        format!(
            "{}{}{}",
            self.app_root, PATH_LIST_SEPARATOR, self.runtime_root
        )
    }
}
