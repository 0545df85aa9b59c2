//! Opening the runtime shared library and binding its exports.

use std::ffi::c_void;
use std::os::raw::{c_int, c_uint};

use libloading as lib;
use tracing::{debug, warn};

use crate::error::{HostError, HostResult};
use crate::path::AbsolutePath;
use crate::strings::CoreClrString;

pub enum CoreClrHostHandle {}
pub type CoreClrDomainId = c_uint;

pub const CORECLR_INITIALIZE: &str = "coreclr_initialize";
pub const CORECLR_SHUTDOWN: &str = "coreclr_shutdown";
pub const CORECLR_EXECUTE_ASSEMBLY: &str = "coreclr_execute_assembly";
pub const CORECLR_CREATE_DELEGATE: &str = "coreclr_create_delegate";

pub type CoreClrInitializeFn = unsafe extern "C" fn(
    exe_path: CoreClrString,
    app_domain_friendly_name: CoreClrString,
    property_count: c_int,
    property_keys: *const CoreClrString,
    property_values: *const CoreClrString,
    host_handle: *mut *mut CoreClrHostHandle,
    domain_id: *mut CoreClrDomainId,
) -> c_int;

pub type CoreClrShutdownFn =
    unsafe extern "C" fn(host_handle: *mut CoreClrHostHandle, domain_id: CoreClrDomainId) -> c_int;

pub type CoreClrExecuteAssemblyFn = unsafe extern "C" fn(
    host_handle: *mut CoreClrHostHandle,
    domain_id: CoreClrDomainId,
    argc: c_int,
    argv: *const CoreClrString,
    managed_assembly_path: CoreClrString,
    exit_code: *mut c_uint,
) -> c_int;

pub type CoreClrCreateDelegateFn = unsafe extern "C" fn(
    host_handle: *mut CoreClrHostHandle,
    domain_id: CoreClrDomainId,
    entry_point_assembly_name: CoreClrString,
    entry_point_type_name: CoreClrString,
    entry_point_method_name: CoreClrString,
    delegate: *mut *mut c_void,
) -> c_int;

/// Anything exported symbols can be looked up in.
pub trait SymbolSource {
    /// Address of `name`, or `None` if it is not exported.
    fn symbol_address(&self, name: &str) -> Option<*mut c_void>;
}

pub struct LoadedLibrary {
    path: String,
    inner: lib::Library,
}

impl LoadedLibrary {
    /// Opens the library with immediate, process-local symbol binding.
    pub fn load(path: &AbsolutePath) -> HostResult<LoadedLibrary> {
        let inner = open(path).map_err(|source| HostError::LibraryLoad {
            path: path.to_string(),
            source,
        })?;
        debug!(path = %path, "opened runtime library");

        Ok(LoadedLibrary {
            path: path.to_string(),
            inner,
        })
    }

    /// The image of the running process itself.
    #[cfg(all(test, unix))]
    pub(crate) fn this() -> LoadedLibrary {
        LoadedLibrary {
            path: "<self>".to_string(),
            inner: lib::os::unix::Library::this().into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Releases the handle. Must not be called while any entry point
    /// resolved from it may still run.
    pub fn unload(self) {
        #[cfg(test)]
        events::record("unload");

        let path = self.path;
        match self.inner.close() {
            Ok(()) => debug!(path = %path, "closed runtime library"),
            Err(e) => warn!(path = %path, error = %e, "failed to close runtime library"),
        }
    }
}

impl SymbolSource for LoadedLibrary {
    fn symbol_address(&self, name: &str) -> Option<*mut c_void> {
        let symbol = unsafe { self.inner.get::<*mut c_void>(name.as_bytes()) }.ok()?;
        let address = *symbol;
        if address.is_null() {
            None
        } else {
            Some(address)
        }
    }
}

fn open(path: &AbsolutePath) -> Result<lib::Library, lib::Error> {
    use lib::os::unix::{Library, RTLD_LOCAL, RTLD_NOW};

    let library = unsafe { Library::open(Some(path.as_path()), RTLD_NOW | RTLD_LOCAL)? };
    Ok(library.into())
}



/// The runtime's four exports. Only obtainable through a resolution in which
/// every symbol was found.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeEntryPoints {
    pub(crate) coreclr_initialize: CoreClrInitializeFn,
    pub(crate) coreclr_shutdown: CoreClrShutdownFn,
    pub(crate) coreclr_execute_assembly: CoreClrExecuteAssemblyFn,
    pub(crate) coreclr_create_delegate: CoreClrCreateDelegateFn,
}

pub fn resolve_entry_points<S: SymbolSource + ?Sized>(source: &S) -> HostResult<RuntimeEntryPoints> {
    let initialize = lookup(source, CORECLR_INITIALIZE)?;
    let shutdown = lookup(source, CORECLR_SHUTDOWN)?;
    let execute_assembly = lookup(source, CORECLR_EXECUTE_ASSEMBLY)?;
    let create_delegate = lookup(source, CORECLR_CREATE_DELEGATE)?;
    debug!("resolved runtime entry points");

    // The addresses are exported functions with the documented signatures.
    unsafe {
        Ok(RuntimeEntryPoints {
            coreclr_initialize: std::mem::transmute::<*mut c_void, CoreClrInitializeFn>(initialize),
            coreclr_shutdown: std::mem::transmute::<*mut c_void, CoreClrShutdownFn>(shutdown),
            coreclr_execute_assembly: std::mem::transmute::<*mut c_void, CoreClrExecuteAssemblyFn>(
                execute_assembly,
            ),
            coreclr_create_delegate: std::mem::transmute::<*mut c_void, CoreClrCreateDelegateFn>(
                create_delegate,
            ),
        })
    }
}

fn lookup<S: SymbolSource + ?Sized>(source: &S, symbol: &'static str) -> HostResult<*mut c_void> {
    source
        .symbol_address(symbol)
        .ok_or(HostError::SymbolResolution { symbol })
}
