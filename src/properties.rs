//! The initialization property bag handed to `coreclr_initialize`.

use std::ffi::CString;
use std::os::raw::c_int;

use crate::config::{HostConfig, APP_DOMAIN_COMPAT_SWITCH};
use crate::error::HostResult;
use crate::strings::{vec2cstring, CoreClrString};
use crate::tpa::TrustedAssemblyList;

pub const TRUSTED_PLATFORM_ASSEMBLIES: &str = "TRUSTED_PLATFORM_ASSEMBLIES";
pub const APP_PATHS: &str = "APP_PATHS";
pub const APP_NI_PATHS: &str = "APP_NI_PATHS";
pub const NATIVE_DLL_SEARCH_DIRECTORIES: &str = "NATIVE_DLL_SEARCH_DIRECTORIES";
pub const APP_DOMAIN_COMPAT_SWITCH_KEY: &str = "AppDomainCompatSwitch";

/// Ordered key/value pairs; a key appears at most once.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PropertyBag {
    entries: Vec<(&'static str, String)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard bag for a host layout.
    pub fn for_host(tpa: &TrustedAssemblyList, config: &HostConfig) -> Self {
        let app_path = config.app_root().to_string();

        let mut bag = Self::new();
        bag.set(TRUSTED_PLATFORM_ASSEMBLIES, tpa.to_property_value());
        bag.set(APP_PATHS, app_path.clone());
        bag.set(APP_NI_PATHS, app_path);
        bag.set(NATIVE_DLL_SEARCH_DIRECTORIES, config.native_search_directories());
        bag.set(APP_DOMAIN_COMPAT_SWITCH_KEY, APP_DOMAIN_COMPAT_SWITCH);
        bag
    }

    /// Sets `key`, replacing any earlier value in place.
    pub fn set<V: Into<String>>(&mut self, key: &'static str, value: V) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn to_native(&self) -> HostResult<NativeProperties> {
        let keys: Vec<&str> = self.entries.iter().map(|(k, _)| *k).collect();
        let values: Vec<&str> = self.entries.iter().map(|(_, v)| v.as_str()).collect();
        let (_keys, key_ptrs) = vec2cstring(&keys)?;
        let (_values, value_ptrs) = vec2cstring(&values)?;

        Ok(NativeProperties {
            _keys,
            _values,
            key_ptrs,
            value_ptrs,
        })
    }
}

/// Parallel key and value arrays in the layout `coreclr_initialize` expects.
pub(crate) struct NativeProperties {
    _keys: Vec<CString>,
    _values: Vec<CString>,
    key_ptrs: Vec<CoreClrString>,
    value_ptrs: Vec<CoreClrString>,
}

impl NativeProperties {
    pub(crate) fn count(&self) -> c_int {
        self.key_ptrs.len() as c_int
    }

    pub(crate) fn keys(&self) -> *const CoreClrString {
        self.key_ptrs.as_ptr()
    }

    pub(crate) fn values(&self) -> *const CoreClrString {
        self.value_ptrs.as_ptr()
    }
}
