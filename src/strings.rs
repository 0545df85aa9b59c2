//! String marshalling across the native boundary.
//!
//! The runtime's exported entry points take NUL-terminated narrow strings,
//! while the managed bootstrap method takes a NUL-terminated UTF-16 string.

use std::ffi::CString;
use std::os::raw::c_char;

use widestring::U16CString;

use crate::error::{HostError, HostResult};

pub type CoreClrString = *const c_char;

pub(crate) fn to_c_string(value: &str) -> HostResult<CString> {
    CString::new(value).map_err(|_| HostError::InvalidString(value.to_string()))
}

/// Owned C strings plus a parallel array of pointers into them. The pointers
/// stay valid for as long as the returned `Vec<CString>` is alive.
pub(crate) fn vec2cstring<S: AsRef<str>>(
    strings: &[S],
) -> HostResult<(Vec<CString>, Vec<CoreClrString>)> {
    let cstrings = strings
        .iter()
        .map(|s| to_c_string(s.as_ref()))
        .collect::<HostResult<Vec<CString>>>()?;
    let pointers = cstrings.iter().map(|s| s.as_ptr()).collect();

    Ok((cstrings, pointers))
}

/// Converts UTF-8 text into NUL-terminated UTF-16 code units.
///
/// Every `&str` is valid UTF-8, so the only failure is an interior NUL, which
/// would silently truncate the value on the managed side.
pub fn to_wide(value: &str) -> HostResult<U16CString> {
    U16CString::from_str(value).map_err(|_| HostError::InvalidString(value.to_string()))
}
