use std::ffi::c_void;
use std::marker::PhantomData;

use tracing::debug;

use crate::error::HostResult;
use crate::strings::to_wide;

/// Native signature of the managed bootstrap initializer.
pub type BootstrapFn = unsafe extern "C" fn(app_path: *const u16);

/// A delegate into managed code. It borrows the session that created it, so
/// it cannot outlive the runtime.
pub struct BootstrapDelegate<'session> {
    function: BootstrapFn,
    _session: PhantomData<&'session ()>,
}

impl<'session> BootstrapDelegate<'session> {
    /// # Safety
    /// `raw` must be a delegate pointer produced by `coreclr_create_delegate`
    /// for a method with the `BootstrapFn` signature.
    pub(crate) unsafe fn from_raw(raw: *mut c_void) -> Option<BootstrapDelegate<'session>> {
        if raw.is_null() {
            return None;
        }

        Some(BootstrapDelegate {
            function: std::mem::transmute::<*mut c_void, BootstrapFn>(raw),
            _session: PhantomData,
        })
    }

    /// Hands `application_path` to managed code as UTF-16. Returns once the
    /// managed method does; managed failures are the runtime's to report.
    pub fn invoke(&self, application_path: &str) -> HostResult<()> {
        let wide = to_wide(application_path)?;
        debug!(path = application_path, "invoking bootstrap delegate");
        unsafe { (self.function)(wide.as_ptr()) };
        Ok(())
    }
}
