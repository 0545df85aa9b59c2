//! One runtime instance: initialize, bind the bootstrap delegate, shut down.
//!
//! The runtime keeps process-wide state, so at most one `RuntimeSession` may
//! exist at a time. A session always runs `coreclr_shutdown` (if initialize
//! succeeded) and then releases the library, either through `stop` or on drop.

use std::ffi::c_void;
use std::fmt;
use std::os::raw::{c_int, c_uint};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::config::{
    HostConfig, BOOTSTRAP_ASSEMBLY_NAME, BOOTSTRAP_METHOD_NAME, BOOTSTRAP_TYPE_NAME,
};
use crate::delegate::BootstrapDelegate;
use crate::error::{HostError, HostResult};
use crate::hresult::HResult;
use crate::library::{
    resolve_entry_points, CoreClrDomainId, CoreClrHostHandle, LoadedLibrary, RuntimeEntryPoints,
};
use crate::path::{resolve_absolute, AbsolutePath};
use crate::properties::PropertyBag;
use crate::strings::{to_c_string, vec2cstring};
use crate::tpa::{TrustedAssemblyList, TPA_EXTENSIONS};

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Held by the one live session; released when the session is dropped.
pub(crate) struct SessionGuard(());

impl SessionGuard {
    pub(crate) fn acquire() -> HostResult<SessionGuard> {
        SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| SessionGuard(()))
            .map_err(|_| HostError::SessionAlreadyActive)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        SESSION_ACTIVE.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unstarted,
    Initialized,
    BootstrapBound,
    ShutDown,
    Failed,
}

impl SessionState {
    fn name(self) -> &'static str {
        match self {
            SessionState::Unstarted => "unstarted",
            SessionState::Initialized => "initialized",
            SessionState::BootstrapBound => "bootstrap-bound",
            SessionState::ShutDown => "shut down",
            SessionState::Failed => "failed",
        }
    }
}

/// The host handle and domain id returned by a successful initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeHandle {
    host_handle: *mut CoreClrHostHandle,
    domain_id: CoreClrDomainId,
}

impl RuntimeHandle {
    pub fn domain_id(&self) -> CoreClrDomainId {
        self.domain_id
    }
}

pub struct RuntimeSession {
    state: SessionState,
    entry_points: RuntimeEntryPoints,
    runtime: Option<RuntimeHandle>,
    library: Option<LoadedLibrary>,
    app_root: AbsolutePath,
    _guard: SessionGuard,
}

impl RuntimeSession {
    /// Loads the runtime from the configured root and initializes it.
    pub fn start(config: &HostConfig, app_domain_name: &str) -> HostResult<RuntimeSession> {
        let guard = SessionGuard::acquire()?;
        let library = LoadedLibrary::load(&config.runtime_library_path())?;
        let entry_points = match resolve_entry_points(&library) {
            Ok(entry_points) => entry_points,
            Err(e) => {
                library.unload();
                return Err(e);
            }
        };

        Self::start_with(guard, library, entry_points, config, app_domain_name)
    }

    pub(crate) fn start_with(
        guard: SessionGuard,
        library: LoadedLibrary,
        entry_points: RuntimeEntryPoints,
        config: &HostConfig,
        app_domain_name: &str,
    ) -> HostResult<RuntimeSession> {
        let mut session = RuntimeSession {
            state: SessionState::Unstarted,
            entry_points,
            runtime: None,
            library: Some(library),
            app_root: config.app_root().clone(),
            _guard: guard,
        };

        // On failure the session is dropped here, which releases the library.
        if let Err(e) = session.initialize(config, app_domain_name) {
            session.state = SessionState::Failed;
            return Err(e);
        }

        Ok(session)
    }

    fn initialize(&mut self, config: &HostConfig, app_domain_name: &str) -> HostResult<()> {
        let mut tpa = TrustedAssemblyList::new();
        tpa.add_directory(config.runtime_root(), TPA_EXTENSIONS);
        tpa.append_path(&config.bootstrap_assembly_path());
        debug!(assemblies = tpa.len(), "built trusted platform assembly list");

        let properties = PropertyBag::for_host(&tpa, config);
        let native_properties = properties.to_native()?;

        let exe_path = current_executable()?;
        let clr_exe_path = to_c_string(exe_path.as_str())?;
        let clr_app_domain_friendly_name = to_c_string(app_domain_name)?;

        let mut host_handle: *mut CoreClrHostHandle = std::ptr::null_mut();
        let mut domain_id: CoreClrDomainId = 0;

        let coreclr_initialize = self.entry_points.coreclr_initialize;
        let hr = HResult::from(unsafe {
            coreclr_initialize(
                clr_exe_path.as_ptr(),
                clr_app_domain_friendly_name.as_ptr(),
                native_properties.count(),
                native_properties.keys(),
                native_properties.values(),
                &mut host_handle,
                &mut domain_id,
            )
        });
        if hr.failed() {
            return Err(HostError::RuntimeInitialization { status: hr });
        }

        self.runtime = Some(RuntimeHandle {
            host_handle,
            domain_id,
        });
        self.state = SessionState::Initialized;
        debug!(domain_id, exe = %exe_path, "runtime initialized");
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn handle(&self) -> Option<RuntimeHandle> {
        self.runtime
    }

    /// Creates the delegate to the managed bootstrap initializer.
    pub fn bind_bootstrap_delegate(&mut self) -> HostResult<BootstrapDelegate<'_>> {
        let runtime = self.require("bind the bootstrap delegate", &[SessionState::Initialized])?;

        let assembly = to_c_string(BOOTSTRAP_ASSEMBLY_NAME)?;
        let type_name = to_c_string(BOOTSTRAP_TYPE_NAME)?;
        let method = to_c_string(BOOTSTRAP_METHOD_NAME)?;

        let mut delegate: *mut c_void = std::ptr::null_mut();
        let coreclr_create_delegate = self.entry_points.coreclr_create_delegate;
        let hr = HResult::from(unsafe {
            coreclr_create_delegate(
                runtime.host_handle,
                runtime.domain_id,
                assembly.as_ptr(),
                type_name.as_ptr(),
                method.as_ptr(),
                &mut delegate,
            )
        });

        let bound = if hr.succeeded() {
            unsafe { BootstrapDelegate::from_raw(delegate) }
        } else {
            None
        };
        match bound {
            Some(delegate) => {
                self.state = SessionState::BootstrapBound;
                debug!(method = BOOTSTRAP_METHOD_NAME, "bootstrap delegate bound");
                Ok(delegate)
            }
            None => {
                self.state = SessionState::Failed;
                Err(HostError::DelegateBinding {
                    method: BOOTSTRAP_METHOD_NAME,
                    status: hr,
                })
            }
        }
    }

    /// Binds the bootstrap delegate and hands it the application root.
    pub fn run_bootstrap(&mut self) -> HostResult<()> {
        let app_root = self.app_root.clone();
        let delegate = self.bind_bootstrap_delegate()?;
        delegate.invoke(app_root.as_str())
    }

    /// Runs `assembly_path`'s entry point and returns its exit code.
    pub fn execute_assembly<S: AsRef<str>>(
        &self,
        assembly_path: &str,
        args: &[S],
    ) -> HostResult<u32> {
        let runtime = self.require(
            "execute an assembly",
            &[SessionState::Initialized, SessionState::BootstrapBound],
        )?;

        let clr_assembly = to_c_string(assembly_path)?;
        let (_clr_args, clr_args_ptr) = vec2cstring(args)?;
        let mut exit_code: c_uint = 0;

        let coreclr_execute_assembly = self.entry_points.coreclr_execute_assembly;
        let hr = HResult::from(unsafe {
            coreclr_execute_assembly(
                runtime.host_handle,
                runtime.domain_id,
                clr_args_ptr.len() as c_int,
                clr_args_ptr.as_ptr(),
                clr_assembly.as_ptr(),
                &mut exit_code,
            )
        });
        if hr.failed() {
            return Err(HostError::ExecuteAssembly { status: hr });
        }

        Ok(exit_code)
    }

    /// Shuts the runtime down and releases the library. A failed shutdown is
    /// returned only after the library has been released.
    pub fn stop(mut self) -> HostResult<()> {
        self.release()
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: &[SessionState],
    ) -> HostResult<RuntimeHandle> {
        match self.runtime {
            Some(runtime) if allowed.contains(&self.state) => Ok(runtime),
            _ => Err(HostError::InvalidState {
                operation,
                state: self.state.name(),
            }),
        }
    }

    fn release(&mut self) -> HostResult<()> {
        let mut result = Ok(());

        if let Some(runtime) = self.runtime.take() {
            let coreclr_shutdown = self.entry_points.coreclr_shutdown;
            let hr = HResult::from(unsafe {
                coreclr_shutdown(runtime.host_handle, runtime.domain_id)
            });
            if hr.failed() {
                warn!(status = %hr, "coreclr_shutdown failed");
                result = Err(HostError::RuntimeShutdown { status: hr });
            } else {
                debug!(domain_id = runtime.domain_id, "runtime shut down");
            }
            self.state = SessionState::ShutDown;
        }

        if let Some(library) = self.library.take() {
            library.unload();
        }

        result
    }
}

impl Drop for RuntimeSession {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl fmt::Debug for RuntimeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeSession")
            .field("state", &self.state)
            .field("runtime", &self.runtime)
            .field("library", &self.library.as_ref().map(|l| l.path()))
            .field("app_root", &self.app_root)
            .finish()
    }
}

/// The resolved path of the running executable, passed to initialize.
fn current_executable() -> HostResult<AbsolutePath> {
    let exe = std::env::current_exe().map_err(|e| HostError::PathResolution {
        path: "<current executable>".to_string(),
        reason: e.to_string(),
    })?;
    resolve_absolute(exe)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::library::{
        events, SymbolSource, CORECLR_CREATE_DELEGATE, CORECLR_EXECUTE_ASSEMBLY, CORECLR_INITIALIZE,
        CORECLR_SHUTDOWN,
    };
    use crate::properties::{NATIVE_DLL_SEARCH_DIRECTORIES, TRUSTED_PLATFORM_ASSEMBLIES};
    use crate::strings::CoreClrString;
    use std::ffi::CStr;
    use std::fs::File;
    use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize};
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use widestring::U16CStr;

    const FAKE_DOMAIN: CoreClrDomainId = 7;

    static SERIAL: Mutex<()> = Mutex::new(());

    static INIT_STATUS: AtomicI32 = AtomicI32::new(0);
    static CREATE_STATUS: AtomicI32 = AtomicI32::new(0);
    static SHUTDOWN_STATUS: AtomicI32 = AtomicI32::new(0);
    static NULL_DELEGATE: AtomicBool = AtomicBool::new(false);

    static INIT_CALLS: AtomicUsize = AtomicUsize::new(0);
    static CREATE_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SHUTDOWN_CALLS: AtomicUsize = AtomicUsize::new(0);

    static PROPERTIES: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());
    static EXE_PATH: Mutex<String> = Mutex::new(String::new());
    static DELEGATE_TARGET: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static BOOTSTRAP_PATHS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static EXECUTE_ARGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    fn fake_handle() -> *mut CoreClrHostHandle {
        0x1000 as *mut CoreClrHostHandle
    }

    unsafe fn text(s: CoreClrString) -> String {
        CStr::from_ptr(s).to_string_lossy().into_owned()
    }

    unsafe extern "C" fn fake_initialize(
        exe_path: CoreClrString,
        _app_domain_friendly_name: CoreClrString,
        property_count: c_int,
        property_keys: *const CoreClrString,
        property_values: *const CoreClrString,
        host_handle: *mut *mut CoreClrHostHandle,
        domain_id: *mut CoreClrDomainId,
    ) -> c_int {
        INIT_CALLS.fetch_add(1, Ordering::SeqCst);
        *EXE_PATH.lock().unwrap() = text(exe_path);
        let mut properties = PROPERTIES.lock().unwrap();
        for i in 0..property_count as usize {
            properties.push((text(*property_keys.add(i)), text(*property_values.add(i))));
        }

        let status = INIT_STATUS.load(Ordering::SeqCst);
        if status >= 0 {
            *host_handle = fake_handle();
            *domain_id = FAKE_DOMAIN;
        }
        status
    }

    unsafe extern "C" fn fake_shutdown(
        host_handle: *mut CoreClrHostHandle,
        domain_id: CoreClrDomainId,
    ) -> c_int {
        assert_eq!(host_handle, fake_handle());
        assert_eq!(domain_id, FAKE_DOMAIN);
        SHUTDOWN_CALLS.fetch_add(1, Ordering::SeqCst);
        events::record("shutdown");
        SHUTDOWN_STATUS.load(Ordering::SeqCst)
    }

    unsafe extern "C" fn fake_execute_assembly(
        _host_handle: *mut CoreClrHostHandle,
        _domain_id: CoreClrDomainId,
        argc: c_int,
        argv: *const CoreClrString,
        managed_assembly_path: CoreClrString,
        exit_code: *mut c_uint,
    ) -> c_int {
        let mut args = EXECUTE_ARGS.lock().unwrap();
        args.push(text(managed_assembly_path));
        for i in 0..argc as usize {
            args.push(text(*argv.add(i)));
        }
        *exit_code = 42;
        0
    }

    unsafe extern "C" fn fake_create_delegate(
        host_handle: *mut CoreClrHostHandle,
        domain_id: CoreClrDomainId,
        assembly: CoreClrString,
        type_name: CoreClrString,
        method: CoreClrString,
        delegate: *mut *mut c_void,
    ) -> c_int {
        assert_eq!(host_handle, fake_handle());
        assert_eq!(domain_id, FAKE_DOMAIN);
        CREATE_CALLS.fetch_add(1, Ordering::SeqCst);
        let mut target = DELEGATE_TARGET.lock().unwrap();
        target.clear();
        target.extend(vec![text(assembly), text(type_name), text(method)]);

        let status = CREATE_STATUS.load(Ordering::SeqCst);
        if status >= 0 && !NULL_DELEGATE.load(Ordering::SeqCst) {
            *delegate = fake_bootstrap as crate::delegate::BootstrapFn as *mut c_void;
        }
        status
    }

    unsafe extern "C" fn fake_bootstrap(app_path: *const u16) {
        let path = U16CStr::from_ptr_str(app_path).to_string_lossy();
        BOOTSTRAP_PATHS.lock().unwrap().push(path);
    }

    struct FakeRuntime;

    impl SymbolSource for FakeRuntime {
        fn symbol_address(&self, name: &str) -> Option<*mut c_void> {
            use crate::library::{
                CoreClrCreateDelegateFn, CoreClrExecuteAssemblyFn, CoreClrInitializeFn,
                CoreClrShutdownFn,
            };

            let address = match name {
                CORECLR_INITIALIZE => fake_initialize as CoreClrInitializeFn as *mut c_void,
                CORECLR_SHUTDOWN => fake_shutdown as CoreClrShutdownFn as *mut c_void,
                CORECLR_EXECUTE_ASSEMBLY => {
                    fake_execute_assembly as CoreClrExecuteAssemblyFn as *mut c_void
                }
                CORECLR_CREATE_DELEGATE => {
                    fake_create_delegate as CoreClrCreateDelegateFn as *mut c_void
                }
                _ => return None,
            };
            Some(address)
        }
    }

    struct Fixture {
        _serial: MutexGuard<'static, ()>,
        runtime_dir: TempDir,
        _app_dir: TempDir,
        config: HostConfig,
    }

    fn fixture() -> Fixture {
        let serial = SERIAL.lock().unwrap_or_else(|e| e.into_inner());

        INIT_STATUS.store(0, Ordering::SeqCst);
        CREATE_STATUS.store(0, Ordering::SeqCst);
        SHUTDOWN_STATUS.store(0, Ordering::SeqCst);
        NULL_DELEGATE.store(false, Ordering::SeqCst);
        INIT_CALLS.store(0, Ordering::SeqCst);
        CREATE_CALLS.store(0, Ordering::SeqCst);
        SHUTDOWN_CALLS.store(0, Ordering::SeqCst);
        PROPERTIES.lock().unwrap().clear();
        EXE_PATH.lock().unwrap().clear();
        DELEGATE_TARGET.lock().unwrap().clear();
        BOOTSTRAP_PATHS.lock().unwrap().clear();
        EXECUTE_ARGS.lock().unwrap().clear();
        events::take();

        let runtime_dir = TempDir::new().unwrap();
        File::create(runtime_dir.path().join("System.Runtime.dll")).unwrap();
        File::create(runtime_dir.path().join("System.Private.CoreLib.ni.dll")).unwrap();
        File::create(runtime_dir.path().join("System.Private.CoreLib.dll")).unwrap();
        let app_dir = TempDir::new().unwrap();

        let config = HostConfig::new(
            resolve_absolute(runtime_dir.path()).unwrap(),
            resolve_absolute(app_dir.path()).unwrap(),
        );

        Fixture {
            _serial: serial,
            runtime_dir,
            _app_dir: app_dir,
            config,
        }
    }

    fn start(fixture: &Fixture) -> HostResult<RuntimeSession> {
        let guard = SessionGuard::acquire()?;
        let entry_points = resolve_entry_points(&FakeRuntime)?;
        RuntimeSession::start_with(
            guard,
            LoadedLibrary::this(),
            entry_points,
            &fixture.config,
            "test-domain",
        )
    }

    fn property(key: &str) -> Option<String> {
        PROPERTIES
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    #[test]
    fn full_lifecycle() {
        let fixture = fixture();
        let mut session = start(&fixture).unwrap();
        assert_eq!(session.state(), SessionState::Initialized);
        assert_eq!(session.handle().unwrap().domain_id(), FAKE_DOMAIN);

        session.run_bootstrap().unwrap();
        assert_eq!(session.state(), SessionState::BootstrapBound);
        assert_eq!(
            *BOOTSTRAP_PATHS.lock().unwrap(),
            vec![fixture.config.app_root().to_string()]
        );
        assert_eq!(
            *DELEGATE_TARGET.lock().unwrap(),
            vec![
                BOOTSTRAP_ASSEMBLY_NAME.to_string(),
                BOOTSTRAP_TYPE_NAME.to_string(),
                BOOTSTRAP_METHOD_NAME.to_string(),
            ]
        );

        session.stop().unwrap();
        assert_eq!(SHUTDOWN_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(events::take(), vec!["shutdown", "unload"]);
        assert!(SessionGuard::acquire().is_ok());
    }

    #[test]
    fn initialize_receives_the_property_bag() {
        let fixture = fixture();
        let session = start(&fixture).unwrap();

        let tpa = property(TRUSTED_PLATFORM_ASSEMBLIES).unwrap();
        let entries: Vec<&str> = tpa.split(crate::tpa::PATH_LIST_SEPARATOR).collect();
        let root = fixture.config.runtime_root().to_string();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&format!("{}/System.Private.CoreLib.ni.dll", root).as_str()));
        assert!(entries.contains(&format!("{}/System.Runtime.dll", root).as_str()));
        assert!(!entries.contains(&format!("{}/System.Private.CoreLib.dll", root).as_str()));
        assert_eq!(
            *entries.last().unwrap(),
            fixture.config.bootstrap_assembly_path().as_str()
        );
        assert_eq!(
            property(NATIVE_DLL_SEARCH_DIRECTORIES).unwrap(),
            fixture.config.native_search_directories()
        );
        assert!(!EXE_PATH.lock().unwrap().is_empty());
        assert!(fixture.runtime_dir.path().exists());

        session.stop().unwrap();
    }

    #[test]
    fn failed_initialize_never_binds_or_shuts_down() {
        let fixture = fixture();
        INIT_STATUS.store(0x8013_1522u32 as i32, Ordering::SeqCst);

        match start(&fixture) {
            Err(HostError::RuntimeInitialization { status }) => {
                assert_eq!(status, HResult::CorETypeLoad)
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(INIT_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(CREATE_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(SHUTDOWN_CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(events::take(), vec!["unload"]);
        assert!(SessionGuard::acquire().is_ok());
    }

    #[test]
    fn failed_binding_still_shuts_down_once() {
        let fixture = fixture();
        CREATE_STATUS.store(0x8013_1523u32 as i32, Ordering::SeqCst);

        let mut session = start(&fixture).unwrap();
        match session.run_bootstrap() {
            Err(HostError::DelegateBinding { status, .. }) => {
                assert_eq!(status, HResult::CorEEntryPointNotFound)
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Failed);
        assert!(BOOTSTRAP_PATHS.lock().unwrap().is_empty());

        session.stop().unwrap();
        assert_eq!(SHUTDOWN_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(events::take(), vec!["shutdown", "unload"]);
    }

    #[test]
    fn null_delegate_is_a_binding_failure() {
        let fixture = fixture();
        NULL_DELEGATE.store(true, Ordering::SeqCst);

        let mut session = start(&fixture).unwrap();
        assert!(matches!(
            session.bind_bootstrap_delegate(),
            Err(HostError::DelegateBinding { status: HResult::Ok, .. })
        ));
        drop(session);
        assert_eq!(SHUTDOWN_CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn binding_twice_is_rejected() {
        let fixture = fixture();
        let mut session = start(&fixture).unwrap();
        session.bind_bootstrap_delegate().unwrap();

        assert!(matches!(
            session.bind_bootstrap_delegate(),
            Err(HostError::InvalidState { state: "bootstrap-bound", .. })
        ));
        assert_eq!(CREATE_CALLS.load(Ordering::SeqCst), 1);
        session.stop().unwrap();
    }

    #[test]
    fn failed_shutdown_is_reported() {
        let fixture = fixture();
        SHUTDOWN_STATUS.store(-1, Ordering::SeqCst);

        let session = start(&fixture).unwrap();
        assert!(matches!(
            session.stop(),
            Err(HostError::RuntimeShutdown { .. })
        ));
        assert_eq!(SHUTDOWN_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(events::take(), vec!["shutdown", "unload"]);
        assert!(SessionGuard::acquire().is_ok());
    }

    #[test]
    fn dropping_an_unstopped_session_shuts_down_once() {
        let fixture = fixture();
        let session = start(&fixture).unwrap();
        drop(session);
        assert_eq!(SHUTDOWN_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(events::take(), vec!["shutdown", "unload"]);
    }

    #[test]
    fn second_session_is_rejected() {
        let fixture = fixture();
        let session = start(&fixture).unwrap();

        assert!(matches!(
            RuntimeSession::start(&fixture.config, "again"),
            Err(HostError::SessionAlreadyActive)
        ));
        assert_eq!(INIT_CALLS.load(Ordering::SeqCst), 1);
        session.stop().unwrap();
    }

    #[test]
    fn execute_assembly_returns_the_exit_code() {
        let fixture = fixture();
        let session = start(&fixture).unwrap();

        let code = session
            .execute_assembly("/app/tool.dll", &["--flag", "value"])
            .unwrap();
        assert_eq!(code, 42);
        assert_eq!(
            *EXECUTE_ARGS.lock().unwrap(),
            vec!["/app/tool.dll", "--flag", "value"]
        );
        session.stop().unwrap();
    }

    #[test]
    fn missing_runtime_library_releases_the_guard() {
        let fixture = fixture();
        assert!(matches!(
            RuntimeSession::start(&fixture.config, "domain"),
            Err(HostError::LibraryLoad { .. })
        ));
        assert!(SessionGuard::acquire().is_ok());
    }
}
