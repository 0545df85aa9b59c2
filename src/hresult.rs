use std::fmt;

/// Status code returned by the runtime's exported entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HResult {
    Ok,
    FileNotFound,
    CorETypeLoad,
    CorEEntryPointNotFound,
    CorEDllNotFound,
    Unknown(u32),
}

impl HResult {
    pub fn succeeded(self) -> bool {
        match self {
            HResult::Ok => true,
            HResult::Unknown(hr) => (hr as i32) >= 0,
            _ => false,
        }
    }

    pub fn failed(self) -> bool {
        !self.succeeded()
    }

    pub fn code(self) -> u32 {
        match self {
            HResult::Ok => 0,
            HResult::FileNotFound => 0x8007_0002,
            HResult::CorETypeLoad => 0x8013_1522,
            HResult::CorEEntryPointNotFound => 0x8013_1523,
            HResult::CorEDllNotFound => 0x8013_1524,
            HResult::Unknown(hr) => hr,
        }
    }
}

impl From<u32> for HResult {
    fn from(hr: u32) -> HResult {
        match hr {
            0 => HResult::Ok,
            0x8007_0002 => HResult::FileNotFound,
            0x8013_1522 => HResult::CorETypeLoad,
            0x8013_1523 => HResult::CorEEntryPointNotFound,
            0x8013_1524 => HResult::CorEDllNotFound,
            _ => HResult::Unknown(hr),
        }
    }
}

impl From<i32> for HResult {
    fn from(hr: i32) -> HResult {
        HResult::from(hr as u32)
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HResult::Unknown(_) | HResult::Ok => write!(f, "{:#x}", self.code()),
            named => write!(f, "{:#x} ({:?})", named.code(), named),
        }
    }
}
