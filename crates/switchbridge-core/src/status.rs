//! Foreign status codes.
//!
//! Every call across the foreign boundary reports a 32-bit signed status.
//! Non-negative values are success, negative values are failure.

use serde::{Deserialize, Serialize};

/// Status value returned by a foreign call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(i32);

impl Status {
    pub const OK: Status = Status(0);
    /// Success, but the answer is "no".
    pub const FALSE: Status = Status(1);
    /// The generic "operation failed" status. This is the one failure the
    /// bridge always recognizes.
    pub const FAIL: Status = Status(0x8000_4005_u32 as i32);
    pub const INVALID_ARG: Status = Status(0x8007_0057_u32 as i32);
    pub const OUT_OF_MEMORY: Status = Status(0x8007_000E_u32 as i32);
    pub const NO_INTERFACE: Status = Status(0x8000_4002_u32 as i32);
    pub const POINTER: Status = Status(0x8000_4003_u32 as i32);
    pub const NOT_IMPL: Status = Status(0x8000_4001_u32 as i32);
    pub const ABORT: Status = Status(0x8000_4004_u32 as i32);
    pub const UNEXPECTED: Status = Status(0x8000_FFFF_u32 as i32);

    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    #[inline]
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Symbolic name for well-known codes.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Status::OK => "OK",
            Status::FALSE => "FALSE",
            Status::FAIL => "FAIL",
            Status::INVALID_ARG => "INVALID_ARG",
            Status::OUT_OF_MEMORY => "OUT_OF_MEMORY",
            Status::NO_INTERFACE => "NO_INTERFACE",
            Status::POINTER => "POINTER",
            Status::NOT_IMPL => "NOT_IMPL",
            Status::ABORT => "ABORT",
            Status::UNEXPECTED => "UNEXPECTED",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::OK
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl From<Status> for i32 {
    fn from(status: Status) -> Self {
        status.0
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{:#010x} ({})", self.0 as u32, name),
            None => write!(f, "{:#010x}", self.0 as u32),
        }
    }
}
