// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::fmt;

/// Identifies the kind of failure which halted the interpreter.
///
/// Names follow the spelled-out form of the reference taxonomy
/// (`NOMEM`, `STKLN`, `NOREG`, `NOSTK`, `NOFND`, `TYPES`, `OUTJM`, `NOFIL`,
/// `CREAD`, `CSTAT`, `IDK`).
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorKind {
    /// Allocation failure. Rust's allocator aborts the process on OOM, so
    /// this variant exists for API parity but is never constructed.
    NoMem,
    /// A stack operation required more items than were present.
    StackDepth,
    /// `UNLOAD`/`DEFUNLOAD` referenced a register index with no value.
    NoRegister,
    /// `peek` was asked for an index beyond the current stack depth.
    StackBounds,
    /// `PUSHDEF` referenced a name absent from the builtin table.
    NotFound,
    /// An operation saw a tag it cannot operate on, or mismatched tags.
    TypeMismatch,
    /// A jump offset would walk the cursor off either end of the program.
    JumpOutOfBounds,
    /// `start_file` was given a path that does not exist.
    FileNotFound,
    /// `start_file` failed to read an existing path.
    ReadFailed,
    /// `start_file` failed to `stat` an existing path.
    StatFailed,
    /// Decode-time or other failure not covered by a more specific kind.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::NoMem => "NOMEM",
            ErrorKind::StackDepth => "STKLN",
            ErrorKind::NoRegister => "NOREG",
            ErrorKind::StackBounds => "NOSTK",
            ErrorKind::NotFound => "NOFND",
            ErrorKind::TypeMismatch => "TYPES",
            ErrorKind::JumpOutOfBounds => "OUTJM",
            ErrorKind::FileNotFound => "NOFIL",
            ErrorKind::ReadFailed => "CREAD",
            ErrorKind::StatFailed => "CSTAT",
            ErrorKind::Other => "IDK",
        };
        write!(f, "{}", s)
    }
}

/// An interpreter error, tagged with the source location that raised it.
///
/// Construct via the [`err`] macro rather than directly, so the
/// `file`/`line` fields always point at the actual raise site.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
    pub file: &'static str,
    pub line: u32,
}

impl Error {
    pub fn new(kind: ErrorKind, file: &'static str, line: u32) -> Error {
        Error {
            kind,
            message: None,
            file,
            line,
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>, file: &'static str, line: u32) -> Error {
        Error {
            kind,
            message: Some(message.into()),
            file,
            line,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.message {
            Some(m) => write!(f, "{} ({}) at {}:{}", self.kind, m, self.file, self.line),
            None => write!(f, "{} at {}:{}", self.kind, self.file, self.line),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Builds an [`Error`] stamped with the call site's file and line, per
/// the "function/file/line context" requirement on reported errors.
macro_rules! err {
    ($kind:expr) => {
        $crate::error::Error::new($kind, file!(), line!())
    };
    ($kind:expr, $msg:expr) => {
        $crate::error::Error::with_message($kind, $msg, file!(), line!())
    };
}

pub(crate) use err;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_location() {
        let e = err!(ErrorKind::TypeMismatch);
        let s = format!("{}", e);
        assert!(s.starts_with("TYPES at"));
        assert!(s.contains("error.rs"));
    }

    #[test]
    fn display_includes_message_when_present() {
        let e = err!(ErrorKind::NotFound, "foo");
        assert!(format!("{}", e).starts_with("NOFND (foo) at"));
    }
}
