//! Error taxonomy and the JSON source-path type used to annotate failures.

use std::fmt;

/// The six-way error taxonomy used throughout the loader (spec §7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Host-side failure: short read, file not found, out of memory, a
    /// decoded/loaded buffer whose length does not match its declared size.
    Io,
    /// Structural or typed input error: wrong JSON type, missing required
    /// field, out-of-range integer, bad base64, chunk framing error, cycle
    /// in the node graph.
    Parse,
    /// Index out of bounds discovered at runtime (as opposed to at parse
    /// time), e.g. a vertex index exceeding the POSITION count.
    Range,
    /// Programmer-facing misuse: an unknown handle passed into a query, or
    /// an output buffer too small for the requested data.
    Invalid,
    /// An optional feature was not compiled in (e.g. `image-decode`).
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Io => "io",
            ErrorKind::Parse => "parse",
            ErrorKind::Range => "range",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Unsupported => "unsupported",
        };
        f.write_str(s)
    }
}

/// An immutable dotted JSON source path, e.g. `root.accessors[3].byteOffset`.
///
/// Mirrors the path-building API of `gltf-json::Path`, but is not tied to
/// any particular deserializer — it is built by hand as the parser walks
/// the document tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path(String);

impl Path {
    /// An empty path, the root of the document.
    pub fn new() -> Self {
        Path(String::new())
    }

    /// Returns a new path with `.name` appended.
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Path(name.to_string())
        } else {
            Path(format!("{}.{}", self.0, name))
        }
    }

    /// Returns a new path with `[index]` appended.
    pub fn index(&self, index: usize) -> Self {
        Path(format!("{}[{}]", self.0, index))
    }

    /// Returns a new path with `["key"]` appended.
    pub fn key(&self, key: &str) -> Self {
        Path(format!("{}[\"{}\"]", self.0, key))
    }

    /// A view into the path's string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("root")
        } else {
            write!(f, "root.{}", self.0)
        }
    }
}

/// The library's sole public error type.
///
/// Carries the [`ErrorKind`] sum plus a path and (when available) a
/// line/column pair, per the error-record shape in spec §6/§7. Line and
/// column default to `1, 1` — this loader parses from an in-memory
/// `serde_json::Value` tree and does not track source positions.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("{kind}: {message} (at {path}, line {line}, column {column})")]
pub struct GltfError {
    pub kind: ErrorKind,
    pub message: &'static str,
    pub path: Path,
    pub line: u32,
    pub column: u32,
}

impl GltfError {
    pub fn new(kind: ErrorKind, message: &'static str, path: Path) -> Self {
        GltfError {
            kind,
            message,
            path,
            line: 1,
            column: 1,
        }
    }

    pub fn io(message: &'static str) -> Self {
        Self::new(ErrorKind::Io, message, Path::new())
    }

    pub fn parse(message: &'static str, path: Path) -> Self {
        Self::new(ErrorKind::Parse, message, path)
    }

    pub fn range(message: &'static str, path: Path) -> Self {
        Self::new(ErrorKind::Range, message, path)
    }

    pub fn invalid(message: &'static str) -> Self {
        Self::new(ErrorKind::Invalid, message, Path::new())
    }

    pub fn unsupported(message: &'static str) -> Self {
        Self::new(ErrorKind::Unsupported, message, Path::new())
    }

    /// Attaches a path to an error that was built without one (e.g. bubbled
    /// up from a helper that does not see the full tree position).
    pub fn with_path(mut self, path: Path) -> Self {
        if self.path.as_str().is_empty() {
            self.path = path;
        }
        self
    }
}

impl From<std::io::Error> for GltfError {
    fn from(_: std::io::Error) -> Self {
        GltfError::io("i/o failure")
    }
}

pub type Result<T> = std::result::Result<T, GltfError>;
