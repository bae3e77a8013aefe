/// Failure categories surfaced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid model configuration (mass bounds, densities, grid sizing).
    Config,
    /// A numerical routine failed loudly (quadrature non-convergence,
    /// spline construction, empty integration interval).
    Numerics,
    /// The diagnostic sink could not be created or written.
    Io,
}

#[derive(Clone)]
pub struct HaloError {
    kind: ErrorKind,
    message: String,
}

impl HaloError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for HaloError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for HaloError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HaloError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for HaloError {}
