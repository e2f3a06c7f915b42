use std::fmt::Display;

/// The throughput ceiling a request is admitted under.
///
/// The public stash tab endpoint enforces a much stricter limit upstream than
/// every other endpoint, so it gets its own class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateClass {
    /// Every endpoint except the public stash tabs
    Standard,
    /// The public stash tab endpoint
    Restricted,
}

impl Display for RateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Restricted => write!(f, "restricted"),
        }
    }
}
