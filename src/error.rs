//! Error types for the benchmark harness.

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("benchmark name is empty")]
    EmptyName,

    /// Names end up in comma separated report lines.
    #[error("benchmark name {0:?} contains a separator or control character")]
    InvalidName(String),

    #[error("benchmark {0:?} is registered more than once")]
    DuplicateBenchmark(String),

    #[error("benchmark {0:?} has a vectorized variant but no SPMD variant")]
    VectorizedWithoutSpmd(String),

    #[error("no benchmarks registered")]
    EmptyRegistry,

    /// Rows are filled sixteen pixels at a time.
    #[error("frame size {width}x{height} must be non-empty and a multiple of 16 wide")]
    InvalidSize { width: u32, height: u32 },

    #[error("run count must be at least 1")]
    NoRuns,

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("could not build SPMD thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed report line {0:?}")]
    MalformedReport(String),
}
