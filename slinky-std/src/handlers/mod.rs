//! Standard handler implementations.

pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;

pub use logging::LoggingHandler;
#[cfg(feature = "timeout")]
pub use timeout::TimeoutHandler;
