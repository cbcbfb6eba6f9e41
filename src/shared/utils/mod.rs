pub mod logger;
pub mod retry_policy;
pub mod validation;

pub use logger::{init_logger, init_tracing, LogContext, TimedOperation};
pub use retry_policy::{DelayStrategy, RetryPolicy};
pub use validation::Validator;
