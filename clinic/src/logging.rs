// clinic/src/logging.rs

use tracing_subscriber::EnvFilter;

/// Set by the Lambda runtime for every function invocation environment.
const LAMBDA_FUNCTION_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Installs the global `tracing` subscriber. JSON lines inside Lambda so
/// CloudWatch can index the fields, plain text everywhere else. Calling it
/// twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let result = if std::env::var_os(LAMBDA_FUNCTION_ENV).is_some() {
        builder.json().without_time().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!("Logging already initialized: {}", e);
    }
}
