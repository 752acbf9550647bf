//! Structured logging setup.
//!
//! Installs a JSON `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured level; a malformed `RUST_LOG` is reported on stderr and
//! the configured level is used instead.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber at `level`.
///
/// # Errors
/// Fails if `level` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<()> {
  let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
  let (filter, rejected) = resolve_filter(env.as_deref(), level)?;

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .json()
    .try_init()
    .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

  // No subscriber existed while the filter was built, so report it now.
  if let Some(reason) = rejected {
    tracing::warn!(
      env = EnvFilter::DEFAULT_ENV,
      %reason,
      fallback = level,
      "Ignoring malformed log filter"
    );
  }
  Ok(())
}

/// Pick the filter from the `RUST_LOG` value if it parses, else from
/// `level`. The second element carries the parse error of a rejected
/// env value.
fn resolve_filter(env: Option<&str>, level: &str) -> Result<(EnvFilter, Option<String>)> {
  let rejected = match env.filter(|v| !v.trim().is_empty()) {
    Some(directives) => match EnvFilter::try_new(directives) {
      Ok(filter) => return Ok((filter, None)),
      Err(e) => {
        eprintln!(
          "{}={directives:?} is malformed ({e}); using level {level:?}",
          EnvFilter::DEFAULT_ENV
        );
        Some(e.to_string())
      }
    },
    None => None,
  };

  let filter = EnvFilter::try_new(level)
    .map_err(|e| anyhow!("invalid log level {level:?}: {e}"))?;
  Ok((filter, rejected))
}
