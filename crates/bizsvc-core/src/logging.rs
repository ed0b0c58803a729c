use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a tracing subscriber that writes compact logs to stderr.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. "info") is used.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::info;

    #[test]
    fn init_twice_reports_error_instead_of_panicking() {
        // subscriber はプロセスに一度しか入らない。他のテストの出力を汚さないよう off で入れる
        let _ = init("off");
        assert!(init("off").is_err());
        info!("logging initialized");
    }
}
