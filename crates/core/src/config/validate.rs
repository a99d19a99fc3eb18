use super::{types::Config, ConfigError, BUILTIN_SOURCES};

fn ensure_positive(value: u64, name: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::ValidationError(format!("{} cannot be 0", name)));
    }
    Ok(())
}

/// Validate configuration
/// Currently validates:
/// - Selection bounds, redirect cap, timeout and archive count are non-zero
/// - `sources.default_source` names a built-in source
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ensure_positive(config.selection.max_attempts.into(), "selection.max_attempts")?;
    ensure_positive(config.selection.max_page.into(), "selection.max_page")?;
    ensure_positive(config.selection.max_page_draws.into(), "selection.max_page_draws")?;
    ensure_positive(config.transport.max_redirects.into(), "transport.max_redirects")?;
    ensure_positive(config.transport.timeout_secs, "transport.timeout_secs")?;
    ensure_positive(config.acquisition.keep_archives as u64, "acquisition.keep_archives")?;
    ensure_positive(config.sources.artic.page_limit.into(), "sources.artic.page_limit")?;

    if !BUILTIN_SOURCES.contains(&config.sources.default_source.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "sources.default_source must be one of {:?}, got {:?}",
            BUILTIN_SOURCES, config.sources.default_source
        )));
    }

    Ok(())
}
