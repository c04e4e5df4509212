//! Configuration commands.

use cufirst_core::SiteConfig;

use crate::config::{default_path, to_toml};
use crate::error::CliResult;

/// Renders the current configuration as TOML.
pub fn dump(config: &SiteConfig) -> CliResult<String> {
    let toml_str = to_toml(config)?;
    Ok(format!(
        "# config.toml ({})\n{toml_str}",
        default_path().display()
    ))
}

/// Validates the configuration.
pub fn validate(config: &SiteConfig) -> CliResult<String> {
    config.validate()?;
    let mut out = String::new();
    if let Some(endpoint) = &config.contact.endpoint {
        let allow = config.contact.allow_list()?;
        out.push_str(&format!(
            "Contact endpoint {endpoint} ({} mode), trusted origins: {}\n",
            config.contact.mode.as_str(),
            allow.origins().join(", ")
        ));
    } else {
        out.push_str("No contact endpoint configured; the form will not submit.\n");
    }
    out.push_str("Configuration is valid.\n");
    Ok(out)
}

/// Shows the configuration file path.
pub fn path() -> String {
    format!("config: {}\n", default_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn validate_default() {
        let out = validate(&SiteConfig::default()).unwrap();
        assert!(out.contains("No contact endpoint"));
        assert!(out.ends_with("Configuration is valid.\n"));
    }

    #[test]
    fn validate_lists_origins() {
        let mut config = SiteConfig::default();
        config.contact.endpoint = Some("https://forms.example.com/send".to_string());
        config.contact.site_origin = Some("https://www.cufirst.org".to_string());
        let out = validate(&config).unwrap();
        assert!(out.contains("https://forms.example.com, https://www.cufirst.org"));
        assert!(out.contains("(fetch mode)"));
    }

    #[test]
    fn validate_rejects() {
        let mut config = SiteConfig::default();
        config.slideshow.interval_ms = 0;
        assert!(matches!(validate(&config), Err(CliError::Site(_))));
    }

    #[test]
    fn dump_has_sections() {
        let out = dump(&SiteConfig::default()).unwrap();
        assert!(out.starts_with("# config.toml"));
        assert!(out.contains("[contact]"));
        assert!(out.contains("interval_ms = 5000"));
    }
}
