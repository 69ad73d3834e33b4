//! Configuration commands.

use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// Print the parsed configuration as JSON.
pub fn dump(config: &Config, out: &mut impl Write) -> ClientResult<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::other(format!("failed to serialize config: {}", e)))?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Validate the configuration without touching the network.
pub fn validate(config: &Config, out: &mut impl Write) -> ClientResult<()> {
    let resolved = config.resolve()?;
    for source in &resolved.sources {
        writeln!(out, "{}: {} ({})", source.name, source.formatter.key(), source.url)?;
    }
    writeln!(out, "Configuration is valid.")?;
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path, out: &mut impl Write) -> ClientResult<()> {
    writeln!(out, "config: {}", path.display()).map_err(ClientError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evsync_core::SourceConfig;

    fn config() -> Config {
        Config {
            sources: vec![SourceConfig {
                name: "MotoGP".to_string(),
                url: "https://calendar.example.com/motogp.ics".to_string(),
                formatter: "motoGPFormatter".to_string(),
                ..SourceConfig::default()
            }],
            ..Config::default()
        }
    }

    #[test]
    fn dump_round_trips_as_json() {
        let mut out = Vec::new();
        dump(&config(), &mut out).unwrap();
        let parsed: Config = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, config());
    }

    #[test]
    fn validate_lists_sources() {
        let mut out = Vec::new();
        validate(&config(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("MotoGP: motoGPFormatter (https://calendar.example.com/motogp.ics)"));
        assert!(text.ends_with("Configuration is valid.\n"));
    }

    #[test]
    fn validate_reports_unknown_formatter() {
        let mut bad = config();
        bad.sources[0].formatter = "superbikeFormatter".to_string();
        let mut out = Vec::new();
        assert!(validate(&bad, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn path_prints_location() {
        let mut out = Vec::new();
        path(Path::new("/home/me/.evsync.json"), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "config: /home/me/.evsync.json\n");
    }
}
