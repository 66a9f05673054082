//! Settings drawn from the environment.
//!
//! Nothing here is global: values are read once and handed to the adapters
//! that need them.

use crate::error::ConfigError;

pub const API_KEY_ENV: &str = "YT_API_KEY";
pub const PLAYLISTS_ENV: &str = "YT_PLAYLISTS";

/// Split a comma separated playlist list, dropping blanks.
pub fn parse_source_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick the explicit key if given, otherwise the environment.
pub fn resolve_api_key(explicit: Option<String>) -> Result<String, ConfigError> {
    explicit
        .or_else(|| std::env::var(API_KEY_ENV).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingApiKey {
            env_var: API_KEY_ENV.to_string(),
        })
}

/// Pick the explicit playlists if any, otherwise the environment.
pub fn resolve_sources(explicit: &[String]) -> Result<Vec<String>, ConfigError> {
    let sources = if explicit.is_empty() {
        std::env::var(PLAYLISTS_ENV)
            .map(|raw| parse_source_list(&raw))
            .unwrap_or_default()
    } else {
        explicit
            .iter()
            .flat_map(|raw| parse_source_list(raw))
            .collect()
    };

    if sources.is_empty() {
        return Err(ConfigError::MissingPlaylists {
            env_var: PLAYLISTS_ENV.to_string(),
        });
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_source_list(" PL1, PL2 ,,PL3,"),
            vec!["PL1", "PL2", "PL3"]
        );
        assert!(parse_source_list("").is_empty());
    }

    #[test]
    fn explicit_sources_win_and_are_split() {
        let sources =
            resolve_sources(&["PL1,PL2".to_string(), "PL3".to_string()]).unwrap();
        assert_eq!(sources, vec!["PL1", "PL2", "PL3"]);
    }

    #[test]
    fn explicit_api_key_wins() {
        assert_eq!(resolve_api_key(Some("k".into())).unwrap(), "k");
    }

    #[test]
    fn blank_explicit_api_key_is_missing() {
        // a blank value never counts, whatever the environment holds
        let err = resolve_api_key(Some("  ".into())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { .. }));
    }
}
