use crate::error::ConfigError;
use crate::paytable::PayoutTable;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the payout table file to load.
pub const PAYTABLE_ENV: &str = "CITREA_PAYTABLE";

/// Load and validate a payout table. The format follows the file extension.
pub fn load_paytable(path: impl AsRef<Path>) -> Result<PayoutTable, ConfigError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let read = || {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    };
    let table = match ext.as_deref() {
        Some("toml") => parse_toml(&read()?)?,
        Some("json") => parse_json(&read()?)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };
    info!(path = %path.display(), jackpot = table.jackpot(), "payout table loaded");
    Ok(table)
}

pub fn parse_toml(raw: &str) -> Result<PayoutTable, ConfigError> {
    Ok(toml::from_str(raw)?)
}

pub fn parse_json(raw: &str) -> Result<PayoutTable, ConfigError> {
    Ok(serde_json::from_str(raw)?)
}

/// Table named by `CITREA_PAYTABLE`, or the built-in Citrea schedule when unset.
pub fn paytable_from_env() -> Result<PayoutTable, ConfigError> {
    match std::env::var_os(PAYTABLE_ENV) {
        Some(path) => load_paytable(PathBuf::from(path)),
        None => {
            debug!("{PAYTABLE_ENV} not set, using built-in schedule");
            Ok(PayoutTable::citrea())
        }
    }
}

/// Explicit path wins over the environment.
pub fn resolve_paytable(path: Option<&Path>) -> Result<PayoutTable, ConfigError> {
    match path {
        Some(p) => load_paytable(p),
        None => paytable_from_env(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CLASSIC_TOML: &str = r#"
"777" = 800
"666" = 500
"555" = 300
"444" = 200
"333" = 150
"222" = 100
"111" = 80
"000" = 50
two_sevens = 20
one_seven = 10
three_of_a_kind = 15
two_cherries = 5
two_bars = 5
two_of_a_kind = 3
one_cherry = 2
"#;

    #[test]
    fn toml_table_parses() {
        assert_eq!(parse_toml(CLASSIC_TOML).unwrap(), PayoutTable::classic());
    }

    #[test]
    fn invalid_table_fails_at_load_time() {
        let missing = CLASSIC_TOML.replace("one_cherry = 2\n", "");
        let err = parse_toml(&missing).unwrap_err();
        assert!(err.to_string().contains("one_cherry"), "{err}");

        let unknown = format!("{CLASSIC_TOML}bonus_spins = 4\n");
        assert!(parse_toml(&unknown).is_err());

        let negative = CLASSIC_TOML.replace("two_bars = 5", "two_bars = -5");
        assert!(parse_toml(&negative).is_err());
    }

    #[test]
    fn loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("table.json");
        let json = serde_json::to_string(&PayoutTable::citrea()).unwrap();
        std::fs::write(&json_path, json).unwrap();
        assert_eq!(load_paytable(&json_path).unwrap(), PayoutTable::citrea());

        let toml_path = dir.path().join("table.TOML");
        let mut f = std::fs::File::create(&toml_path).unwrap();
        f.write_all(CLASSIC_TOML.as_bytes()).unwrap();
        assert_eq!(load_paytable(&toml_path).unwrap(), PayoutTable::classic());

        let yaml_path = dir.path().join("table.yaml");
        assert!(matches!(
            load_paytable(&yaml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            load_paytable(dir.path().join("absent.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}
