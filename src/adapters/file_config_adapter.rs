//! INI file configuration adapter.

use crate::domain::error::CoinbucketError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoinbucketError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| CoinbucketError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const FULL_CONFIG: &str = r#"
[data]
price_dir = /var/lib/coinbucket/prices
live_catalog = yes

[universe]
symbols = btc,eth,sol

[buckets]
seed = 7

[signal]
window = 10
threshold_pct = 2.5

[report]
output = result.json
"#;

    #[test]
    fn from_string_parses_all_sections() {
        let adapter = FileConfigAdapter::from_string(FULL_CONFIG).unwrap();
        assert_eq!(
            adapter.get_string("data", "price_dir"),
            Some("/var/lib/coinbucket/prices".to_string())
        );
        assert_eq!(
            adapter.get_string("universe", "symbols"),
            Some("btc,eth,sol".to_string())
        );
        assert_eq!(adapter.get_int("buckets", "seed", 42), 7);
        assert_eq!(adapter.get_int("signal", "window", 7), 10);
        assert_eq!(adapter.get_double("signal", "threshold_pct", 5.0), 2.5);
        assert!(adapter.get_bool("data", "live_catalog", false));
        assert_eq!(
            adapter.get_string("report", "output"),
            Some("result.json".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nprice_dir = x\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[buckets]\nseed = abc\n").unwrap();
        assert_eq!(adapter.get_int("buckets", "seed", 42), 42);
        assert_eq!(adapter.get_int("buckets", "missing", 42), 42);
    }

    #[test]
    fn get_double_returns_default_for_missing_or_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[signal]\nthreshold_pct = lots\n").unwrap();
        assert_eq!(adapter.get_double("signal", "threshold_pct", 5.0), 5.0);
        assert_eq!(adapter.get_double("signal", "missing", 9.5), 9.5);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("data", "a", false));
        assert!(adapter.get_bool("data", "b", false));
        assert!(adapter.get_bool("data", "c", false));
        assert!(!adapter.get_bool("data", "d", true));
        assert!(!adapter.get_bool("data", "e", true));
        assert!(!adapter.get_bool("data", "f", true));
        assert!(adapter.get_bool("data", "g", true));
        assert!(!adapter.get_bool("data", "missing", false));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\nprice_dir = ./prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "price_dir"),
            Some("./prices".to_string())
        );
    }

    #[test]
    fn from_file_missing_file_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/coinbucket.ini");
        assert!(matches!(
            result,
            Err(CoinbucketError::ConfigParse { file, .. }) if file.contains("coinbucket.ini")
        ));
    }
}
