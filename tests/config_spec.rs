use std::collections::HashMap;
use std::fs;

use molecule_finder::config::FinderConfig;
use speculate2::speculate;
use tempfile::TempDir;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

speculate! {
    before {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
    }

    describe "from_file" {
        it "fills unspecified fields with defaults" {
            fs::write(&path, r#"{"lookup": {"wikipedia_language": "de"}}"#).unwrap();
            let config = FinderConfig::from_file(&path).expect("Failed to load config");

            assert_eq!(config.lookup.wikipedia_language, "de");
            assert_eq!(config.lookup.timeout_secs, 10);
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.lookup.wikipedia_api_url(), "https://de.wikipedia.org/w/api.php");
        }

        it "rejects malformed JSON" {
            fs::write(&path, "{ not json").unwrap();
            assert!(FinderConfig::from_file(&path).is_err());
        }
    }

    describe "load" {
        it "reads the given file" {
            fs::write(&path, r#"{"server": {"port": 8080}}"#).unwrap();
            let config = FinderConfig::load(Some(path.as_path())).expect("Failed to load config");
            assert_eq!(config.server.port, 8080);
        }

        it "uses defaults when the file does not exist" {
            let missing = dir.path().join("absent.json");
            let config = FinderConfig::load(Some(missing.as_path())).expect("Failed to load config");
            assert_eq!(config.server.host, "127.0.0.1");
        }

        it "rejects an empty user agent" {
            fs::write(&path, r#"{"lookup": {"user_agent": "  "}}"#).unwrap();
            assert!(FinderConfig::load(Some(path.as_path())).is_err());
        }
    }

    describe "apply_overrides" {
        it "overrides file values" {
            fs::write(&path, r#"{"lookup": {"user_agent": "FromFile/1.0"}}"#).unwrap();
            let mut config = FinderConfig::from_file(&path).unwrap();
            let env = vars(&[
                ("MOLFINDER_USER_AGENT", "FromEnv/1.0"),
                ("MOLFINDER_TIMEOUT_SECS", "3"),
                ("MOLFINDER_WIKIPEDIA_URL", "http://127.0.0.1:9/w/api.php"),
                ("MOLFINDER_PORT", "4000"),
            ]);
            config.apply_overrides(|key| env.get(key).cloned()).unwrap();

            assert_eq!(config.lookup.user_agent, "FromEnv/1.0");
            assert_eq!(config.lookup.timeout_secs, 3);
            assert_eq!(config.lookup.wikipedia_api_url(), "http://127.0.0.1:9/w/api.php");
            assert_eq!(config.server.port, 4000);
        }

        it "rejects a non-numeric timeout" {
            let mut config = FinderConfig::default();
            let env = vars(&[("MOLFINDER_TIMEOUT_SECS", "soon")]);
            assert!(config.apply_overrides(|key| env.get(key).cloned()).is_err());
        }
    }

    describe "validate" {
        it "rejects a zero timeout" {
            let mut config = FinderConfig::default();
            config.lookup.timeout_secs = 0;
            assert!(config.validate().is_err());
        }

        it "rejects an empty language" {
            let mut config = FinderConfig::default();
            config.lookup.wikipedia_language = String::new();
            assert!(config.validate().is_err());
        }
    }
}
