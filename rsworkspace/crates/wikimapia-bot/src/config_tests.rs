use crate::config::*;
use std::io::Write;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_photos_config() {
    let config = PhotosConfig::default();
    assert_eq!(config.limit, 3);
    assert_eq!(config.download_dir(), std::env::temp_dir());
}

#[test]
fn test_photos_dir_override() {
    let config = PhotosConfig {
        dir: Some(PathBuf::from("/var/tmp/wikimapia")),
        limit: 1,
    };
    assert_eq!(config.download_dir(), PathBuf::from("/var/tmp/wikimapia"));
}

#[test]
fn test_analytics_enabled_by_default() {
    assert!(AnalyticsConfig::default().enabled);
}

#[test]
fn test_minimal_file() {
    let file = write_config(
        r#"
[telegram]
bot_token = "123:abc"

[nats]
servers = ["nats://localhost:4222"]
"#,
    );

    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.telegram.bot_token, "123:abc");
    assert_eq!(config.nats.servers, vec!["nats://localhost:4222"]);
    assert_eq!(config.nats.prefix, "prod");
    assert_eq!(config.wikimapia.base_url, "http://api.wikimapia.org/");
    assert_eq!(config.wikimapia.nearby_count, 9);
    assert_eq!(config.photos.limit, 3);
    assert!(config.analytics.enabled);
    assert!(config.i18n.dir.is_none());
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
[telegram]
bot_token = "123:abc"

[wikimapia]
api_key = "KEY"
base_url = "http://localhost:8080/"
nearby_count = 5
timeout_secs = 3

[nats]
servers = ["nats://a:4222", "nats://b:4222"]
prefix = "dev"

[photos]
dir = "/srv/photos"
limit = 2

[analytics]
enabled = false

[i18n]
dir = "/etc/wikimapia-bot/i18n"
"#,
    );

    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.wikimapia.api_key, "KEY");
    assert_eq!(config.wikimapia.base_url, "http://localhost:8080/");
    assert_eq!(config.wikimapia.nearby_count, 5);
    assert_eq!(config.wikimapia.timeout_secs, 3);
    assert_eq!(config.nats.servers.len(), 2);
    assert_eq!(config.nats.prefix, "dev");
    assert_eq!(config.photos.download_dir(), PathBuf::from("/srv/photos"));
    assert_eq!(config.photos.limit, 2);
    assert!(!config.analytics.enabled);
    assert_eq!(
        config.i18n.dir.as_deref(),
        Some(std::path::Path::new("/etc/wikimapia-bot/i18n"))
    );
}

#[test]
fn test_missing_file_is_an_error() {
    let err = Config::from_file("/nonexistent/wikimapia-bot.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_invalid_file_is_an_error() {
    let file = write_config("[telegram\nbot_token = ");
    let err = Config::from_file(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
