//! NATS connection management and JetStream setup

use async_nats::jetstream::{self, kv};
use async_nats::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::BotError;

/// NATS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Deployment prefix for subjects and buckets (e.g., "prod", "dev")
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Optional credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    /// Optional username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Optional password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_prefix() -> String {
    "prod".to_string()
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self::new(vec!["localhost:4222".to_string()], default_prefix())
    }
}

impl NatsConfig {
    pub fn new(servers: Vec<String>, prefix: impl Into<String>) -> Self {
        Self {
            servers,
            prefix: prefix.into(),
            credentials_file: None,
            username: None,
            password: None,
        }
    }

    /// Parse servers from a comma-separated string
    pub fn from_url(url: impl AsRef<str>, prefix: impl Into<String>) -> Self {
        let servers = url
            .as_ref()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self::new(servers, prefix)
    }
}

/// Name of the locale bucket for a deployment prefix
pub fn locale_bucket(prefix: &str) -> String {
    format!("wikimapia_locales_{}", prefix)
}

/// Connect to NATS server
pub async fn connect(config: &NatsConfig) -> Result<Client, BotError> {
    info!("Connecting to NATS servers: {:?}", config.servers);

    let mut opts = async_nats::ConnectOptions::new().name("wikimapia-bot");

    if let Some(ref creds_file) = config.credentials_file {
        debug!("Using credentials file: {}", creds_file);
        opts = opts
            .credentials_file(creds_file)
            .await
            .map_err(|e| BotError::Connection(format!("Failed to load credentials: {}", e)))?;
    } else if let (Some(username), Some(password)) = (&config.username, &config.password) {
        debug!("Using username/password authentication");
        opts = opts.user_and_password(username.clone(), password.clone());
    }

    opts = opts
        .event_callback(|event| async move {
            match event {
                async_nats::Event::Connected => info!("Connected to NATS"),
                async_nats::Event::Disconnected => warn!("Disconnected from NATS"),
                async_nats::Event::ClientError(e) => warn!("NATS client error: {}", e),
                _ => {}
            }
        })
        .retry_on_initial_connect()
        .max_reconnects(None);

    let servers: Vec<&str> = config.servers.iter().map(|s| s.as_str()).collect();
    let client = opts
        .connect(servers)
        .await
        .map_err(|e| BotError::Connection(format!("Failed to connect to NATS: {}", e)))?;

    info!("Successfully connected to NATS");
    Ok(client)
}

/// Create the locale KV bucket, or reuse it if it already exists.
pub async fn setup_locale_kv(js: &jetstream::Context, prefix: &str) -> Result<kv::Store, BotError> {
    let bucket_name = locale_bucket(prefix);

    info!("Setting up JetStream KV bucket: {}", bucket_name);

    let kv_config = kv::Config {
        bucket: bucket_name.clone(),
        history: 1,
        storage: jetstream::stream::StorageType::File,
        ..Default::default()
    };

    match js.create_key_value(kv_config).await {
        Ok(store) => {
            info!("JetStream KV bucket {} ready", bucket_name);
            Ok(store)
        }
        Err(e) => match js.get_key_value(&bucket_name).await {
            Ok(store) => {
                info!("Using existing JetStream KV bucket {}", bucket_name);
                Ok(store)
            }
            Err(_) => Err(BotError::Kv(format!(
                "Failed to create or get KV bucket {}: {}",
                bucket_name, e
            ))),
        },
    }
}
