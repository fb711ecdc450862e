// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::MsaFetchError;
use crate::retry::RetryPolicy;

pub const CONFIG_FILE_NAME: &str = ".msafetchconfig";
pub const DEFAULT_HOST_URL: &str = "https://a3m.mmseqs.com";
pub const DEFAULT_TEMPLATE_HOST_URL: &str = "https://a3m-templates.mmseqs.com";

/// Contents of `.msafetchconfig` (JSON). Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub host_url: String,
    pub template_host_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub max_submit_attempts: Option<u32>,
    pub max_elapsed_secs: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            host_url: String::from(DEFAULT_HOST_URL),
            template_host_url: String::from(DEFAULT_TEMPLATE_HOST_URL),
            user_agent: format!("msafetch/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 300,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            min_delay_secs: 5,
            max_delay_secs: 10,
            max_submit_attempts: None,
            max_elapsed_secs: None,
        }
    }
}

impl FetchConfig {
    pub fn from_file(path: &Path) -> Result<Self, MsaFetchError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, MsaFetchError> {
        let config: FetchConfig = serde_json::from_str(text)?;
        if config.retry.min_delay_secs > config.retry.max_delay_secs {
            return Err(MsaFetchError::Format(format!(
                "retry.min_delay_secs ({}) exceeds retry.max_delay_secs ({})",
                config.retry.min_delay_secs, config.retry.max_delay_secs
            )));
        }
        if config.retry.max_delay_secs == 0 {
            return Err(MsaFetchError::Format(String::from(
                "retry.max_delay_secs must be at least 1",
            )));
        }
        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            min_delay: Duration::from_secs(self.retry.min_delay_secs),
            max_delay: Duration::from_secs(self.retry.max_delay_secs),
            max_submit_attempts: self.retry.max_submit_attempts,
            max_elapsed: self.retry.max_elapsed_secs.map(Duration::from_secs),
        }
    }
}

/// `$HOME/.msafetchconfig`, else `./.msafetchconfig`.
pub fn find_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}
