//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable that overrides `admin.password`
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // Directory
    pub content_dir: String,
    pub pages_dir: String,

    // Sources
    pub cms: CmsConfig,

    // Admin
    pub admin: AdminConfig,

    // Server
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Portfolio".to_string(),
            description: "A modern portfolio website".to_string(),
            author: String::new(),

            content_dir: "content/blog".to_string(),
            pages_dir: "content/pages".to_string(),

            cms: CmsConfig::default(),
            admin: AdminConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
            if !password.is_empty() {
                self.admin.password = password;
            }
        }
    }
}

/// Headless CMS checkout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    pub enabled: bool,
    /// Directory holding the CMS content checkout, relative to the site root
    pub dir: String,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: ".cms".to_string(),
        }
    }
}

/// Admin panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub password: String,
    pub cookie_name: String,
    pub session_max_age_secs: u64,
    /// Mark the session cookie `Secure` (serve over HTTPS)
    pub secure_cookie: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: "admin123".to_string(),
            cookie_name: "admin-session".to_string(),
            session_max_age_secs: 60 * 60 * 24 * 7,
            secure_cookie: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert!(!config.cms.enabled);
        assert_eq!(config.admin.cookie_name, "admin-session");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Jane's Portfolio
author: Jane
content_dir: posts
cms:
  enabled: true
  dir: cms-checkout
server:
  port: 8080
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Jane's Portfolio");
        assert_eq!(config.author, "Jane");
        assert_eq!(config.content_dir, "posts");
        assert!(config.cms.enabled);
        assert_eq!(config.cms.dir, "cms-checkout");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "localhost");
        assert_eq!(config.admin.password, "admin123");
    }
}
