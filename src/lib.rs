//! folio: the content engine behind a personal portfolio site
//!
//! Blog posts are read from a git-backed headless CMS checkout when it has
//! any, otherwise from front-matter `.mdx` files on disk. The admin API
//! writes to the filesystem side only.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{CmsSource, DirectoryCms, FilesystemSource, PostResolver, PostWriter, SiteSettings};

/// The main Folio application
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog posts directory
    pub content_dir: PathBuf,
    /// Standalone pages directory
    pub pages_dir: PathBuf,
    /// CMS checkout directory
    pub cms_dir: PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            let mut config = config::SiteConfig::default();
            config.apply_env();
            config
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already-loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let pages_dir = base_dir.join(&config.pages_dir);
        let cms_dir = base_dir.join(&config.cms.dir);

        Self {
            config,
            base_dir,
            content_dir,
            pages_dir,
            cms_dir,
        }
    }

    /// Read side over the configured sources
    pub fn resolver(&self) -> PostResolver {
        let resolver = PostResolver::new(FilesystemSource::new(&self.content_dir))
            .with_pages(FilesystemSource::new(&self.pages_dir))
            .with_site_settings(SiteSettings {
                title: self.config.title.clone(),
                description: self.config.description.clone(),
                author: self.config.author.clone(),
                ..Default::default()
            });

        if self.config.cms.enabled {
            resolver.with_cms(CmsSource::new(DirectoryCms::new(&self.cms_dir)))
        } else {
            resolver
        }
    }

    /// Write side over the content directory
    pub fn writer(&self) -> PostWriter {
        PostWriter::new(&self.content_dir)
    }

    /// Create a new draft post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<String> {
        commands::new::create_post(self, title, slug)
    }
}
