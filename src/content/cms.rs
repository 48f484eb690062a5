//! Headless CMS source
//!
//! The CMS is an external store reached only through [`CmsReader`]. Entries
//! come back with a deferred body because the store may need another fetch
//! to materialize long-form content; [`CmsSource`] resolves those bodies at
//! the boundary so nothing past it ever sees a deferred value.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{BlogPost, FrontMatter, Page, SiteSettings};

/// Deferred accessor for an entry body
pub type LazyContent = Box<dyn FnOnce() -> Result<String> + Send>;

/// A raw entry from the CMS
pub struct CmsEntry {
    pub slug: String,
    pub front_matter: FrontMatter,
    pub content: LazyContent,
}

impl std::fmt::Debug for CmsEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsEntry")
            .field("slug", &self.slug)
            .field("front_matter", &self.front_matter)
            .finish_non_exhaustive()
    }
}

/// Access to a structured content store
pub trait CmsReader: Send + Sync {
    fn list_posts(&self) -> Result<Vec<CmsEntry>>;

    fn read_post(&self, slug: &str) -> Result<Option<CmsEntry>>;

    fn list_pages(&self) -> Result<Vec<CmsEntry>>;

    fn read_page(&self, slug: &str) -> Result<Option<CmsEntry>>;

    fn site_settings(&self) -> Result<Option<SiteSettings>>;
}

/// A [`CmsReader`] over a checked-out content repository:
///
/// ```text
/// <root>/posts/<slug>/index.yaml
/// <root>/posts/<slug>/content.mdx
/// <root>/pages/<slug>/index.yaml
/// <root>/pages/<slug>/content.mdx
/// <root>/site.json
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryCms {
    root: PathBuf,
}

const ENTRY_FILE: &str = "index.yaml";
const CONTENT_FILE: &str = "content.mdx";
const SITE_FILE: &str = "site.json";

impl DirectoryCms {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn list_collection(&self, collection: &str) -> Result<Vec<CmsEntry>> {
        let dir = self.root.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("reading {:?}", dir))? {
            let entry = entry?;
            if entry.path().join(ENTRY_FILE).is_file() {
                if let Some(slug) = entry.file_name().to_str() {
                    slugs.push(slug.to_string());
                }
            }
        }
        slugs.sort();

        let mut entries = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if let Some(entry) = self.read_entry(collection, &slug)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn read_entry(&self, collection: &str, slug: &str) -> Result<Option<CmsEntry>> {
        let entry_dir = self.root.join(collection).join(slug);
        let index = entry_dir.join(ENTRY_FILE);
        if !index.is_file() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&index).with_context(|| format!("reading {:?}", index))?;
        let front_matter: FrontMatter = if yaml.trim().is_empty() {
            FrontMatter::default()
        } else {
            serde_yaml::from_str(&yaml).with_context(|| format!("parsing {:?}", index))?
        };

        let content_path = entry_dir.join(CONTENT_FILE);
        Ok(Some(CmsEntry {
            slug: slug.to_string(),
            front_matter,
            content: Box::new(move || read_optional(&content_path)),
        }))
    }
}

/// A missing body file is an empty body
fn read_optional(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path).with_context(|| format!("reading {:?}", path))
}

impl CmsReader for DirectoryCms {
    fn list_posts(&self) -> Result<Vec<CmsEntry>> {
        self.list_collection("posts")
    }

    fn read_post(&self, slug: &str) -> Result<Option<CmsEntry>> {
        self.read_entry("posts", slug)
    }

    fn list_pages(&self) -> Result<Vec<CmsEntry>> {
        self.list_collection("pages")
    }

    fn read_page(&self, slug: &str) -> Result<Option<CmsEntry>> {
        self.read_entry("pages", slug)
    }

    fn site_settings(&self) -> Result<Option<SiteSettings>> {
        let path = self.root.join(SITE_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let settings = serde_json::from_str(&json).with_context(|| format!("parsing {:?}", path))?;
        Ok(Some(settings))
    }
}

/// The CMS adapter. Never fails: every error is logged and read as "nothing there".
#[derive(Clone)]
pub struct CmsSource {
    reader: Arc<dyn CmsReader>,
}

impl std::fmt::Debug for CmsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsSource").finish_non_exhaustive()
    }
}

impl CmsSource {
    pub fn new<R: CmsReader + 'static>(reader: R) -> Self {
        Self {
            reader: Arc::new(reader),
        }
    }

    pub fn list_all(&self) -> Vec<BlogPost> {
        match self.reader.list_posts() {
            Ok(entries) => entries.into_iter().filter_map(materialize_post).collect(),
            Err(e) => {
                tracing::warn!("Error reading CMS posts: {:#}", e);
                Vec::new()
            }
        }
    }

    pub fn read_one(&self, slug: &str) -> Option<BlogPost> {
        match self.reader.read_post(slug) {
            Ok(entry) => entry.and_then(materialize_post),
            Err(e) => {
                tracing::warn!("Error reading CMS post {}: {:#}", slug, e);
                None
            }
        }
    }

    pub fn list_pages(&self) -> Vec<Page> {
        match self.reader.list_pages() {
            Ok(entries) => entries.into_iter().filter_map(materialize_page).collect(),
            Err(e) => {
                tracing::warn!("Error reading CMS pages: {:#}", e);
                Vec::new()
            }
        }
    }

    pub fn read_page(&self, slug: &str) -> Option<Page> {
        match self.reader.read_page(slug) {
            Ok(entry) => entry.and_then(materialize_page),
            Err(e) => {
                tracing::warn!("Error reading CMS page {}: {:#}", slug, e);
                None
            }
        }
    }

    pub fn site_settings(&self) -> Option<SiteSettings> {
        self.reader.site_settings().unwrap_or_else(|e| {
            tracing::warn!("Error reading site settings: {:#}", e);
            None
        })
    }
}

fn materialize(entry: CmsEntry) -> Option<(String, FrontMatter, String)> {
    let CmsEntry {
        slug,
        front_matter,
        content,
    } = entry;
    match content() {
        Ok(body) => Some((slug, front_matter, body)),
        Err(e) => {
            tracing::warn!("Error resolving CMS content for {}: {:#}", slug, e);
            None
        }
    }
}

fn materialize_post(entry: CmsEntry) -> Option<BlogPost> {
    let (slug, fm, body) = materialize(entry)?;
    Some(BlogPost::from_front_matter(&slug, fm, body))
}

fn materialize_page(entry: CmsEntry) -> Option<Page> {
    let (slug, fm, body) = materialize(entry)?;
    Some(Page {
        slug,
        title: fm.title.unwrap_or_default(),
        description: fm.description.unwrap_or_default(),
        content: body,
    })
}
