//! Post resolver - the public read API over both content sources
//!
//! Every listing picks exactly one source: the CMS when it yields at least
//! one post, otherwise the filesystem. Results are never merged across
//! sources and nothing is cached.

use std::collections::BTreeSet;

use super::post::sort_by_date_desc;
use super::writer::validate_slug;
use super::{BlogPost, CmsSource, FilesystemSource, Page, SiteSettings};

/// Which source answered a query
#[derive(Debug, Clone, PartialEq)]
pub enum Source<T> {
    Cms(T),
    Filesystem(T),
    Unavailable,
}

impl<T> Source<T> {
    pub fn into_inner(self) -> Option<T> {
        match self {
            Source::Cms(data) | Source::Filesystem(data) => Some(data),
            Source::Unavailable => None,
        }
    }

    pub fn is_cms(&self) -> bool {
        matches!(self, Source::Cms(_))
    }
}

#[derive(Debug, Clone)]
pub struct PostResolver {
    cms: Option<CmsSource>,
    fs: FilesystemSource,
    pages: Option<FilesystemSource>,
    fallback_settings: SiteSettings,
}

impl PostResolver {
    /// A resolver over filesystem posts only. Pages and the CMS are opt-in.
    pub fn new(fs: FilesystemSource) -> Self {
        Self {
            cms: None,
            fs,
            pages: None,
            fallback_settings: SiteSettings::default(),
        }
    }

    pub fn with_cms(mut self, cms: CmsSource) -> Self {
        self.cms = Some(cms);
        self
    }

    pub fn with_pages(mut self, pages: FilesystemSource) -> Self {
        self.pages = Some(pages);
        self
    }

    /// Settings returned when the CMS has none
    pub fn with_site_settings(mut self, settings: SiteSettings) -> Self {
        self.fallback_settings = settings;
        self
    }

    /// All posts, newest first, tagged with the source that produced them
    pub fn resolve_posts(&self) -> Source<Vec<BlogPost>> {
        if let Some(cms) = &self.cms {
            let mut posts = cms.list_all();
            if !posts.is_empty() {
                sort_by_date_desc(&mut posts);
                return Source::Cms(posts);
            }
            tracing::debug!("CMS returned no posts, falling back to filesystem");
        }

        match self.fs.read_all() {
            Ok(mut posts) => {
                sort_by_date_desc(&mut posts);
                Source::Filesystem(posts)
            }
            Err(e) => {
                tracing::warn!("Failed to list posts in {:?}: {}", self.fs.dir(), e);
                Source::Unavailable
            }
        }
    }

    /// A single post, same source priority as listings
    pub fn resolve_post(&self, slug: &str) -> Source<BlogPost> {
        if validate_slug(slug).is_err() {
            return Source::Unavailable;
        }

        if let Some(post) = self.cms.as_ref().and_then(|cms| cms.read_one(slug)) {
            return Source::Cms(post);
        }

        match self.fs.read_one(slug) {
            Some(post) => Source::Filesystem(post),
            None => Source::Unavailable,
        }
    }

    pub fn all_posts(&self) -> Vec<BlogPost> {
        self.resolve_posts().into_inner().unwrap_or_default()
    }

    pub fn published_posts(&self) -> Vec<BlogPost> {
        self.all_posts()
            .into_iter()
            .filter(BlogPost::is_published)
            .collect()
    }

    pub fn post(&self, slug: &str) -> Option<BlogPost> {
        self.resolve_post(slug).into_inner()
    }

    /// A post only if it is published
    pub fn published_post(&self, slug: &str) -> Option<BlogPost> {
        self.post(slug).filter(BlogPost::is_published)
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<BlogPost> {
        self.published_posts()
            .into_iter()
            .filter(|post| post.has_tag(tag))
            .collect()
    }

    /// Distinct tags across published posts, sorted
    pub fn all_tags(&self) -> Vec<String> {
        self.published_posts()
            .into_iter()
            .flat_map(|post| post.tags)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn featured_posts(&self) -> Vec<BlogPost> {
        self.published_posts()
            .into_iter()
            .filter(|post| post.featured)
            .collect()
    }

    /// Slugs of every publicly reachable post
    pub fn published_slugs(&self) -> Vec<String> {
        self.published_posts()
            .into_iter()
            .map(|post| post.slug)
            .collect()
    }

    pub fn pages(&self) -> Vec<Page> {
        if let Some(cms) = &self.cms {
            let pages = cms.list_pages();
            if !pages.is_empty() {
                return pages;
            }
        }

        let Some(dir) = &self.pages else {
            return Vec::new();
        };
        match dir.list_slugs() {
            Ok(slugs) => slugs.iter().filter_map(|slug| dir.read_page(slug)).collect(),
            Err(e) => {
                tracing::warn!("Failed to list pages in {:?}: {}", dir.dir(), e);
                Vec::new()
            }
        }
    }

    pub fn page(&self, slug: &str) -> Option<Page> {
        if validate_slug(slug).is_err() {
            return None;
        }
        self.cms
            .as_ref()
            .and_then(|cms| cms.read_page(slug))
            .or_else(|| self.pages.as_ref().and_then(|dir| dir.read_page(slug)))
    }

    pub fn site_settings(&self) -> SiteSettings {
        self.cms
            .as_ref()
            .and_then(CmsSource::site_settings)
            .unwrap_or_else(|| self.fallback_settings.clone())
    }
}
