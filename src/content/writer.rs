//! Post writer - admin create/update/delete of filesystem posts
//!
//! Each operation is a check-then-write against the directory with no
//! locking. Writes land in a temp file in the same directory and are moved
//! into place by rename, so a failed write leaves the old file (or nothing).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::error::{ContentError, Result};
use super::fs::CONTENT_EXT;
use super::{FrontMatter, PostInput};

/// Reject slugs that could escape the content directory
pub fn validate_slug(slug: &str) -> Result<()> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('.')
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if is_valid {
        Ok(())
    } else {
        Err(ContentError::Validation(format!(
            "invalid slug {:?}: use letters, digits, '-' and '_'",
            slug
        )))
    }
}

#[derive(Debug, Clone)]
pub struct PostWriter {
    dir: PathBuf,
}

impl PostWriter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, CONTENT_EXT))
    }

    /// Create a new post file. Returns the slug.
    pub fn create(&self, input: PostInput) -> Result<String> {
        let slug = match input.slug.as_deref() {
            Some(slug) if !is_blank(Some(slug)) => slug.to_string(),
            _ => return Err(missing_fields("slug, title, content")),
        };
        validate_slug(&slug)?;
        let (fm, body) = build_document(input)?;
        let document = fm.to_document(&body)?;

        let path = self.path_for(&slug);
        if path.exists() {
            return Err(ContentError::Conflict(slug));
        }

        fs::create_dir_all(&self.dir)?;
        let tmp = self.stage(&document)?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                return Err(ContentError::Conflict(slug));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Created post {:?}", path);
        Ok(slug)
    }

    /// Replace an existing post's front-matter and body wholesale
    pub fn update(&self, slug: &str, input: PostInput) -> Result<()> {
        validate_slug(slug)?;
        let (fm, body) = build_document(input)?;
        let document = fm.to_document(&body)?;

        let path = self.path_for(slug);
        if !path.is_file() {
            return Err(ContentError::NotFound(slug.to_string()));
        }

        // Temp files start out owner-only; keep the post's own mode.
        let permissions = fs::metadata(&path)?.permissions();
        let tmp = self.stage(&document)?;
        tmp.as_file().set_permissions(permissions)?;
        tmp.persist(&path)?;

        tracing::info!("Updated post {:?}", path);
        Ok(())
    }

    pub fn delete(&self, slug: &str) -> Result<()> {
        validate_slug(slug)?;

        let path = self.path_for(slug);
        if !path.is_file() {
            return Err(ContentError::NotFound(slug.to_string()));
        }

        fs::remove_file(&path)?;

        tracing::info!("Deleted post {:?}", path);
        Ok(())
    }

    fn stage(&self, document: &str) -> Result<NamedTempFile> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(document.as_bytes())?;
        tmp.as_file().sync_all()?;
        Ok(tmp)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Fill defaults and split into front-matter and body.
/// Defaults match what the filesystem reader assumes for a missing key,
/// except `publishedAt`, which becomes today.
fn build_document(input: PostInput) -> Result<(FrontMatter, String)> {
    let (title, content) = match (input.title, input.content) {
        (Some(title), Some(content)) if !is_blank(Some(&title)) && !content.is_empty() => {
            (title, content)
        }
        _ => return Err(missing_fields("title, content")),
    };

    let published_at = input
        .published_at
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());

    let fm = FrontMatter {
        title: Some(title),
        description: Some(input.description.unwrap_or_default()),
        published_at: Some(published_at),
        tags: input.tags.unwrap_or_default(),
        featured: Some(input.featured.unwrap_or(false)),
        reading_time: Some(input.reading_time.unwrap_or_default()),
        author: Some(input.author.unwrap_or_default()),
        status: Some(input.status.unwrap_or_default().as_str().to_string()),
        hero_image: input.hero_image.filter(|h| !h.is_empty()),
        extra: input.extra,
    };

    Ok((fm, content))
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn missing_fields(fields: &str) -> ContentError {
    ContentError::Validation(format!("Missing required fields: {}", fields))
}
