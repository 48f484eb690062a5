//! Filesystem source - front-matter `.mdx` files in a directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{BlogPost, FrontMatter, Page};

/// Extension of content files
pub const CONTENT_EXT: &str = "mdx";

/// Reads posts from `<dir>/<slug>.mdx`
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    dir: PathBuf,
}

impl FilesystemSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `slug`
    pub fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, CONTENT_EXT))
    }

    /// Slugs of every content file, in directory order.
    /// A missing directory is empty, not an error.
    pub fn list_slugs(&self) -> io::Result<Vec<String>> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{:?} is not a directory", self.dir),
                ))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            let path = entry.path();
            if entry.file_type().is_file() && is_content_file(path) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    slugs.push(stem.to_string());
                }
            }
        }

        Ok(slugs)
    }

    /// Read one post. Missing or unparseable files are `None`.
    pub fn read_one(&self, slug: &str) -> Option<BlogPost> {
        let (fm, body) = self.read_document(slug)?;
        Some(BlogPost::from_front_matter(slug, fm, body))
    }

    /// Read every post that parses; unreadable files are skipped.
    pub fn read_all(&self) -> io::Result<Vec<BlogPost>> {
        Ok(self
            .list_slugs()?
            .iter()
            .filter_map(|slug| self.read_one(slug))
            .collect())
    }

    /// Read a page, using the same file convention as posts
    pub fn read_page(&self, slug: &str) -> Option<Page> {
        let (fm, body) = self.read_document(slug)?;
        Some(Page {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_default(),
            description: fm.description.unwrap_or_default(),
            content: body,
        })
    }

    fn read_document(&self, slug: &str) -> Option<(FrontMatter, String)> {
        let path = self.path_for(slug);
        if !path.is_file() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                return None;
            }
        };

        match FrontMatter::parse(&content) {
            Ok((fm, body)) => {
                tracing::debug!("Loaded {:?}", path);
                Some((fm, body.to_string()))
            }
            Err(e) => {
                tracing::warn!("Failed to parse front-matter in {:?}: {}", path, e);
                None
            }
        }
    }
}

/// Check if a file is a content file
fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == CONTENT_EXT)
        .unwrap_or(false)
}
