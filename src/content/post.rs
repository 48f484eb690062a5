//! Post, page and site-settings models

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::frontmatter::{parse_date, FrontMatter};

/// Publication state of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    /// Anything other than `published` is a draft
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("published") => PostStatus::Published,
            _ => PostStatus::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

/// A blog post, as seen by every consumer regardless of where it was read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Slug (file stem or CMS key)
    pub slug: String,

    pub title: String,

    pub description: String,

    /// Publication date, `YYYY-MM-DD`
    pub published_at: String,

    pub tags: Vec<String>,

    pub featured: bool,

    /// Author-supplied, e.g. "5 min read"
    pub reading_time: String,

    pub author: String,

    pub status: PostStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,

    /// Markdown/MDX body
    pub content: String,
}

impl BlogPost {
    /// Build a post from parsed front-matter, defaulting every missing field
    pub fn from_front_matter(slug: &str, fm: FrontMatter, content: String) -> Self {
        Self {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_default(),
            description: fm.description.unwrap_or_default(),
            published_at: fm.published_at.unwrap_or_default(),
            tags: fm.tags,
            featured: fm.featured.unwrap_or(false),
            reading_time: fm.reading_time.unwrap_or_default(),
            author: fm.author.unwrap_or_default(),
            status: PostStatus::from_value(fm.status.as_deref()),
            hero_image: fm.hero_image,
            content,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Parsed publication date, `None` when empty or unparseable
    pub fn published_date(&self) -> Option<NaiveDate> {
        parse_date(&self.published_at)
    }

    /// Case-insensitive tag match
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.to_lowercase() == tag.to_lowercase())
    }
}

/// Sort posts newest first. Undated posts go last; ties keep read order.
pub fn sort_by_date_desc(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| match (a.published_date(), b.published_date()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Admin write payload.
///
/// Every field is optional here so that missing required fields surface as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostInput {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub reading_time: Option<String>,
    pub author: Option<String>,
    pub status: Option<PostStatus>,
    pub hero_image: Option<String>,
    pub content: Option<String>,

    /// Extra front-matter keys written as-is
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// A standalone page from the CMS pages collection or the pages directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
}

/// Site-wide settings singleton
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    pub author: String,
    pub social: SocialLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
