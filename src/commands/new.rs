//! Create a new post

use anyhow::Result;

use crate::content::{PostInput, PostStatus};
use crate::Folio;

/// Create a new draft post; the slug defaults to the slugified title
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<String> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };

    let input = PostInput {
        slug: Some(slug),
        title: Some(title.to_string()),
        author: Some(folio.config.author.clone()),
        status: Some(PostStatus::Draft),
        content: Some(format!("# {}\n", title)),
        ..Default::default()
    };

    let slug = folio.writer().create(input)?;
    println!("Created: {:?}", folio.content_dir.join(format!("{}.mdx", slug)));

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::ContentError;
    use tempfile::TempDir;

    fn folio(tmp: &TempDir) -> Folio {
        let mut config = SiteConfig::default();
        config.author = "Jane".to_string();
        Folio::with_config(tmp.path().to_path_buf(), config)
    }

    #[test]
    fn test_slug_from_title() {
        let tmp = TempDir::new().unwrap();
        let folio = folio(&tmp);

        let slug = create_post(&folio, "Hello, Rust World!", None).unwrap();
        assert_eq!(slug, "hello-rust-world");

        let post = folio.resolver().post(&slug).unwrap();
        assert_eq!(post.title, "Hello, Rust World!");
        assert_eq!(post.author, "Jane");
        assert!(!post.is_published());
    }

    #[test]
    fn test_explicit_slug_and_conflict() {
        let tmp = TempDir::new().unwrap();
        let folio = folio(&tmp);

        create_post(&folio, "Anything", Some("custom")).unwrap();
        let err = create_post(&folio, "Again", Some("custom")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ContentError>(),
            Some(ContentError::Conflict(_))
        ));
    }
}
