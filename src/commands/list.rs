//! List site content

use anyhow::Result;

use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let resolver = folio.resolver();

    match content_type {
        "post" | "posts" => {
            let posts = resolver.all_posts();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] ({})",
                    display_date(&post.published_at),
                    post.title,
                    post.slug,
                    post.status.as_str()
                );
            }
        }
        "published" => {
            let posts = resolver.published_posts();
            println!("Published ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    display_date(&post.published_at),
                    post.title,
                    post.slug
                );
            }
        }
        "featured" => {
            let posts = resolver.featured_posts();
            println!("Featured ({}):", posts.len());
            for post in posts {
                println!("  {} [{}]", post.title, post.slug);
            }
        }
        "tag" | "tags" => {
            let tags = resolver.all_tags();
            println!("Tags ({}):", tags.len());
            for tag in tags {
                println!("  {} ({})", tag, resolver.posts_by_tag(&tag).len());
            }
        }
        "page" | "pages" => {
            let pages = resolver.pages();
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", page.title, page.slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, published, featured, tag, page",
                content_type
            );
        }
    }

    Ok(())
}

fn display_date(date: &str) -> &str {
    if date.is_empty() {
        "----------"
    } else {
        date
    }
}
