//! Content module - posts, pages and the sources they are read from

pub mod cms;
mod error;
pub mod fs;
mod frontmatter;
mod post;
pub mod resolver;
pub mod writer;

pub use cms::{CmsEntry, CmsReader, CmsSource, DirectoryCms, LazyContent};
pub use error::{ContentError, Result};
pub use frontmatter::{parse_date, FrontMatter};
pub use fs::FilesystemSource;
pub use post::{sort_by_date_desc, BlogPost, Page, PostInput, PostStatus, SiteSettings, SocialLinks};
pub use resolver::{PostResolver, Source};
pub use writer::{validate_slug, PostWriter};
