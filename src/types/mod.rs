pub mod article;
pub mod identifiers;

pub use article::Article;
pub use identifiers::{CacheKey, NEWS_KEY_PREFIX};
