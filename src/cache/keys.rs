// src/cache/keys.rs
use std::fmt::Display;

/// Singleton key holding the news listing.
pub const NEWS_LIST_KEY: &str = "news:list";

/// Prefix shared by every per-item detail key.
pub const NEWS_DETAIL_PREFIX: &str = "news:detail:";

/// `news:detail:<id>` for any id that renders as text.
pub fn detail_key(id: impl Display) -> String {
    format!("{}{}", NEWS_DETAIL_PREFIX, id)
}
