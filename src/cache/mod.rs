// src/cache/mod.rs
//! Cache facade for the news listing and per-item detail pages.

pub mod keys;
pub mod news;

pub use keys::{detail_key, NEWS_DETAIL_PREFIX, NEWS_LIST_KEY};
pub use news::{
    get_cached_detail, get_cached_list, invalidate_all, set_cached_detail, set_cached_list,
    InvalidationOutcome,
};
