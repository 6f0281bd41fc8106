//! URL handling module for Medium-Scout
//!
//! This module provides URL validation, href normalization, protocol/domain/
//! extension extraction, relative link resolution and block-list matching.

mod matcher;
mod normalize;
mod resolve;
mod validate;

// Re-export main functions
pub use matcher::{matches_blocked, BlockList};
pub use normalize::{
    extract_domain, extract_extension, extract_protocol, is_supported_extension, is_under_rss,
    normalize_href, SUPPORTED_EXTENSIONS,
};
pub use resolve::{resolve, PageLocation, ResolvedLink};
pub use validate::is_valid_url;
