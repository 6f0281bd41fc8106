//! Social-media link detection
//!
//! A medium is a link to a social-media profile or page. Media are detected
//! by fuzzy-matching links against an editable list of URL prefixes such as
//! `facebook.com/`. Each prefix tolerates a single substituted character, except
//! very short hosts like `fb.com/`, which must match literally.

mod list;
mod matcher;

pub use list::{MediumList, DEFAULT_MEDIA};
pub use matcher::{fuzzy_pattern, MediumMatcher};
