//! HTML sanitization.
//!
//! Stored article bodies only ever contain the tags and attributes listed in
//! [`ALLOWED_TAGS`]. Disallowed tags are stripped, their text kept, except
//! for `script` and `style` whose contents are dropped.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use ammonia::Builder;

/// Tag allow-list with the attributes permitted on each tag.
pub const ALLOWED_TAGS: &[(&str, &[&str])] = &[
    ("h1", &[]),
    ("h2", &[]),
    ("h3", &[]),
    ("h4", &[]),
    ("h5", &[]),
    ("h6", &[]),
    ("p", &[]),
    ("br", &[]),
    ("hr", &[]),
    ("strong", &[]),
    ("b", &[]),
    ("em", &[]),
    ("i", &[]),
    ("u", &[]),
    ("ul", &[]),
    ("ol", &[]),
    ("li", &[]),
    ("blockquote", &[]),
    ("pre", &[]),
    ("code", &[]),
    ("table", &[]),
    ("thead", &[]),
    ("tbody", &[]),
    ("tr", &[]),
    ("th", &[]),
    ("td", &[]),
    ("div", &[]),
    ("span", &[]),
    ("a", &["href", "title"]),
    ("img", &["src", "alt", "title"]),
];

/// URL schemes allowed in `href` and `src`. Relative URLs pass through.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// `rel` value forced onto every anchor.
pub const LINK_REL: &str = "noopener noreferrer";

fn builder() -> &'static Builder<'static> {
    static BUILDER: OnceLock<Builder<'static>> = OnceLock::new();
    BUILDER.get_or_init(|| {
        let tags: HashSet<&str> = ALLOWED_TAGS.iter().map(|(tag, _)| *tag).collect();
        let tag_attributes: HashMap<&str, HashSet<&str>> = ALLOWED_TAGS
            .iter()
            .filter(|(_, attrs)| !attrs.is_empty())
            .map(|(tag, attrs)| (*tag, attrs.iter().copied().collect()))
            .collect();

        let mut builder = Builder::default();
        builder
            .tags(tags)
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
            .link_rel(Some(LINK_REL));
        builder
    })
}

/// Sanitize an HTML fragment against the allow-list.
pub fn sanitize_html(html: &str) -> String {
    builder().clean(html).to_string()
}
