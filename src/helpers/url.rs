//! URL helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Path of the detail page of a post
///
/// # Examples
/// ```ignore
/// post_path("como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/post/{}", slug.trim_matches('/'))
}

/// Whether a slug is URL safe and can be embedded in a CMS predicate
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("como-utilizar-hooks"), "/post/como-utilizar-hooks");
        assert_eq!(post_path("/criando-um-app/"), "/post/criando-um-app");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("como-utilizar-hooks"));
        assert!(is_valid_slug("post_2021"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("a\"),[at(document.id,\"x"));
        assert!(!is_valid_slug("../etc"));
    }
}
