use url::Url;

/// Validate a page URL before handing it to a browser.
///
/// Only absolute http(s) URLs qualify. Anything else yields None and the
/// caller just skips opening it.
pub fn page_target(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_target() {
        assert_eq!(
            page_target("https://example.com/a?b=1").map(|u| u.to_string()),
            Some("https://example.com/a?b=1".to_string())
        );
        assert!(page_target(" http://example.com ").is_some());
        assert!(page_target("").is_none());
        assert!(page_target("example.com/no-scheme").is_none());
        assert!(page_target("javascript:alert(1)").is_none());
        assert!(page_target("file:///etc/passwd").is_none());
    }
}
