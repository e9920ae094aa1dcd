//! URL helper functions

/// Derive the site URL of a content file from its path relative to the
/// source directory
///
/// # Examples
/// ```ignore
/// page_url("index.md", false)       // -> "/"
/// page_url("notes/index.md", false) // -> "/notes/"
/// page_url("hello.md", false)       // -> "/hello.html"
/// page_url("hello.md", true)        // -> "/hello"
/// ```
pub fn page_url(relative: &str, clean_urls: bool) -> String {
    let relative = relative.replace('\\', "/");
    let without_ext = relative
        .strip_suffix(".md")
        .or_else(|| relative.strip_suffix(".markdown"))
        .unwrap_or(&relative);

    if without_ext == "index" {
        return "/".to_string();
    }
    if let Some(dir) = without_ext.strip_suffix("/index") {
        return format!("/{}/", dir.trim_start_matches('/'));
    }

    let path = without_ext.trim_start_matches('/');
    if clean_urls {
        format!("/{}", path)
    } else {
        format!("/{}.html", path)
    }
}

/// Join a hostname and a site URL into a canonical absolute URL
///
/// # Examples
/// ```ignore
/// absolute_url("https://example.com/blog/", "/hello.html") // -> "https://example.com/blog/hello.html"
/// ```
pub fn absolute_url(hostname: &str, url: &str) -> String {
    let base = hostname.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{}{}", base, url)
    } else {
        format!("{}/{}", base, url)
    }
}
