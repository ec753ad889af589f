const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Strip leading and trailing separators. The root becomes `""`.
pub fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// True if the path names an image we pass through untouched.
pub fn is_image(path: &str) -> bool {
    path.rsplit_once('.')
        .filter(|(stem, _)| !stem.is_empty() && !stem.ends_with('/'))
        .is_some_and(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// True if a listing entry names a subdirectory.
pub fn is_directory_entry(entry: &str) -> bool {
    entry.ends_with('/')
}

/// True for files the listing renders.
pub fn is_markdown(path: &str) -> bool {
    path.ends_with(".md")
}

/// Site path for a repository file: `2020/post.md` -> `2020/post`.
pub fn article_path(entry: &str) -> &str {
    entry.strip_suffix(".md").unwrap_or(entry)
}

/// Last path segment, without `.md` or a trailing separator.
pub fn display_name(entry: &str) -> &str {
    let trimmed = article_path(entry.trim_end_matches('/'));
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Listing prefix for a directory path: `""` stays `""`, `2020` -> `2020/`.
pub fn directory_prefix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{path}/")
    }
}

/// Join a directory path and a file name.
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_owned()
    } else {
        format!("{dir}/{name}")
    }
}

/// URL prefix under which every generated link lives.
///
/// Empty for the site's own repository; `/github-site/<owner>/<repo>`
/// when rendering another repository through the proxy routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBase {
    prefix: String,
}

impl LinkBase {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn proxied(owner: &str, repo: &str) -> Self {
        Self {
            prefix: format!("/github-site/{owner}/{repo}"),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Absolute href for a site path.
    pub fn href(&self, path: &str) -> String {
        format!("{}/{}", self.prefix, normalize(path))
    }
}
