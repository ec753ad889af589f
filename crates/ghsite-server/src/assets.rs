use std::collections::HashMap;

/// Name of the bundled base stylesheet.
pub const BASE_STYLESHEET: &str = "tailwindcssbase";

/// A static file bundled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct Asset {
    pub name: &'static str,
    pub content_type: &'static str,
    pub source: &'static str,
}

const BUNDLED: &[Asset] = &[Asset {
    name: BASE_STYLESHEET,
    content_type: "text/css; charset=utf-8",
    source: include_str!("../assets/tailwindcssbase.css"),
}];

/// Lookup table over the bundled assets. Built once at startup.
#[derive(Debug, Clone)]
pub struct Assets {
    entries: HashMap<&'static str, Asset>,
}

impl Assets {
    pub fn load() -> Self {
        Self {
            entries: BUNDLED.iter().map(|asset| (asset.name, *asset)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Asset> {
        self.entries.get(name)
    }

    /// Versioned URL; the trailing segment only busts caches.
    pub fn href(name: &str) -> String {
        format!("/assets/{name}/{}", env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_stylesheet_is_bundled_with_license() {
        let assets = Assets::load();
        let css = assets.lookup(BASE_STYLESHEET).unwrap();

        assert_eq!(css.content_type, "text/css; charset=utf-8");
        assert!(css.source.contains("MIT License"));
        assert!(css.source.contains("modern-normalize"));
    }

    #[test]
    fn unknown_asset_is_none() {
        assert!(Assets::load().lookup("nope").is_none());
    }

    #[test]
    fn href_is_versioned() {
        assert!(Assets::href(BASE_STYLESHEET).starts_with("/assets/tailwindcssbase/"));
    }
}
