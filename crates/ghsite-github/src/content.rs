use serde::Deserialize;

/// Response from GitHub's Contents API.
/// `GET /repos/{owner}/{repo}/contents/{path}?ref={sha}`
///
/// A file path yields an object; a directory path yields an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentsResponse {
    Directory(Vec<DirectoryEntry>),
    File(FileContent),
}

/// A file, with its body base64-encoded.
#[derive(Debug, Deserialize)]
pub struct FileContent {
    pub name: String,
    pub path: String,
    pub content: Option<String>,
    pub encoding: Option<String>,
}

/// A single entry of a directory listing.
#[derive(Debug, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl DirectoryEntry {
    /// Repo-relative path, with a trailing `/` for directories.
    pub fn listing_path(&self) -> String {
        if self.entry_type == "dir" {
            format!("{}/", self.path)
        } else {
            self.path.clone()
        }
    }
}
