use std::collections::{BTreeMap, BTreeSet};

use crate::{ContentSource, RawFile, Reference, RepoSource, Revision, SourceError};

/// In-memory repository for testing. Holds one snapshot of files and
/// derives directory listings from their paths.
pub struct InMemorySource {
    references: Vec<Reference>,
    files: BTreeMap<String, Vec<u8>>,
}

impl InMemorySource {
    /// A repository whose `HEAD` points at `sha`.
    pub fn new(sha: impl Into<String>) -> Self {
        Self {
            references: vec![Reference {
                name: "HEAD".into(),
                sha: sha.into(),
            }],
            files: BTreeMap::new(),
        }
    }

    /// A repository that advertises no references at all.
    pub fn without_head() -> Self {
        Self {
            references: Vec::new(),
            files: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into().into_bytes());
    }

    pub fn add_bytes(&mut self, path: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    pub fn with(mut self, path: &str, content: &str) -> Self {
        self.add(path, content);
        self
    }
}

#[async_trait::async_trait]
impl ContentSource for InMemorySource {
    async fn fetch_references(&self, _repo: &RepoSource) -> Result<Vec<Reference>, SourceError> {
        Ok(self.references.clone())
    }

    async fn fetch_file_content(
        &self,
        _repo: &RepoSource,
        _revision: &Revision,
        path: &str,
    ) -> Result<String, SourceError> {
        let bytes = self
            .files
            .get(path)
            .ok_or_else(|| SourceError::NotFound(path.to_owned()))?;

        String::from_utf8(bytes.clone()).map_err(|e| SourceError::Parse(e.to_string()))
    }

    async fn fetch_file_response(
        &self,
        _repo: &RepoSource,
        _revision: &Revision,
        path: &str,
    ) -> Result<RawFile, SourceError> {
        self.files
            .get(path)
            .map(|bytes| RawFile {
                content_type: None,
                bytes: bytes.clone(),
            })
            .ok_or_else(|| SourceError::NotFound(path.to_owned()))
    }

    async fn list_files(
        &self,
        _repo: &RepoSource,
        _revision: &Revision,
        prefix: &str,
    ) -> Result<Vec<String>, SourceError> {
        let entries: BTreeSet<String> = self
            .files
            .keys()
            .filter_map(|path| {
                let rest = path.strip_prefix(prefix)?;
                match rest.split_once('/') {
                    Some((dir, _)) => Some(format!("{prefix}{dir}/")),
                    None => Some(path.clone()),
                }
            })
            .collect();

        if entries.is_empty() {
            return Err(SourceError::NotFound(prefix.to_owned()));
        }

        Ok(entries.into_iter().collect())
    }
}
