use base64::Engine;
use reqwest::Url;

use ghsite::{ContentSource, RawFile, Reference, RepoSource, Revision, SourceError};

use crate::content::{ContentsResponse, FileContent};
use crate::refs::parse_advertisement;

const USER_AGENT: &str = "ghsite";

/// Endpoints and credentials for talking to GitHub.
#[derive(Debug, Clone, Default)]
pub struct GitHubSourceConfig {
    pub token: Option<String>,
    pub api_base_url: Option<String>,
    pub raw_base_url: Option<String>,
    pub git_base_url: Option<String>,
}

/// Reads repository content from GitHub.
///
/// References come from the smart-HTTP advertisement, files and
/// listings from the Contents API, and raw bodies from the raw host.
pub struct GitHubSource {
    config: GitHubSourceConfig,
    client: reqwest::Client,
}

impl GitHubSource {
    pub fn new(config: GitHubSourceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_base(&self) -> &str {
        self.config
            .api_base_url
            .as_deref()
            .unwrap_or("https://api.github.com")
    }

    fn raw_base(&self) -> &str {
        self.config
            .raw_base_url
            .as_deref()
            .unwrap_or("https://raw.githubusercontent.com")
    }

    fn git_base(&self) -> &str {
        self.config
            .git_base_url
            .as_deref()
            .unwrap_or("https://github.com")
    }

    fn build_request(&self, url: Url) -> reqwest::RequestBuilder {
        let mut req = self.client.get(url).header("User-Agent", USER_AGENT);

        if let Some(token) = &self.config.token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        req
    }

    /// Send a GET, mapping 404 to [`SourceError::NotFound`] and any other
    /// non-success status to [`SourceError::Network`].
    async fn get(&self, url: Url, what: &str) -> Result<reqwest::Response, SourceError> {
        tracing::debug!(%url, "GET");

        let response = self
            .build_request(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(SourceError::NotFound(what.to_owned()));
        }

        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "HTTP {}: {}",
                response.status(),
                response
                    .text()
                    .await
                    .unwrap_or_else(|_| "unknown".into())
            )));
        }

        Ok(response)
    }

    async fn contents(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<ContentsResponse, SourceError> {
        let prefix = ["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"];
        let mut url = endpoint(self.api_base(), prefix.into_iter().chain(path.split('/')))?;
        url.query_pairs_mut().append_pair("ref", revision.as_str());

        self.get(url, path)
            .await?
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))
    }

    fn decode_content(&self, file: &FileContent) -> Result<Option<String>, SourceError> {
        // Files over the API size limit come back with encoding "none".
        let (Some(encoded), Some("base64")) = (file.content.as_deref(), file.encoding.as_deref())
        else {
            return Ok(None);
        };

        // GitHub returns base64 with newlines embedded
        let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&cleaned)
            .map_err(|e| SourceError::Parse(format!("base64 decode failed: {e}")))?;

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| SourceError::Parse(format!("invalid UTF-8: {e}")))
    }
}

/// `base` extended with each non-empty segment. Segments are
/// percent-encoded, so `#` and `?` in file names stay part of the path.
fn endpoint<'a>(
    base: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, SourceError> {
    let mut url = Url::parse(base)
        .map_err(|e| SourceError::Other(format!("invalid base URL {base:?}: {e}")))?;

    url.path_segments_mut()
        .map_err(|()| SourceError::Other(format!("base URL {base:?} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments.into_iter().filter(|s| !s.is_empty()));

    Ok(url)
}

#[async_trait::async_trait]
impl ContentSource for GitHubSource {
    async fn fetch_references(&self, repo: &RepoSource) -> Result<Vec<Reference>, SourceError> {
        let git_dir = format!("{}.git", repo.repo);
        let mut url = endpoint(
            self.git_base(),
            [repo.owner.as_str(), git_dir.as_str(), "info", "refs"],
        )?;
        url.query_pairs_mut().append_pair("service", "git-upload-pack");

        let body = self
            .get(url, &repo.to_string())
            .await?
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        parse_advertisement(&body)
    }

    async fn fetch_file_content(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<String, SourceError> {
        let file = match self.contents(repo, revision, path).await? {
            ContentsResponse::File(file) => file,
            ContentsResponse::Directory(_) => return Err(SourceError::NotFound(path.to_owned())),
        };

        if let Some(text) = self.decode_content(&file)? {
            return Ok(text);
        }

        let raw = self.fetch_file_response(repo, revision, path).await?;
        String::from_utf8(raw.bytes).map_err(|e| SourceError::Parse(format!("invalid UTF-8: {e}")))
    }

    async fn fetch_file_response(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        path: &str,
    ) -> Result<RawFile, SourceError> {
        let prefix = [repo.owner.as_str(), repo.repo.as_str(), revision.as_str()];
        let url = endpoint(self.raw_base(), prefix.into_iter().chain(path.split('/')))?;

        let response = self.get(url, path).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        Ok(RawFile {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn list_files(
        &self,
        repo: &RepoSource,
        revision: &Revision,
        prefix: &str,
    ) -> Result<Vec<String>, SourceError> {
        match self.contents(repo, revision, prefix).await? {
            ContentsResponse::Directory(entries) => {
                Ok(entries.iter().map(|e| e.listing_path()).collect())
            }
            ContentsResponse::File(_) => Err(SourceError::NotFound(prefix.to_owned())),
        }
    }
}
