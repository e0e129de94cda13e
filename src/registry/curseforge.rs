//! registry::curseforge
//!
//! CurseForge implementation of the [`Registry`] trait.
//!
//! # Design
//!
//! Every API response is wrapped in a `{ "data": ... }` envelope and every
//! request carries an `x-api-key` header. Mods are scoped to Minecraft and
//! its "Mods" class; both ids are discovered on first use and cached for
//! the lifetime of the client.
//!
//! # Downloads
//!
//! File bytes come from a CDN URL included in the file record. The body is
//! streamed into `<dest>.part`, checked against the published SHA-1 when
//! there is one, and only then renamed to `dest`. A failed or interrupted
//! download therefore never leaves a file the installer would mistake for
//! a finished one.
//!
//! # Example
//!
//! ```ignore
//! use tmod::registry::curseforge::CurseForgeClient;
//!
//! let client = CurseForgeClient::new(settings.api_base(), settings.api_key())?;
//! let jei = client.search_mod_by_id(238222).await?;
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::debug;

use super::traits::{select_file, Registry, RegistryError};
use super::types::{Mod, ModFile};
use crate::core::types::{GameVersion, ModLoader, Slug};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("tmod/", env!("CARGO_PKG_VERSION"));

/// Files requested per page when listing a mod's files.
const FILES_PAGE_SIZE: u32 = 50;

/// Response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    index: u32,
    result_count: u32,
    total_count: u32,
}

#[derive(Debug, Deserialize)]
struct Game {
    id: u32,
    name: String,
    slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Category {
    id: u32,
    name: String,
    #[serde(default)]
    class_id: Option<u32>,
    #[serde(default)]
    is_class: bool,
}

/// CurseForge API client.
pub struct CurseForgeClient {
    /// HTTP client for making requests
    client: Client,
    /// API base URL, no trailing slash
    api_base: String,
    /// Value of the `x-api-key` header
    api_key: String,
    /// Minecraft's game id, discovered lazily
    game_id: OnceCell<u32>,
    /// The "Mods" class id within Minecraft, discovered lazily
    mods_class_id: OnceCell<u32>,
}

// Custom Debug to avoid exposing the API key
impl std::fmt::Debug for CurseForgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurseForgeClient")
            .field("api_base", &self.api_base)
            .field("game_id", &self.game_id.get())
            .field("mods_class_id", &self.mods_class_id.get())
            .finish()
    }
}

impl CurseForgeClient {
    /// Create a client against `api_base` (e.g. `https://api.curseforge.com/v1`).
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            game_id: OnceCell::new(),
            mods_class_id: OnceCell::new(),
        })
    }

    fn headers(&self) -> Result<HeaderMap, RegistryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|_| RegistryError::Transport("API key is not a valid header".into()))?,
        );
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// GET an endpoint. A 404 is `Ok(None)`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, RegistryError> {
        debug!(path, ?query, "registry request");

        let response = self
            .client
            .get(self.url(path))
            .headers(self.headers()?)
            .query(query)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RegistryError::Transport(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    format!("access denied to /{} (check the API key)", path)
                }
                StatusCode::TOO_MANY_REQUESTS => "rate limited".to_string(),
                _ => format!("HTTP {} from /{}", status.as_u16(), path),
            }));
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| RegistryError::Transport(format!("failed to parse /{}: {}", path, e)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RegistryError> {
        self.get_optional(path, query)
            .await?
            .ok_or_else(|| RegistryError::Transport(format!("/{} not found", path)))
    }

    async fn minecraft_id(&self) -> Result<u32, RegistryError> {
        self.game_id
            .get_or_try_init(|| async {
                let games: Envelope<Vec<Game>> = self.get("games", &[]).await?;
                games
                    .data
                    .into_iter()
                    .find(|g| g.slug == "minecraft" || g.name == "Minecraft")
                    .map(|g| g.id)
                    .ok_or_else(|| RegistryError::Transport("Minecraft is not listed".into()))
            })
            .await
            .copied()
    }

    async fn mods_class_id(&self) -> Result<u32, RegistryError> {
        let game_id = self.minecraft_id().await?;
        self.mods_class_id
            .get_or_try_init(|| async {
                let categories: Envelope<Vec<Category>> = self
                    .get(
                        "categories",
                        &[
                            ("gameId", game_id.to_string()),
                            ("classesOnly", "true".to_string()),
                        ],
                    )
                    .await?;
                categories
                    .data
                    .into_iter()
                    .find(|c| c.is_class && c.name == "Mods")
                    .map(|c| c.class_id.unwrap_or(c.id))
                    .ok_or_else(|| RegistryError::Transport("no \"Mods\" class".into()))
            })
            .await
            .copied()
    }

    /// Reject mods that belong to another game.
    async fn for_minecraft(&self, m: Mod, query: String) -> Result<Mod, RegistryError> {
        if m.game_id == self.minecraft_id().await? {
            Ok(m)
        } else {
            debug!(id = m.id, game_id = m.game_id, "mod is for another game");
            Err(RegistryError::ModSearchFailed(query))
        }
    }

    /// Every file of `mod_id` for the target, across all pages.
    async fn list_files(
        &self,
        mod_id: u32,
        game_version: &GameVersion,
        loader: ModLoader,
    ) -> Result<Vec<ModFile>, RegistryError> {
        let path = format!("mods/{}/files", mod_id);
        let mut files = Vec::new();
        let mut index = 0;

        loop {
            let page: Page<ModFile> = self
                .get(
                    &path,
                    &[
                        ("gameVersion", game_version.to_string()),
                        ("modLoaderType", loader.api_id().to_string()),
                        ("index", index.to_string()),
                        ("pageSize", FILES_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.data.len() as u32;
            files.extend(page.data);

            match page.pagination {
                Some(p) if p.result_count > 0 && p.index + p.result_count < p.total_count => {
                    index = p.index + p.result_count;
                }
                None if fetched == FILES_PAGE_SIZE => index += fetched,
                _ => break,
            }
        }

        debug!(mod_id, count = files.len(), "listed files");
        Ok(files)
    }

    async fn fetch_to(&self, url: &str, file: &ModFile, part: &Path) -> Result<(), RegistryError> {
        let io_err = |e: std::io::Error| RegistryError::Io {
            path: part.display().to_string(),
            message: e.to_string(),
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let mut out = tokio::fs::File::create(part).await.map_err(io_err)?;
        let mut hasher = Sha1::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?
        {
            hasher.update(&chunk);
            out.write_all(&chunk).await.map_err(io_err)?;
        }
        out.sync_all().await.map_err(io_err)?;

        if let Some(expected) = file.sha1() {
            let actual = hex::encode(hasher.finalize());
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(RegistryError::HashMismatch {
                    file_name: file.file_name.clone(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        Ok(())
    }
}

/// `<dest>.part`, next to `dest`.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

#[async_trait]
impl Registry for CurseForgeClient {
    fn name(&self) -> &'static str {
        "curseforge"
    }

    async fn search_mod_by_id(&self, id: u32) -> Result<Mod, RegistryError> {
        let found: Option<Envelope<Mod>> = self.get_optional(&format!("mods/{}", id), &[]).await?;
        match found {
            Some(envelope) => self.for_minecraft(envelope.data, id.to_string()).await,
            None => Err(RegistryError::ModSearchFailed(id.to_string())),
        }
    }

    async fn search_mod_by_slug(&self, slug: &Slug) -> Result<Mod, RegistryError> {
        let game_id = self.minecraft_id().await?;
        let class_id = self.mods_class_id().await?;

        let results: Envelope<Vec<Mod>> = self
            .get(
                "mods/search",
                &[
                    ("gameId", game_id.to_string()),
                    ("classId", class_id.to_string()),
                    ("slug", slug.to_string()),
                    ("pageSize", "1".to_string()),
                ],
            )
            .await?;

        match results.data.into_iter().next() {
            Some(m) => self.for_minecraft(m, slug.to_string()).await,
            None => Err(RegistryError::ModSearchFailed(slug.to_string())),
        }
    }

    async fn get_file(
        &self,
        m: &Mod,
        game_version: &GameVersion,
        loader: ModLoader,
        timestamp: Option<&str>,
    ) -> Result<ModFile, RegistryError> {
        let files = self.list_files(m.id, game_version, loader).await?;
        select_file(m, game_version, loader, files, timestamp)
    }

    async fn download(&self, file: &ModFile, dest: &Path) -> Result<(), RegistryError> {
        let url = file
            .download_url
            .as_deref()
            .ok_or_else(|| RegistryError::DownloadUnavailable {
                file_name: file.file_name.clone(),
            })?;

        let part = part_path(dest);
        debug!(url, dest = %dest.display(), "downloading");

        if let Err(e) = self.fetch_to(url, file, &part).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }

        tokio::fs::rename(&part, dest)
            .await
            .map_err(|e| RegistryError::Io {
                path: dest.display().to_string(),
                message: e.to_string(),
            })
    }
}
