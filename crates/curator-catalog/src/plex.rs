//! Plex Media Server catalog over HTTP.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::model::{
    CatalogEntry, CollectionRef, EntryId, EpisodeEntry, SeasonEntry, SectionInfo, SectionKind,
};

const CLIENT_IDENTIFIER: &str = "curator";
const COLLECTION_TYPE: &str = "18";

/// [`Catalog`] backed by a Plex Media Server.
#[derive(Debug)]
pub struct PlexCatalog {
    client: Client,
    base_url: Url,
    token: String,
    machine_id: OnceCell<String>,
}

impl PlexCatalog {
    /// Connect to a server with an API token.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, Duration::from_secs(30))
    }

    /// Connect with a custom request timeout.
    pub fn with_timeout(base_url: &str, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token: token.into(),
            machine_id: OnceCell::new(),
        })
    }

    /// Server URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CatalogError::InvalidUrl {
                url: path.to_string(),
                message: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Plex-Token", &self.token)
            .header("X-Plex-Client-Identifier", CLIENT_IDENTIFIER)
            .header("X-Plex-Product", CLIENT_IDENTIFIER)
            .header("Accept", "application/json")
    }

    fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response> {
        let response = self.request(builder).send()?;
        let status = response.status();
        debug!(%status, path = url.path(), "plex request");
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::not_found(url.path().to_string()));
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.path().to_string(),
            });
        }
        Ok(response)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path, query)?;
        let body = self.send(self.client.get(url.clone()), &url)?.text()?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.media_container)
    }

    fn put(&self, path: &str, query: &[(&str, &str)]) -> Result<()> {
        let url = self.url(path, query)?;
        self.send(self.client.put(url.clone()), &url)?;
        Ok(())
    }

    fn machine_id(&self) -> Result<String> {
        if let Some(id) = self.machine_id.get() {
            return Ok(id.clone());
        }
        let identity: IdentityPayload = self.get("/", &[])?;
        let _ = self.machine_id.set(identity.machine_identifier.clone());
        Ok(identity.machine_identifier)
    }

    fn metadata_uri(&self, members: &[EntryId]) -> Result<String> {
        let ids = join_ids(members);
        Ok(format!(
            "server://{}/com.plexapp.plugins.library/library/metadata/{ids}",
            self.machine_id()?
        ))
    }
}

impl Catalog for PlexCatalog {
    fn sections(&self) -> Result<Vec<SectionInfo>> {
        let container: DirectoryContainer = self.get("/library/sections", &[])?;
        Ok(container.directory.into_iter().map(SectionPayload::into_section).collect())
    }

    fn entries(&self, section: &SectionInfo) -> Result<Vec<CatalogEntry>> {
        let container: MetadataContainer =
            self.get(&format!("/library/sections/{}/all", section.id), &[])?;
        Ok(container.into_entries())
    }

    fn seasons(&self, show: &EntryId) -> Result<Vec<SeasonEntry>> {
        let container: MetadataContainer =
            self.get(&format!("/library/metadata/{show}/children"), &[])?;
        Ok(container.into_seasons())
    }

    fn episodes(&self, season: &EntryId) -> Result<Vec<EpisodeEntry>> {
        let container: MetadataContainer =
            self.get(&format!("/library/metadata/{season}/children"), &[])?;
        Ok(container.into_episodes())
    }

    fn split(&self, id: &EntryId) -> Result<()> {
        self.put(&format!("/library/metadata/{id}/split"), &[])
    }

    fn merge(&self, survivor: &EntryId, others: &[EntryId]) -> Result<()> {
        if others.is_empty() {
            return Ok(());
        }
        let ids = join_ids(others);
        self.put(&format!("/library/metadata/{survivor}/merge"), &[("ids", ids.as_str())])
    }

    fn collection_by_name(&self, section: &SectionInfo, name: &str) -> Result<CollectionRef> {
        let container: MetadataContainer =
            self.get(&format!("/library/sections/{}/collections", section.id), &[])?;
        container
            .metadata
            .into_iter()
            .find(|item| item.title == name)
            .map(|item| CollectionRef {
                id: EntryId(item.rating_key),
                title: item.title,
                section_id: section.id.clone(),
            })
            .ok_or_else(|| CatalogError::not_found(format!("collection '{name}'")))
    }

    fn create_collection(
        &self,
        section: &SectionInfo,
        name: &str,
        members: &[EntryId],
    ) -> Result<CollectionRef> {
        let item_type = match section.kind {
            SectionKind::Show => "2",
            _ => "1",
        };
        let uri = self.metadata_uri(members)?;
        let url = self.url(
            "/library/collections",
            &[
                ("type", item_type),
                ("title", name),
                ("smart", "0"),
                ("sectionId", section.id.as_str()),
                ("uri", uri.as_str()),
            ],
        )?;
        let body = self.send(self.client.post(url.clone()), &url)?.text()?;
        let envelope: Envelope<MetadataContainer> = serde_json::from_str(&body)?;
        let created = envelope
            .media_container
            .metadata
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::InvalidResponse {
                message: format!("collection '{name}' was not returned after creation"),
            })?;
        Ok(CollectionRef {
            id: EntryId(created.rating_key),
            title: created.title,
            section_id: section.id.clone(),
        })
    }

    fn add_to_collection(&self, collection: &CollectionRef, members: &[EntryId]) -> Result<()> {
        if members.is_empty() {
            return Ok(());
        }
        let uri = self.metadata_uri(members)?;
        self.put(
            &format!("/library/collections/{}/items", collection.id),
            &[("uri", uri.as_str())],
        )
    }

    fn upload_poster(&self, target: &EntryId, file: &Path) -> Result<()> {
        let bytes = std::fs::read(file).map_err(|source| CatalogError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let url = self.url(&format!("/library/metadata/{target}/posters"), &[])?;
        self.send(self.client.post(url.clone()).body(bytes), &url)?;
        Ok(())
    }

    fn set_sort_title(&self, collection: &CollectionRef, value: &str) -> Result<()> {
        self.put(
            &format!("/library/sections/{}/all", collection.section_id),
            &[
                ("type", COLLECTION_TYPE),
                ("id", collection.id.as_str()),
                ("titleSort.value", value),
                ("titleSort.locked", "1"),
            ],
        )
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut text = base_url.trim().to_string();
    if !text.ends_with('/') {
        text.push('/');
    }
    let url = Url::parse(&text).map_err(|e| CatalogError::InvalidUrl {
        url: base_url.to_string(),
        message: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(CatalogError::InvalidUrl {
            url: base_url.to_string(),
            message: "not a base URL".to_string(),
        });
    }
    Ok(url)
}

fn join_ids(ids: &[EntryId]) -> String {
    ids.iter().map(EntryId::as_str).collect::<Vec<_>>().join(",")
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    media_container: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityPayload {
    machine_identifier: String,
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryContainer {
    #[serde(rename = "Directory", default)]
    directory: Vec<SectionPayload>,
}

#[derive(Debug, Deserialize)]
struct SectionPayload {
    key: String,
    title: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "Location", default)]
    location: Vec<LocationPayload>,
}

impl SectionPayload {
    fn into_section(self) -> SectionInfo {
        SectionInfo {
            id: self.key,
            title: self.title,
            kind: SectionKind::from_type(&self.kind),
            locations: self.location.into_iter().map(|l| PathBuf::from(l.path)).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocationPayload {
    path: String,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<MetadataPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataPayload {
    rating_key: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    index: Option<u32>,
    #[serde(default)]
    parent_title: Option<String>,
    #[serde(rename = "Media", default)]
    media: Vec<MediaPayload>,
    #[serde(rename = "Location", default)]
    location: Vec<LocationPayload>,
}

impl MetadataPayload {
    /// Files of every media part, or the folder locations for shows.
    fn locations(&self) -> Vec<PathBuf> {
        let parts: Vec<PathBuf> = self
            .media
            .iter()
            .flat_map(|media| media.part.iter())
            .map(|part| PathBuf::from(&part.file))
            .collect();
        if parts.is_empty() {
            self.location.iter().map(|l| PathBuf::from(&l.path)).collect()
        } else {
            parts
        }
    }
}

#[derive(Debug, Deserialize)]
struct MediaPayload {
    #[serde(rename = "Part", default)]
    part: Vec<PartPayload>,
}

#[derive(Debug, Deserialize)]
struct PartPayload {
    file: String,
}

impl MetadataContainer {
    fn into_entries(self) -> Vec<CatalogEntry> {
        self.metadata
            .into_iter()
            .map(|item| CatalogEntry {
                locations: item.locations(),
                id: EntryId(item.rating_key),
                title: item.title,
            })
            .collect()
    }

    fn into_seasons(self) -> Vec<SeasonEntry> {
        self.metadata
            .into_iter()
            .map(|item| SeasonEntry {
                id: EntryId(item.rating_key),
                number: item.index.unwrap_or(0),
                show_title: item.parent_title.unwrap_or_default(),
            })
            .collect()
    }

    fn into_episodes(self) -> Vec<EpisodeEntry> {
        self.metadata
            .into_iter()
            .map(|item| EpisodeEntry {
                locations: item.locations(),
                id: EntryId(item.rating_key),
                title: item.title,
            })
            .collect()
    }
}
