//! services/api/src/adapters/google_books.rs
//!
//! Book metadata adapter backed by the Google Books volumes API. One
//! candidate per category: the first volume of a subject search, language
//! restricted.

use async_trait::async_trait;
use serde::Deserialize;

use bookquest_core::domain::Book;
use bookquest_core::ports::{BookMetadataProvider, PortError, PortResult};

/// A metadata adapter that implements the `BookMetadataProvider` port.
#[derive(Clone)]
pub struct GoogleBooks {
    client: reqwest::Client,
    base_url: String,
    lang: String,
}

impl GoogleBooks {
    pub fn new(client: reqwest::Client, base_url: String, lang: String) -> Self {
        Self {
            client,
            base_url,
            lang,
        }
    }
}

//=========================================================================================
// Wire Format
//=========================================================================================

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: String,
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    info_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

#[async_trait]
impl BookMetadataProvider for GoogleBooks {
    async fn find_by_category(&self, category: &str) -> PortResult<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/volumes", self.base_url))
            .query(&[
                ("q", format!("subject:{category}")),
                ("langRestrict", self.lang.clone()),
                ("maxResults", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Upstream(format!(
                "google books returned {}",
                response.status()
            )));
        }

        let parsed: VolumesResponse = response
            .json()
            .await
            .map_err(|e| PortError::Upstream(e.to_string()))?;

        let Some(volume) = parsed.items.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        let info = volume.volume_info;
        let cover_url = info
            .image_links
            .and_then(|links| links.thumbnail)
            // Google Books often returns http links; upgrade them.
            .map(|thumbnail| thumbnail.replace("http://", "https://"))
            .unwrap_or_default();

        Ok(Some(Book {
            id: volume.id,
            title: info
                .title
                .unwrap_or_else(|| "Título desconhecido".to_string()),
            author: info
                .authors
                .map(|authors| authors.join(", "))
                .unwrap_or_else(|| "Autor desconhecido".to_string()),
            cover_url,
            description: info
                .description
                .unwrap_or_else(|| "Sem descrição disponível".to_string()),
            link: info.info_link.unwrap_or_default(),
        }))
    }
}
