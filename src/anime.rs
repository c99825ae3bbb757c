//! Anime lookup and search.

use crate::internal::serde::{deserialize_empty_string_to_none, deserialize_maybe_null_to_default};
use crate::library::{LibraryEntry, LibraryEntryUpdate};
use crate::{enum_values, Executor, Hummingbird, Request, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

enum_values! {
    /// Language in which titles are returned.
    pub enum TitleLanguage {
        Canonical = "canonical"
        English = "english"
        Romanized = "romanized"
    }
}

enum_values! {
    pub enum AiringStatus {
        NotYetAired = "Not Yet Aired"
        CurrentlyAiring = "Currently Airing"
        FinishedAiring = "Finished Airing"
    }
}

enum_values! {
    pub enum ShowType {
        Tv = "TV"
        Movie = "Movie"
        Ova = "OVA"
        Ona = "ONA"
        Special = "Special"
        Music = "Music"
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct Genre {
    pub name: String,
}

/// Metadata of an anime.
#[derive(Clone, Debug, Deserialize, Serialize, smart_default::SmartDefault, Request)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct Anime {
    #[serde(skip, default = "crate::hummingbird::default_executor")]
    #[default(crate::hummingbird::default_executor())]
    executor: Arc<Executor>,

    pub id: u32,
    pub slug: String,
    pub url: String,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub status: AiringStatus,

    pub title: String,
    /// Title in the language which wasn't chosen as title language. Often empty.
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub alternate_title: String,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub episode_count: u32,
    /// Length of a single episode in minutes.
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub episode_length: u32,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub cover_image: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub synopsis: String,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub show_type: ShowType,

    /// `None` if the anime hasn't aired yet.
    #[serde(deserialize_with = "deserialize_empty_string_to_none")]
    pub started_airing: Option<NaiveDate>,
    /// `None` if the anime is still airing (or hasn't started yet).
    #[serde(deserialize_with = "deserialize_empty_string_to_none")]
    pub finished_airing: Option<NaiveDate>,

    /// Average rating between 0 and 5.
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub community_rating: f64,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub age_rating: String,

    /// Empty if the anime was returned by [`Hummingbird::search_anime`].
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub genres: Vec<Genre>,

    /// Only set if the anime was requested as favorite of a user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fav_id: Option<u32>,
    /// Only set if the anime was requested as favorite of a user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fav_rank: Option<u32>,
}

impl Anime {
    /// Add this anime to the library of the authenticated user or update the existing entry.
    pub async fn update_library_entry(
        &self,
        update: LibraryEntryUpdate,
        auth_token: Option<&str>,
    ) -> Result<LibraryEntry> {
        let id = self.library_id()?;
        crate::library::update_library_entry(&self.executor, &id, update, auth_token).await
    }

    /// Id to address this anime in library endpoints. The slug is preferred, the numeric id is
    /// used if the slug is missing.
    pub(crate) fn library_id(&self) -> Result<String> {
        if !self.slug.is_empty() {
            Ok(self.slug.clone())
        } else if self.id != 0 {
            Ok(self.id.to_string())
        } else {
            Err(crate::error::Error::Input(
                "anime has neither a slug nor an id".into(),
            ))
        }
    }
}

impl Hummingbird {
    /// Request metadata of an anime by its id or slug. The title is returned in `title_language`,
    /// the api uses [`TitleLanguage::Canonical`] if none is given.
    pub async fn anime<S: AsRef<str>>(
        &self,
        id: S,
        title_language: Option<TitleLanguage>,
    ) -> Result<Anime> {
        let mut builder = self
            .executor
            .get(format!("api/v1/anime/{}", id.as_ref()))?;
        if let Some(title_language) = title_language {
            builder = builder.query(&[("title_language_preference", title_language)])?;
        }
        builder.request().await
    }

    /// Search anime by title. The search is fuzzy and returns at most 5 results, without genres.
    pub async fn search_anime<S: AsRef<str>>(&self, query: S) -> Result<Vec<Anime>> {
        self.executor
            .get("api/v1/search/anime")?
            .query(&[("query", query.as_ref())])?
            .request()
            .await
    }
}
