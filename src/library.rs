//! Library entries and their modification.

use crate::anime::Anime;
use crate::error::Error;
use crate::internal::serde::deserialize_maybe_null_to_default;
use crate::{enum_values, options, Executor, Hummingbird, Request, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

enum_values! {
    /// Status of an anime in a users' library.
    pub enum LibraryStatus {
        CurrentlyWatching = "currently-watching"
        PlanToWatch = "plan-to-watch"
        Completed = "completed"
        OnHold = "on-hold"
        Dropped = "dropped"
    }
}

enum_values! {
    pub enum Privacy {
        Public = "public"
        Private = "private"
    }
}

enum_values! {
    pub enum RatingType {
        Simple = "simple"
        Advanced = "advanced"
    }
}

enum_values! {
    /// Value of a [`RatingType::Simple`] rating.
    pub enum SimpleRating {
        Negative = "negative"
        Neutral = "neutral"
        Positive = "positive"
    }
}

/// Rating of a library entry. The representation of [`LibraryEntryRating::value`] depends on
/// [`LibraryEntryRating::rating_type`]: a [`SimpleRating`] if it's [`RatingType::Simple`], a
/// number between `0.0` and `5.0` if it's [`RatingType::Advanced`].
///
/// Conversion between both:
/// - `0 ..= 2.4` is [`SimpleRating::Negative`]
/// - `2.4 < x < 3.6` is [`SimpleRating::Neutral`]
/// - `3.6 ..= 5` is [`SimpleRating::Positive`]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct LibraryEntryRating {
    #[serde(rename = "type")]
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub rating_type: RatingType,
    /// `None` if the entry isn't rated.
    pub value: Option<String>,
}

impl LibraryEntryRating {
    /// The rating as [`SimpleRating`]. `None` if the entry isn't rated or the value can't be
    /// interpreted.
    pub fn simple(&self) -> Option<SimpleRating> {
        let value = self.value.as_deref()?;
        match self.rating_type {
            RatingType::Simple => match SimpleRating::from(value) {
                SimpleRating::Custom(_) => None,
                simple => Some(simple),
            },
            RatingType::Advanced => {
                let advanced = value.trim().parse::<f64>().ok()?;
                Some(if advanced <= 2.4 {
                    SimpleRating::Negative
                } else if advanced < 3.6 {
                    SimpleRating::Neutral
                } else {
                    SimpleRating::Positive
                })
            }
            RatingType::Custom(_) => None,
        }
    }

    /// The rating as number between `0.0` and `5.0`. `None` if the entry isn't rated or the value
    /// can't be interpreted.
    pub fn advanced(&self) -> Option<f64> {
        let value = self.value.as_deref()?;
        match self.rating_type {
            RatingType::Simple => match SimpleRating::from(value) {
                SimpleRating::Negative => Some(1.0),
                SimpleRating::Neutral => Some(3.0),
                SimpleRating::Positive => Some(5.0),
                SimpleRating::Custom(_) => None,
            },
            RatingType::Advanced => value.trim().parse().ok(),
            RatingType::Custom(_) => None,
        }
    }
}

/// An anime in the library of a user.
#[derive(Clone, Debug, Deserialize, Serialize, smart_default::SmartDefault, Request)]
#[request(executor(anime))]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct LibraryEntry {
    #[serde(skip, default = "crate::hummingbird::default_executor")]
    #[default(crate::hummingbird::default_executor())]
    executor: Arc<Executor>,

    pub id: u64,
    pub episodes_watched: u32,
    pub last_watched: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub rewatched_times: u32,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub notes: String,
    pub notes_present: bool,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub status: LibraryStatus,
    pub private: bool,
    pub rewatching: bool,

    pub anime: Option<Anime>,
    pub rating: Option<LibraryEntryRating>,
}

impl LibraryEntry {
    /// Update this entry. The token is taken from `auth_token` or, if `None`, the token cached by
    /// the [`Hummingbird`] instance this entry was requested with.
    pub async fn update(
        &self,
        update: LibraryEntryUpdate,
        auth_token: Option<&str>,
    ) -> Result<LibraryEntry> {
        update_library_entry(&self.executor, &self.anime_id()?, update, auth_token).await
    }

    /// Remove this entry from the library. Returns whether the api removed it.
    pub async fn remove(self, auth_token: Option<&str>) -> Result<bool> {
        remove_library_entry(&self.executor, &self.anime_id()?, auth_token).await
    }

    fn anime_id(&self) -> Result<String> {
        match &self.anime {
            Some(anime) => anime.library_id(),
            None => Err(Error::Input("library entry has no anime".into())),
        }
    }
}

options! {
    /// Changes to a library entry. Only fields which are set are sent to the api.
    LibraryEntryUpdate;
    status(LibraryStatus, "status") = None,
    privacy(Privacy, "privacy") = None,
    /// Rating between `0.0` and `5.0` (in steps of `0.5`). Sending the current rating again
    /// removes it unless [`LibraryEntryUpdate::sane_rating_update`] is set.
    rating(f32, "rating") = None,
    /// Set the rating to exactly [`LibraryEntryUpdate::rating`] instead of toggling it.
    sane_rating_update(f32, "sane_rating_update") = None,
    rewatching(bool, "rewatching") = None,
    rewatched_times(u32, "rewatched_times") = None,
    notes(String, "notes") = None,
    episodes_watched(u32, "episodes_watched") = None,
    /// Increment [`LibraryEntry::episodes_watched`] by one (ignoring
    /// [`LibraryEntryUpdate::episodes_watched`] if set).
    increment_episodes(bool, "increment_episodes") = None
}

#[derive(Serialize)]
struct LibraryEntryUpdateBody<'a> {
    id: &'a str,
    auth_token: String,
    #[serde(flatten)]
    update: &'a LibraryEntryUpdate,
}

#[derive(Serialize)]
struct LibraryEntryRemoveBody<'a> {
    id: &'a str,
    auth_token: String,
}

impl Hummingbird {
    /// Create or update the library entry of an anime (by id or slug). The token is taken from
    /// `auth_token` or, if `None`, from the cached one.
    pub async fn update_library_entry<S: AsRef<str>>(
        &self,
        id: S,
        update: LibraryEntryUpdate,
        auth_token: Option<&str>,
    ) -> Result<LibraryEntry> {
        update_library_entry(&self.executor, id.as_ref(), update, auth_token).await
    }

    /// Remove the library entry of an anime (by id or slug). Returns whether the api removed it.
    pub async fn remove_library_entry<S: AsRef<str>>(
        &self,
        id: S,
        auth_token: Option<&str>,
    ) -> Result<bool> {
        remove_library_entry(&self.executor, id.as_ref(), auth_token).await
    }
}

pub(crate) async fn update_library_entry(
    executor: &Arc<Executor>,
    id: &str,
    update: LibraryEntryUpdate,
    auth_token: Option<&str>,
) -> Result<LibraryEntry> {
    let auth_token = executor
        .resolve_auth_token(auth_token.map(str::to_string))
        .await;
    let body = LibraryEntryUpdateBody {
        id,
        auth_token,
        update: &update,
    };

    executor
        .post(format!("api/v1/libraries/{}", id))?
        .json(&body)?
        .request()
        .await
}

pub(crate) async fn remove_library_entry(
    executor: &Arc<Executor>,
    id: &str,
    auth_token: Option<&str>,
) -> Result<bool> {
    let auth_token = executor
        .resolve_auth_token(auth_token.map(str::to_string))
        .await;

    executor
        .post(format!("api/v1/libraries/{}/remove", id))?
        .json(&LibraryEntryRemoveBody { id, auth_token })?
        .request()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(rating_type: RatingType, value: &str) -> LibraryEntryRating {
        LibraryEntryRating {
            rating_type,
            value: Some(value.to_string()),
        }
    }

    #[test]
    fn advanced_to_simple() {
        for (value, expected) in [
            ("0.0", SimpleRating::Negative),
            ("2.4", SimpleRating::Negative),
            ("2.5", SimpleRating::Neutral),
            ("3.5", SimpleRating::Neutral),
            ("3.6", SimpleRating::Positive),
            ("5.0", SimpleRating::Positive),
        ] {
            assert_eq!(
                rating(RatingType::Advanced, value).simple(),
                Some(expected),
                "{value}"
            )
        }
    }

    #[test]
    fn simple_to_advanced() {
        assert_eq!(rating(RatingType::Simple, "negative").advanced(), Some(1.0));
        assert_eq!(rating(RatingType::Simple, "neutral").advanced(), Some(3.0));
        assert_eq!(rating(RatingType::Simple, "positive").advanced(), Some(5.0));
        assert_eq!(rating(RatingType::Simple, "awesome").advanced(), None);
        assert_eq!(rating(RatingType::Advanced, "4.5").advanced(), Some(4.5));
    }

    #[test]
    fn unknown_rating_type_is_not_converted() {
        assert_eq!(rating(RatingType::default(), "3.5").simple(), None);
        assert_eq!(rating(RatingType::default(), "3.5").advanced(), None);
        assert_eq!(
            rating(RatingType::Custom("stars".to_string()), "positive").advanced(),
            None
        );
    }

    #[test]
    fn unrated_entry() {
        let rating: LibraryEntryRating =
            serde_json::from_str(r#"{"type":"advanced","value":null}"#).unwrap();
        assert_eq!(rating.rating_type, RatingType::Advanced);
        assert_eq!(rating.simple(), None);
        assert_eq!(rating.advanced(), None);
    }

    #[test]
    fn update_body_field_order() {
        let update = LibraryEntryUpdate::default()
            .episodes_watched(3u32)
            .increment_episodes(true);
        let body = LibraryEntryUpdateBody {
            id: "log-horizon",
            auth_token: "T".to_string(),
            update: &update,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"id":"log-horizon","auth_token":"T","episodes_watched":3,"increment_episodes":true}"#
        )
    }

    #[test]
    fn empty_update_only_sends_id_and_token() {
        let update = LibraryEntryUpdate::default();
        let body = LibraryEntryUpdateBody {
            id: "1",
            auth_token: "".to_string(),
            update: &update,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"id":"1","auth_token":""}"#
        )
    }

    #[test]
    fn entry_without_anime_cannot_be_changed() {
        assert!(matches!(
            LibraryEntry::default().anime_id(),
            Err(Error::Input(_))
        ))
    }
}
