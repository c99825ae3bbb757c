//! User activity feeds.

use crate::anime::Anime;
use crate::internal::serde::{deserialize_maybe_null_to_default, deserialize_string_or_number};
use crate::library::LibraryStatus;
use crate::{enum_values, Request};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

enum_values! {
    pub enum StoryType {
        Comment = "comment"
        MediaStory = "media_story"
    }
}

enum_values! {
    pub enum SubstoryType {
        WatchlistStatusUpdate = "watchlist_status_update"
        WatchedEpisode = "watched_episode"
        Comment = "comment"
        Reply = "reply"
    }
}

/// User as it's embedded in feed stories.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct StoryUser {
    pub name: String,
    pub url: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub avatar: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub avatar_small: String,
    /// If the user is not a beginner.
    pub nb: bool,
}

/// A single activity of a [`Story`].
#[derive(Clone, Debug, Deserialize, Serialize, smart_default::SmartDefault)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct Substory {
    pub id: u64,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub substory_type: SubstoryType,
    #[default(DateTime::<Utc>::from(std::time::SystemTime::UNIX_EPOCH))]
    pub created_at: DateTime<Utc>,

    /// Only set for [`SubstoryType::Comment`] and [`SubstoryType::Reply`].
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub comment: String,
    /// Only set for [`SubstoryType::WatchedEpisode`].
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub episode_number: String,
    /// Only set for [`SubstoryType::WatchlistStatusUpdate`].
    pub new_status: Option<LibraryStatus>,
    /// Service the activity was tracked with, if any.
    pub service: Option<String>,
}

/// An entry in the activity feed of a user.
#[derive(Clone, Debug, Deserialize, Serialize, smart_default::SmartDefault, Request)]
#[request(executor(media))]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct Story {
    pub id: u64,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub story_type: StoryType,
    pub user: StoryUser,
    #[default(DateTime::<Utc>::from(std::time::SystemTime::UNIX_EPOCH))]
    pub updated_at: DateTime<Utc>,

    /// If a comment was posted by the user on its own profile.
    pub self_post: bool,
    /// Author of a comment. Differs from [`Story::user`] if the comment was posted on another
    /// profile.
    pub poster: Option<StoryUser>,

    /// The anime a [`StoryType::MediaStory`] is about.
    pub media: Option<Anime>,

    pub substories_count: u32,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub substories: Vec<Substory>,
}
