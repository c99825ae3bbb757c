//! User profiles, favorites and authentication.

use crate::anime::{Anime, TitleLanguage};
use crate::feed::Story;
use crate::internal::serde::{deserialize_maybe_null_to_default, deserialize_string_or_number};
use crate::library::{LibraryEntry, LibraryStatus};
use crate::{Executor, Hummingbird, Request, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

/// Credentials to acquire an authentication token with. Only one of username and email is
/// required.
#[derive(Clone, Default, Serialize)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn with_username<S1: Into<String>, S2: Into<String>>(username: S1, password: S2) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_email<S1: Into<String>, S2: Into<String>>(email: S1, password: S2) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<hidden>")
            .finish()
    }
}

/// A favorite item of a user.
#[derive(Clone, Debug, Deserialize, Serialize, smart_default::SmartDefault)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct Favorite {
    pub id: u32,
    pub user_id: u32,
    pub item_id: u32,
    /// Type of [`Favorite::item_id`], usually `Anime`.
    pub item_type: String,

    #[default(DateTime::<Utc>::from(std::time::SystemTime::UNIX_EPOCH))]
    pub created_at: DateTime<Utc>,
    #[default(DateTime::<Utc>::from(std::time::SystemTime::UNIX_EPOCH))]
    pub updated_at: DateTime<Utc>,

    pub fav_rank: u32,
}

/// Public profile of a user.
#[derive(Clone, Debug, Deserialize, Serialize, smart_default::SmartDefault, Request)]
#[cfg_attr(feature = "__test_strict", serde(deny_unknown_fields))]
#[serde(default)]
pub struct User {
    #[serde(skip, default = "crate::hummingbird::default_executor")]
    #[default(crate::hummingbird::default_executor())]
    executor: Arc<Executor>,

    pub name: String,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub waifu: String,
    /// Either `Waifu` or `Husbando`.
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub waifu_or_husbando: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub waifu_slug: String,
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub waifu_char_id: String,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub location: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub website: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub avatar: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub cover_image: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub about: String,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub bio: String,

    pub karma: i64,
    /// Minutes.
    pub life_spent_on_anime: u64,
    pub show_adult_content: bool,
    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub title_language_preference: TitleLanguage,
    pub last_library_update: Option<DateTime<Utc>>,

    pub online: bool,
    /// If the authenticated user follows this user.
    pub following: bool,

    #[serde(deserialize_with = "deserialize_maybe_null_to_default")]
    pub favorites: Vec<Favorite>,
}

impl User {
    /// Activity feed of this user.
    pub async fn feed(&self) -> Result<Vec<Story>> {
        user_feed(&self.executor, &self.name).await
    }

    /// Favorite anime of this user, ordered by their rank.
    pub async fn favorite_anime(&self) -> Result<Vec<Anime>> {
        user_favorite_anime(&self.executor, &self.name).await
    }

    /// Library entries of this user with the given status
    /// ([`LibraryStatus::CurrentlyWatching`] if `None`).
    pub async fn library(&self, status: Option<LibraryStatus>) -> Result<Vec<LibraryEntry>> {
        user_library(&self.executor, &self.name, status).await
    }
}

impl Hummingbird {
    /// Acquire an authentication token. The token is cached and used by all library changes which
    /// don't get a token passed explicitly.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let token: String = self
            .executor
            .post("api/v1/users/authenticate")?
            .json(credentials)?
            .request()
            .await?;
        *self.executor.auth_token.write().await = Some(token.clone());
        debug!("cached authentication token");

        Ok(token)
    }

    /// Request the profile of a user.
    pub async fn user<S: AsRef<str>>(&self, name: S) -> Result<User> {
        self.executor
            .get(format!("api/v1/users/{}", name.as_ref()))?
            .request()
            .await
    }

    /// Activity feed of a user.
    pub async fn user_feed<S: AsRef<str>>(&self, name: S) -> Result<Vec<Story>> {
        user_feed(&self.executor, name.as_ref()).await
    }

    /// Favorite anime of a user.
    pub async fn user_favorite_anime<S: AsRef<str>>(&self, name: S) -> Result<Vec<Anime>> {
        user_favorite_anime(&self.executor, name.as_ref()).await
    }

    /// Library entries of a user with the given status ([`LibraryStatus::CurrentlyWatching`] if
    /// `None`).
    pub async fn user_library<S: AsRef<str>>(
        &self,
        name: S,
        status: Option<LibraryStatus>,
    ) -> Result<Vec<LibraryEntry>> {
        user_library(&self.executor, name.as_ref(), status).await
    }
}

async fn user_feed(executor: &Arc<Executor>, name: &str) -> Result<Vec<Story>> {
    executor
        .get(format!("api/v1/users/{}/feed", name))?
        .request()
        .await
}

async fn user_favorite_anime(executor: &Arc<Executor>, name: &str) -> Result<Vec<Anime>> {
    executor
        .get(format!("api/v1/users/{}/favorite_anime", name))?
        .request()
        .await
}

async fn user_library(
    executor: &Arc<Executor>,
    name: &str,
    status: Option<LibraryStatus>,
) -> Result<Vec<LibraryEntry>> {
    executor
        .get(format!("api/v1/users/{}/library", name))?
        .query(&[("status", status.unwrap_or(LibraryStatus::CurrentlyWatching))])?
        .request()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_serialize_all_fields() {
        let credentials = Credentials::with_email("user@example.com", "secret");
        assert_eq!(
            serde_json::to_string(&credentials).unwrap(),
            r#"{"username":"","email":"user@example.com","password":"secret"}"#
        );
        assert!(!format!("{:?}", credentials).contains("secret"))
    }

    #[test]
    fn decode_user() {
        let user: User = serde_json::from_str(
            r#"{
                "name": "erengy",
                "waifu": "Taiga Aisaka",
                "waifu_or_husbando": "Waifu",
                "waifu_slug": "toradora",
                "waifu_char_id": "25930",
                "location": "",
                "website": "http://erengy.com",
                "avatar": "http://static.hummingbird.me/users/avatars/000/002/516/thumb/hb-avatar.jpg?1393289118",
                "cover_image": "http://static.hummingbird.me/users/cover_images/000/002/516/thumb/hummingbird_cover.jpg?1392287635",
                "about": null,
                "bio": "Hi.",
                "karma": 0,
                "life_spent_on_anime": 114520,
                "show_adult_content": true,
                "title_language_preference": "canonical",
                "last_library_update": "2014-06-21T19:28:00.443Z",
                "online": false,
                "following": false,
                "favorites": [{
                    "id": 87118,
                    "user_id": 2516,
                    "item_id": 3936,
                    "item_type": "Anime",
                    "created_at": "2014-04-25T11:50:34.831Z",
                    "updated_at": "2014-04-25T11:50:34.831Z",
                    "fav_rank": 9999
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(user.name, "erengy");
        assert!(user.avatar.ends_with("hb-avatar.jpg?1393289118"));
        assert_eq!(user.about, "");
        assert_eq!(user.title_language_preference, TitleLanguage::Canonical);
        assert_eq!(
            user.last_library_update.unwrap().to_rfc3339(),
            "2014-06-21T19:28:00.443+00:00"
        );
        assert_eq!(user.favorites.len(), 1);
        assert_eq!(user.favorites[0].item_id, 3936);
        assert_eq!(user.favorites[0].fav_rank, 9999);
    }
}
