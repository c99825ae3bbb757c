use once_cell::sync::Lazy;
use regex::Regex;

static ANIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?hummingbird\.me/anime/(?P<slug>[^/?#]+)/?([?#].*)?$").unwrap()
});
static USER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?hummingbird\.me/users/(?P<name>[^/?#]+)(?P<library>/library)?/?([?#].*)?$")
        .unwrap()
});

/// Types of hummingbird.me urls, pointing to anime, user profiles or libraries.
#[cfg_attr(docsrs, doc(cfg(feature = "parse")))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlType {
    /// The parsed url points to an anime. Use [`crate::Hummingbird::anime`] with the value of this
    /// field to get a usable struct out of it.
    Anime(String),
    /// The parsed url points to a user profile. Use [`crate::Hummingbird::user`] with the value of
    /// this field.
    User(String),
    /// The parsed url points to the library of a user. Use [`crate::Hummingbird::user_library`]
    /// with the value of this field.
    Library(String),
}

/// Extract information out of hummingbird.me urls which are pointing to anime, users or user
/// libraries.
#[cfg_attr(docsrs, doc(cfg(feature = "parse")))]
pub fn parse_url<S: AsRef<str>>(url: S) -> Option<UrlType> {
    if let Some(capture) = ANIME_REGEX.captures(url.as_ref()) {
        Some(UrlType::Anime(capture.name("slug")?.as_str().to_string()))
    } else if let Some(capture) = USER_REGEX.captures(url.as_ref()) {
        let name = capture.name("name")?.as_str().to_string();
        if capture.name("library").is_some() {
            Some(UrlType::Library(name))
        } else {
            Some(UrlType::User(name))
        }
    } else {
        None
    }
}
