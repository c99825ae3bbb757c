//! # hummingbird-rs
//!
//! A typed, async library for the [hummingbird.me](https://hummingbird.me) api v1, completely
//! written in Rust.
//!
//! Anime metadata, user profiles, feeds, favorites and libraries can be requested without an
//! account. Changing a library requires an authentication token which can be acquired with
//! [`Hummingbird::authenticate`] (or [`HummingbirdBuilder::login_with_credentials`]).
//!
//! # Getting started
//!
//! ```no_run
//! use hummingbird_rs::Hummingbird;
//!
//! # #[tokio::main]
//! # async fn main() -> hummingbird_rs::error::Result<()> {
//! let hummingbird = Hummingbird::builder().build();
//!
//! for anime in hummingbird.search_anime("log horizon").await? {
//!     println!("{} ({})", anime.title, anime.slug)
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Structs which were returned by a request keep a reference to the [`Hummingbird`] instance
//! they were requested with, so follow-up requests can be made directly on them:
//!
//! ```no_run
//! use hummingbird_rs::library::{LibraryEntryUpdate, LibraryStatus};
//! use hummingbird_rs::user::Credentials;
//! use hummingbird_rs::Hummingbird;
//!
//! # #[tokio::main]
//! # async fn main() -> hummingbird_rs::error::Result<()> {
//! let hummingbird = Hummingbird::builder()
//!     .login_with_credentials(&Credentials::with_username("user", "password"))
//!     .await?;
//!
//! let user = hummingbird.user("user").await?;
//! for entry in user.library(Some(LibraryStatus::CurrentlyWatching)).await? {
//!     entry
//!         .update(LibraryEntryUpdate::default().increment_episodes(true), None)
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Raw responses
//! Resource methods like [`Hummingbird::anime`] only return the decoded value. If the status or
//! headers of a successful response are needed, build the request with [`Hummingbird::request`]
//! and send it with [`Hummingbird::execute`], which returns the [`ApiResponse`] alongside the
//! value. Failed requests carry their response in [`error::Error::response`].
//!
//! # Features
//! - `parse` (default): [`parse::parse_url`] to extract ids out of hummingbird.me urls.
//! - `tower`: send all requests through a [`tower_service::Service`], see
//!   [`HummingbirdBuilder::middleware`].
//!
//! # Logging
//! Every request runs in an `api_request` [`tracing`] span. The library doesn't install a
//! subscriber itself.

pub mod anime;
pub mod common;
pub mod error;
pub mod feed;
pub mod hummingbird;
pub mod library;
#[cfg(feature = "parse")]
#[cfg_attr(docsrs, doc(cfg(feature = "parse")))]
pub mod parse;
pub mod user;

// internal
mod internal;
mod macros;

// internal
pub(crate) use common::Request;
pub(crate) use error::Result;
pub(crate) use hummingbird::Executor;
pub(crate) use macros::{enum_values, options};

pub use anime::Anime;
pub use hummingbird::{ApiRequest, ApiResponse, Hummingbird, HummingbirdBuilder};
pub use library::LibraryEntry;
pub use user::User;
