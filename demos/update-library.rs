use hummingbird_rs::library::{LibraryEntryUpdate, LibraryStatus};
use hummingbird_rs::user::Credentials;
use hummingbird_rs::Hummingbird;
use tracing_subscriber::EnvFilter;

/// Increments the watched episodes of every anime the user currently watches. Credentials are
/// read from `HUMMINGBIRD_USERNAME` and `HUMMINGBIRD_PASSWORD`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let username = std::env::var("HUMMINGBIRD_USERNAME")?;
    let password = std::env::var("HUMMINGBIRD_PASSWORD")?;

    let hummingbird = Hummingbird::builder()
        .login_with_credentials(&Credentials::with_username(&username, password))
        .await?;

    let user = hummingbird.user(&username).await?;
    for entry in user.library(Some(LibraryStatus::CurrentlyWatching)).await? {
        let updated = entry
            .update(LibraryEntryUpdate::default().increment_episodes(true), None)
            .await?;
        let title = updated
            .anime
            .as_ref()
            .map(|anime| anime.title.as_str())
            .unwrap_or_default();
        println!("{}: {} episodes watched", title, updated.episodes_watched)
    }

    Ok(())
}
