use hummingbird_rs::anime::TitleLanguage;
use hummingbird_rs::Hummingbird;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let query = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: search-anime <query>"))?;

    let hummingbird = Hummingbird::builder().build();
    for result in hummingbird.search_anime(&query).await? {
        let anime = hummingbird
            .anime(&result.slug, Some(TitleLanguage::English))
            .await?;
        println!(
            "{} ({}, {} episodes, rated {:.2})",
            anime.title, anime.show_type, anime.episode_count, anime.community_rating
        );
        if !anime.genres.is_empty() {
            let genres: Vec<_> = anime.genres.iter().map(|g| g.name.as_str()).collect();
            println!("  {}", genres.join(", "))
        }
    }

    Ok(())
}
