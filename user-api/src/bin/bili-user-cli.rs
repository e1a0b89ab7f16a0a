use bilibili_user::{Client, Credential, RequesterConfig, UserProfile, VideoOrder};
use eyre::Context;
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

async fn read_json_if_exists<T>(path: &str) -> eyre::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("check for {path}"))?
    {
        return Ok(T::default());
    }
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {path}"))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let uid: u64 = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre::eyre!("usage: bili-user-cli <uid>"))?
        .parse()
        .context("parse uid")?;

    let credential_path =
        std::env::var("BILI_CREDENTIAL").unwrap_or_else(|_| "credential.json".to_string());
    let credential: Credential = read_json_if_exists(&credential_path).await?;
    let config: RequesterConfig = read_json_if_exists("requester.json").await?;

    let client = Client::reqwest(config).context("build HTTP client")?;
    let user = UserProfile::with_credential(uid, Arc::new(credential), client);

    let info = user.get_user_info().await.context("fetch user info")?;
    eprintln!("==> {} ({uid})", info["name"]);

    let relation = user
        .get_relation_info()
        .await
        .context("fetch relation info")?;
    eprintln!(
        "following {}, followers {}",
        relation["following"], relation["follower"]
    );

    let videos = user
        .get_videos(0, 1, 5, "", VideoOrder::Pubdate)
        .await
        .context("fetch latest videos")?;
    if let Some(list) = videos.pointer("/list/vlist").and_then(|v| v.as_array()) {
        for video in list {
            eprintln!("video    : {} {}", video["bvid"], video["title"]);
        }
    }

    for channel in user.get_channels().await.context("fetch channels")? {
        eprintln!(
            "{:<9}: {} {}",
            channel.kind().to_string(),
            channel.id(),
            channel.meta()["name"]
        );
    }

    // only the first page or so; the feed can go back years
    let dynamics = user.dynamics_stream(false).take(10);
    let mut dynamics = std::pin::pin!(dynamics);
    while let Some(card) = dynamics.next().await {
        let card = card.context("fetch dynamic")?;
        eprintln!("dynamic  : {}", card["desc"]["dynamic_id"]);
    }

    Ok(())
}
