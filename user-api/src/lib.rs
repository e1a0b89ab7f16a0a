//! Typed async access to the bilibili user endpoints.
//!
//! # Layers
//!
//! A [`UserProfile`] pairs a user id with the [`Credential`] of whoever is asking, and exposes
//! one async method per endpoint. Each method builds a [`compose::Operation`], which the
//! [`compose::RequestComposer`] checks against the credential and resolves through an
//! [`ApiCatalog`] into a request. A [`Requester`] sends it, and the payload is reshaped by
//! [`normalize`] where the upstream format is awkward to consume (embedded JSON strings,
//! collections spread over two lists).
//!
//! Nothing here retries, caches (beyond the caller's own profile, see
//! [`UserProfile::get_self_info`]) or rate-limits. The only built-in pause is the one the
//! channel list discovery needs, see [`UserProfile::get_channel_list`].
//!
//! # Example
//!
//! ```rust,no_run
//! use bilibili_user::{Client, RequesterConfig, UserProfile};
//!
//! # async fn example() -> bilibili_user::Result<()> {
//! let client = Client::reqwest(RequesterConfig::default())?;
//! let user = UserProfile::new(2, client);
//!
//! let relation = user.get_relation_info().await?;
//! println!("{} followers", relation["follower"]);
//!
//! for channel in user.get_channels().await? {
//!     println!("{} {}: {}", channel.kind(), channel.id(), channel.meta()["name"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod channel;
pub mod client;
pub mod compose;
pub mod credential;
pub mod error;
pub mod normalize;
pub mod requester;
pub mod types;
pub mod user;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use catalog::{ApiCatalog, Endpoint, StaticCatalog};
pub use channel::CollectionRef;
pub use client::Client;
pub use credential::{Claim, Credential};
pub use error::{Error, Result};
pub use requester::{ApiRequest, Params, Requester, RequesterConfig, ReqwestRequester};
pub use types::{
    ArticleListOrder, ArticleOrder, AudioOrder, BangumiType, ChannelOrder, ChannelSeriesType,
    RelationType, VideoOrder,
};
pub use user::UserProfile;
