//! Fixed-value parameters accepted by the user endpoints.
//!
//! Each enumeration maps to exactly the primitive the upstream expects for it. Some endpoints
//! want strings and others want integers, so every type carries its own `value`.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// Ordering of a user's uploaded videos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoOrder {
    /// Newest upload first.
    #[default]
    #[serde(rename = "pubdate")]
    Pubdate,
    /// Most favorited first.
    #[serde(rename = "stow")]
    Favorite,
    /// Most viewed first.
    #[serde(rename = "click")]
    View,
}

impl VideoOrder {
    pub fn value(self) -> &'static str {
        match self {
            VideoOrder::Pubdate => "pubdate",
            VideoOrder::Favorite => "stow",
            VideoOrder::View => "click",
        }
    }
}

/// Ordering of the videos inside a season.
///
/// The legacy series endpoint has no ordering parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelOrder {
    #[default]
    #[serde(rename = "false")]
    Default,
    /// Reverse of the default order.
    #[serde(rename = "true")]
    Change,
}

impl ChannelOrder {
    pub fn value(self) -> &'static str {
        match self {
            ChannelOrder::Default => "false",
            ChannelOrder::Change => "true",
        }
    }
}

/// Ordering of a user's uploaded audios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum AudioOrder {
    #[default]
    Pubdate = 1,
    View = 2,
    Favorite = 3,
}

impl AudioOrder {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Ordering of a user's articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArticleOrder {
    #[default]
    #[serde(rename = "publish_time")]
    Pubdate,
    #[serde(rename = "fav")]
    Favorite,
    #[serde(rename = "view")]
    View,
}

impl ArticleOrder {
    pub fn value(self) -> &'static str {
        match self {
            ArticleOrder::Pubdate => "publish_time",
            ArticleOrder::Favorite => "fav",
            ArticleOrder::View => "view",
        }
    }
}

/// Ordering of a user's article collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ArticleListOrder {
    /// Most recently updated first.
    #[default]
    Latest = 0,
    /// Most read overall first.
    View = 1,
}

impl ArticleListOrder {
    pub fn value(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum BangumiType {
    #[default]
    Bangumi = 1,
    /// TV series, documentaries and the like.
    Drama = 2,
}

impl BangumiType {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// A change to the relation between the actor and another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum RelationType {
    Subscribe = 1,
    Unsubscribe = 2,
    /// Follow without the target being notified.
    SubscribeSecretly = 3,
    Block = 5,
    Unblock = 6,
    RemoveFans = 7,
}

impl RelationType {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// The two upstream flavours of a user's video collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ChannelSeriesType {
    /// Legacy "series" list.
    Series = 0,
    /// Newer "season" collection, shown upstream with a `合集·` prefix.
    Season = 1,
}

impl ChannelSeriesType {
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Key of the list holding this kind in the channel list payload.
    pub(crate) fn list_field(self) -> &'static str {
        match self {
            ChannelSeriesType::Series => "series_list",
            ChannelSeriesType::Season => "seasons_list",
        }
    }

    /// Key of the id inside each entry's `meta`.
    pub(crate) fn id_field(self) -> &'static str {
        match self {
            ChannelSeriesType::Series => "series_id",
            ChannelSeriesType::Season => "season_id",
        }
    }
}

impl fmt::Display for ChannelSeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSeriesType::Series => f.write_str("series"),
            ChannelSeriesType::Season => f.write_str("season"),
        }
    }
}
