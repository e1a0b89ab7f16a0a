//! A single season or series owned by a user.

use crate::error::{Error, Result};
use crate::normalize;
use crate::types::{ChannelOrder, ChannelSeriesType};
use crate::user::UserProfile;
use serde_json::{Map, Value};
use tracing::instrument;

/// A video collection of [`UserProfile`], with its metadata.
///
/// The collection borrows its owner, so listings always run with the owner's current client and
/// credential.
#[derive(Debug, Clone)]
pub struct CollectionRef<'a> {
    owner: &'a UserProfile,
    kind: ChannelSeriesType,
    id: u64,
    meta: Map<String, Value>,
}

impl<'a> CollectionRef<'a> {
    /// Resolves the collection of `kind` with `id` belonging to `owner`.
    ///
    /// Non-empty `meta` is taken as is. Otherwise the owner's full channel list is fetched and
    /// searched for the id, failing with [`Error::CollectionNotFound`] if it is not there.
    #[instrument(skip(owner, meta), fields(uid = owner.uid()))]
    pub async fn new(
        owner: &'a UserProfile,
        kind: ChannelSeriesType,
        id: u64,
        meta: Option<Map<String, Value>>,
    ) -> Result<Self> {
        if let Some(meta) = meta.filter(|meta| !meta.is_empty()) {
            return Ok(Self::from_meta(owner, kind, id, meta));
        }

        let channels = owner.get_channel_list().await?;
        let meta = normalize::find_collection_meta(&channels, kind, id)?
            .ok_or(Error::CollectionNotFound { kind, id })?;
        tracing::debug!(%kind, id, "resolved collection from channel list");
        Ok(Self::from_meta(owner, kind, id, meta))
    }

    pub(crate) fn from_meta(
        owner: &'a UserProfile,
        kind: ChannelSeriesType,
        id: u64,
        meta: Map<String, Value>,
    ) -> Self {
        Self {
            owner,
            kind,
            id,
            meta,
        }
    }

    pub fn owner(&self) -> &'a UserProfile {
        self.owner
    }

    pub fn owner_uid(&self) -> u64 {
        self.owner.uid()
    }

    pub fn kind(&self) -> ChannelSeriesType {
        self.kind
    }

    /// The `season_id` or `series_id`, depending on [`Self::kind`].
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// One page of the videos in this collection.
    ///
    /// `sort` only has an effect on seasons; the series endpoint has no ordering parameter and
    /// ignores it.
    pub async fn get_videos(&self, sort: ChannelOrder, pn: u32, ps: u32) -> Result<Value> {
        match self.kind {
            ChannelSeriesType::Season => {
                self.owner
                    .get_channel_videos_season(self.id, sort, pn, ps)
                    .await
            }
            ChannelSeriesType::Series => self.owner.get_channel_videos_series(self.id, pn, ps).await,
        }
    }
}
