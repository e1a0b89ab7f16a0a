//! Turns typed operations into requests, after checking the credential can perform them.

use crate::catalog::ApiCatalog;
use crate::credential::{Claim, Credential};
use crate::error::Result;
use crate::requester::{ApiRequest, Params};
use crate::types::{
    ArticleListOrder, ArticleOrder, AudioOrder, BangumiType, ChannelOrder, RelationType,
    VideoOrder,
};
use http::Method;

/// Device id the web client reports when sending private messages.
const MESSAGE_DEVICE_ID: &str = "B9A37BF3-AA9D-4076-A4D3-366AC8C4C5DB";

/// Which claims an operation needs before it may be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    SessionRequired,
    /// Only the write token. The upstream asks for it on the upload statistics read.
    WriteTokenRequired,
    SessionAndUserIdRequired,
    /// State-mutating operations.
    SessionAndWriteTokenRequired,
}

impl Access {
    /// The required claims, in the order they are checked.
    pub fn claims(self) -> &'static [Claim] {
        match self {
            Access::Public => &[],
            Access::SessionRequired => &[Claim::Session],
            Access::WriteTokenRequired => &[Claim::WriteToken],
            Access::SessionAndUserIdRequired => &[Claim::Session, Claim::UserId],
            Access::SessionAndWriteTokenRequired => &[Claim::Session, Claim::WriteToken],
        }
    }
}

/// One logical call against the user endpoints, with its typed arguments.
///
/// The parameter encoding of each variant follows what its endpoint expects, which is not
/// uniform: some take flags as `0`/`1`, others as `"desc"`/`"asc"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SelfInfo,
    UserInfo {
        uid: u64,
    },
    RelationInfo {
        uid: u64,
    },
    UpStat {
        uid: u64,
    },
    LiveInfo {
        uid: u64,
    },
    Videos {
        uid: u64,
        tid: u32,
        pn: u32,
        ps: u32,
        keyword: String,
        order: VideoOrder,
    },
    Audios {
        uid: u64,
        order: AudioOrder,
        pn: u32,
        ps: u32,
    },
    Articles {
        uid: u64,
        order: ArticleOrder,
        pn: u32,
        ps: u32,
    },
    ArticleLists {
        uid: u64,
        order: ArticleListOrder,
    },
    Dynamics {
        uid: u64,
        /// `0` starts from the top of the feed.
        offset: u64,
        need_top: bool,
    },
    SubscribedBangumi {
        uid: u64,
        pn: u32,
        ps: u32,
        kind: BangumiType,
    },
    Followings {
        uid: u64,
        pn: u32,
        ps: u32,
        desc: bool,
    },
    Followers {
        uid: u64,
        pn: u32,
        ps: u32,
        desc: bool,
    },
    OverviewStat {
        uid: u64,
    },
    SeriesVideos {
        uid: u64,
        series_id: u64,
        pn: u32,
        ps: u32,
    },
    SeasonVideos {
        uid: u64,
        season_id: u64,
        sort: ChannelOrder,
        pn: u32,
        ps: u32,
    },
    ChannelList {
        uid: u64,
        page_num: u32,
        page_size: u64,
    },
    Cheese {
        uid: u64,
    },
    History {
        pn: u32,
        ps: u32,
    },
    Coins,
    ModifyRelation {
        uid: u64,
        relation: RelationType,
    },
    SendMessage {
        sender_uid: u64,
        receiver_uid: u64,
        text: String,
        /// Unix seconds.
        timestamp: i64,
    },
    CreateSubscribeGroup {
        name: String,
    },
    DeleteSubscribeGroup {
        group_id: u64,
    },
    RenameSubscribeGroup {
        group_id: u64,
        name: String,
    },
    SetSubscribeGroup {
        uids: Vec<u64>,
        group_ids: Vec<u64>,
    },
}

impl Operation {
    /// Every catalog name an operation can resolve to.
    pub const LOGICAL_NAMES: &'static [&'static str] = &[
        "info.my_info",
        "info.info",
        "info.relation",
        "info.upstat",
        "info.live",
        "info.video",
        "info.audio",
        "info.article",
        "info.article_lists",
        "info.dynamic",
        "info.bangumi",
        "info.followings",
        "info.followers",
        "info.overview",
        "info.channel_video_series",
        "info.channel_video_season",
        "info.channel_list",
        "info.pugv",
        "info.history",
        "info.get_coins",
        "operate.modify",
        "operate.send_msg",
        "operate.create_subscribe_group",
        "operate.del_subscribe_group",
        "operate.rename_subscribe_group",
        "operate.set_user_subscribe_group",
    ];

    pub fn logical_name(&self) -> &'static str {
        match self {
            Operation::SelfInfo => "info.my_info",
            Operation::UserInfo { .. } => "info.info",
            Operation::RelationInfo { .. } => "info.relation",
            Operation::UpStat { .. } => "info.upstat",
            Operation::LiveInfo { .. } => "info.live",
            Operation::Videos { .. } => "info.video",
            Operation::Audios { .. } => "info.audio",
            Operation::Articles { .. } => "info.article",
            Operation::ArticleLists { .. } => "info.article_lists",
            Operation::Dynamics { .. } => "info.dynamic",
            Operation::SubscribedBangumi { .. } => "info.bangumi",
            Operation::Followings { .. } => "info.followings",
            Operation::Followers { .. } => "info.followers",
            Operation::OverviewStat { .. } => "info.overview",
            Operation::SeriesVideos { .. } => "info.channel_video_series",
            Operation::SeasonVideos { .. } => "info.channel_video_season",
            Operation::ChannelList { .. } => "info.channel_list",
            Operation::Cheese { .. } => "info.pugv",
            Operation::History { .. } => "info.history",
            Operation::Coins => "info.get_coins",
            Operation::ModifyRelation { .. } => "operate.modify",
            Operation::SendMessage { .. } => "operate.send_msg",
            Operation::CreateSubscribeGroup { .. } => "operate.create_subscribe_group",
            Operation::DeleteSubscribeGroup { .. } => "operate.del_subscribe_group",
            Operation::RenameSubscribeGroup { .. } => "operate.rename_subscribe_group",
            Operation::SetSubscribeGroup { .. } => "operate.set_user_subscribe_group",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Operation::SelfInfo | Operation::History { .. } => Access::SessionRequired,
            Operation::UpStat { .. } => Access::WriteTokenRequired,
            Operation::Coins => Access::SessionAndUserIdRequired,
            Operation::ModifyRelation { .. }
            | Operation::SendMessage { .. }
            | Operation::CreateSubscribeGroup { .. }
            | Operation::DeleteSubscribeGroup { .. }
            | Operation::RenameSubscribeGroup { .. }
            | Operation::SetSubscribeGroup { .. } => Access::SessionAndWriteTokenRequired,
            _ => Access::Public,
        }
    }

    /// Whether the caller's credential is sent along. The course listing is always anonymous.
    pub fn sends_credential(&self) -> bool {
        !matches!(self, Operation::Cheese { .. })
    }

    /// The parameters of this operation, encoded for its endpoint.
    pub fn params(&self) -> Params {
        match self {
            Operation::SelfInfo | Operation::Coins => Params::new(),
            Operation::UserInfo { uid }
            | Operation::UpStat { uid }
            | Operation::LiveInfo { uid }
            | Operation::Cheese { uid } => Params::new().with("mid", uid),
            Operation::RelationInfo { uid } => Params::new().with("vmid", uid),
            Operation::Videos {
                uid,
                tid,
                pn,
                ps,
                keyword,
                order,
            } => Params::new()
                .with("mid", uid)
                .with("ps", ps)
                .with("tid", tid)
                .with("pn", pn)
                .with("keyword", keyword)
                .with("order", order.value()),
            Operation::Audios { uid, order, pn, ps } => Params::new()
                .with("uid", uid)
                .with("ps", ps)
                .with("pn", pn)
                .with("order", order.value()),
            Operation::Articles { uid, order, pn, ps } => Params::new()
                .with("mid", uid)
                .with("ps", ps)
                .with("pn", pn)
                .with("sort", order.value()),
            Operation::ArticleLists { uid, order } => {
                Params::new().with("mid", uid).with("sort", order.value())
            }
            Operation::Dynamics {
                uid,
                offset,
                need_top,
            } => Params::new()
                .with("host_uid", uid)
                .with("offset_dynamic_id", offset)
                .with("need_top", u8::from(*need_top)),
            Operation::SubscribedBangumi { uid, pn, ps, kind } => Params::new()
                .with("vmid", uid)
                .with("pn", pn)
                .with("ps", ps)
                .with("type", kind.value()),
            Operation::Followings { uid, pn, ps, desc }
            | Operation::Followers { uid, pn, ps, desc } => Params::new()
                .with("vmid", uid)
                .with("ps", ps)
                .with("pn", pn)
                .with("order", if *desc { "desc" } else { "asc" }),
            Operation::OverviewStat { uid } => {
                Params::new().with("mid", uid).with("jsonp", "jsonp")
            }
            Operation::SeriesVideos {
                uid,
                series_id,
                pn,
                ps,
            } => Params::new()
                .with("mid", uid)
                .with("series_id", series_id)
                .with("pn", pn)
                .with("ps", ps),
            Operation::SeasonVideos {
                uid,
                season_id,
                sort,
                pn,
                ps,
            } => Params::new()
                .with("mid", uid)
                .with("season_id", season_id)
                .with("sort_reverse", sort.value())
                .with("page_num", pn)
                .with("page_size", ps),
            Operation::ChannelList {
                uid,
                page_num,
                page_size,
            } => Params::new()
                .with("mid", uid)
                .with("page_num", page_num)
                .with("page_size", page_size),
            Operation::History { pn, ps } => Params::new().with("pn", pn).with("ps", ps),
            Operation::ModifyRelation { uid, relation } => Params::new()
                .with("fid", uid)
                .with("act", relation.value())
                .with("re_src", 11),
            Operation::SendMessage {
                sender_uid,
                receiver_uid,
                text,
                timestamp,
            } => Params::new()
                .with("msg[sender_uid]", sender_uid)
                .with("msg[receiver_id]", receiver_uid)
                .with("msg[receiver_type]", 1)
                .with("msg[msg_type]", 1)
                .with("msg[msg_status]", 0)
                .with(
                    "msg[content]",
                    serde_json::json!({ "content": text }).to_string(),
                )
                .with("msg[dev_id]", MESSAGE_DEVICE_ID)
                .with("msg[new_face_version]", 0)
                .with("msg[timestamp]", timestamp)
                .with("from_filework", 0)
                .with("build", 0)
                .with("mobi_app", "web"),
            Operation::CreateSubscribeGroup { name } => Params::new().with("tag", name),
            Operation::DeleteSubscribeGroup { group_id } => Params::new().with("tagid", group_id),
            Operation::RenameSubscribeGroup { group_id, name } => {
                Params::new().with("tagid", group_id).with("name", name)
            }
            Operation::SetSubscribeGroup { uids, group_ids } => Params::new()
                .with("fids", join(uids))
                .with("tagids", join(group_ids)),
        }
    }
}

fn join(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolves operations against an [`ApiCatalog`] into [`ApiRequest`]s.
pub struct RequestComposer<'a> {
    catalog: &'a dyn ApiCatalog,
}

impl<'a> RequestComposer<'a> {
    pub fn new(catalog: &'a dyn ApiCatalog) -> Self {
        Self { catalog }
    }

    /// Checks `credential` against the claims `operation` needs, then builds the request.
    ///
    /// Parameters go in the query string for `GET` endpoints and in the body otherwise.
    pub fn compose(&self, operation: &Operation, credential: &Credential) -> Result<ApiRequest> {
        credential.require_all(operation.access().claims())?;

        let endpoint = self.catalog.lookup(operation.logical_name())?;
        let params = operation.params();
        let (query, body) = if endpoint.method == Method::GET {
            (Some(params), None)
        } else {
            (None, Some(params))
        };

        tracing::debug!(
            operation = operation.logical_name(),
            method = %endpoint.method,
            url = %endpoint.url,
            "composed request"
        );

        Ok(ApiRequest {
            method: endpoint.method.clone(),
            url: endpoint.url.clone(),
            query,
            body,
        })
    }
}
