//! Operations on behalf of, or about, a single user.

use crate::channel::CollectionRef;
use crate::client::Client;
use crate::compose::{Access, Operation};
use crate::credential::Credential;
use crate::error::Result;
use crate::normalize;
use crate::types::{
    ArticleListOrder, ArticleOrder, AudioOrder, BangumiType, ChannelOrder, RelationType,
    VideoOrder,
};
use jiff::Timestamp;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio_stream::Stream;
use tracing::instrument;

/// Pause between the size probe and the full fetch of the channel list.
///
/// The upstream rate-limits back-to-back requests to this endpoint.
pub const CHANNEL_LIST_PAUSE: Duration = Duration::from_millis(500);

/// A user, seen through the credential of whoever is asking.
///
/// Reads are about the user with id [`Self::uid`]. Writes (following, messaging) act on that
/// user on behalf of the credential's owner, and the subscribe-group and history operations act
/// on the credential's owner alone.
///
/// Most methods return the upstream payload unchanged.
#[derive(Debug)]
pub struct UserProfile {
    uid: u64,
    credential: Arc<Credential>,
    client: Client,
    /// Profile of the credential's owner, fetched at most once.
    self_info: OnceCell<Value>,
}

impl UserProfile {
    /// The user with id `uid`, accessed anonymously.
    pub fn new(uid: u64, client: Client) -> Self {
        Self::with_credential(uid, Arc::new(Credential::anonymous()), client)
    }

    pub fn with_credential(uid: u64, credential: Arc<Credential>, client: Client) -> Self {
        Self {
            uid,
            credential,
            client,
            self_info: OnceCell::new(),
        }
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn call(&self, operation: Operation) -> Result<Value> {
        self.client.call(operation, &self.credential).await
    }

    /// Nickname, sex, birthday, signature, avatar and banner URLs.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_user_info(&self) -> Result<Value> {
        self.call(Operation::UserInfo { uid: self.uid }).await
    }

    /// The profile of the credential's owner.
    ///
    /// Cached for the lifetime of this value. Concurrent first calls share one request.
    #[instrument(skip(self))]
    pub async fn get_self_info(&self) -> Result<&Value> {
        self.self_info
            .get_or_try_init(|| async {
                tracing::debug!("fetching own profile");
                self.call(Operation::SelfInfo).await
            })
            .await
    }

    /// Following, follower, whisper and blacklist counts.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_relation_info(&self) -> Result<Value> {
        self.call(Operation::RelationInfo { uid: self.uid }).await
    }

    /// Total video views, article views and likes. Needs the write token.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_up_stat(&self) -> Result<Value> {
        self.call(Operation::UpStat { uid: self.uid }).await
    }

    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_live_info(&self) -> Result<Value> {
        self.call(Operation::LiveInfo { uid: self.uid }).await
    }

    /// One page of uploaded videos.
    ///
    /// `tid` filters by category (`0` for all) and `keyword` by title (empty for all).
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_videos(
        &self,
        tid: u32,
        pn: u32,
        ps: u32,
        keyword: &str,
        order: VideoOrder,
    ) -> Result<Value> {
        self.call(Operation::Videos {
            uid: self.uid,
            tid,
            pn,
            ps,
            keyword: keyword.to_string(),
            order,
        })
        .await
    }

    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_audios(&self, order: AudioOrder, pn: u32, ps: u32) -> Result<Value> {
        self.call(Operation::Audios {
            uid: self.uid,
            order,
            pn,
            ps,
        })
        .await
    }

    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_articles(&self, order: ArticleOrder, pn: u32, ps: u32) -> Result<Value> {
        self.call(Operation::Articles {
            uid: self.uid,
            order,
            pn,
            ps,
        })
        .await
    }

    /// Article collections.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_article_list(&self, order: ArticleListOrder) -> Result<Value> {
        self.call(Operation::ArticleLists {
            uid: self.uid,
            order,
        })
        .await
    }

    /// One page of the dynamics feed, with every card's embedded JSON decoded.
    ///
    /// Pass `0` for the newest page, then the `next_offset` of the previous page to continue.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_dynamics(&self, offset: u64, need_top: bool) -> Result<Value> {
        let mut page = self
            .call(Operation::Dynamics {
                uid: self.uid,
                offset,
                need_top,
            })
            .await?;
        normalize::decode_dynamics(&mut page)?;
        Ok(page)
    }

    /// Every card of the dynamics feed, newest first, fetched page by page as needed.
    ///
    /// The stream ends after the first failed page.
    pub fn dynamics_stream(
        &self,
        need_top: bool,
    ) -> impl Stream<Item = Result<Value>> + Send + use<'_> {
        async_stream::try_stream! {
            let mut offset = 0;
            loop {
                let page = self.get_dynamics(offset, need_top).await?;
                let (cards, next_offset) = normalize::feed_page(page);
                for card in cards {
                    yield card;
                }
                let Some(next_offset) = next_offset else {
                    break;
                };
                tracing::trace!(next_offset, "following dynamics feed");
                offset = next_offset;
            }
        }
    }

    /// Followed bangumi or dramas.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_subscribed_bangumi(
        &self,
        pn: u32,
        ps: u32,
        kind: BangumiType,
    ) -> Result<Value> {
        self.call(Operation::SubscribedBangumi {
            uid: self.uid,
            pn,
            ps,
            kind,
        })
        .await
    }

    /// Users this user follows. Strangers only get to see the first five pages.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_followings(&self, pn: u32, ps: u32, desc: bool) -> Result<Value> {
        self.call(Operation::Followings {
            uid: self.uid,
            pn,
            ps,
            desc,
        })
        .await
    }

    /// Users following this user. Strangers only get to see the first five pages.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_followers(&self, pn: u32, ps: u32, desc: bool) -> Result<Value> {
        self.call(Operation::Followers {
            uid: self.uid,
            pn,
            ps,
            desc,
        })
        .await
    }

    /// Short subscription and upload counts.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_overview_stat(&self) -> Result<Value> {
        self.call(Operation::OverviewStat { uid: self.uid }).await
    }

    /// Videos of a legacy series.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_channel_videos_series(&self, sid: u64, pn: u32, ps: u32) -> Result<Value> {
        self.call(Operation::SeriesVideos {
            uid: self.uid,
            series_id: sid,
            pn,
            ps,
        })
        .await
    }

    /// Videos of a season.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_channel_videos_season(
        &self,
        sid: u64,
        sort: ChannelOrder,
        pn: u32,
        ps: u32,
    ) -> Result<Value> {
        self.call(Operation::SeasonVideos {
            uid: self.uid,
            season_id: sid,
            sort,
            pn,
            ps,
        })
        .await
    }

    /// Every season and series of this user in a single page.
    ///
    /// This takes two requests: a probe with page size 1 to learn the total, then, after
    /// [`CHANNEL_LIST_PAUSE`], one asking for a page that large. An empty list is fetched with
    /// page size 1.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_channel_list(&self) -> Result<Value> {
        let probe = self
            .call(Operation::ChannelList {
                uid: self.uid,
                page_num: 1,
                page_size: 1,
            })
            .await?;
        let total = normalize::channel_total(&probe)?;
        tracing::debug!(total, "probed channel list size");

        tokio::time::sleep(CHANNEL_LIST_PAUSE).await;

        self.call(Operation::ChannelList {
            uid: self.uid,
            page_num: 1,
            page_size: total.max(1),
        })
        .await
    }

    /// Every season and series of this user.
    pub async fn get_channels(&self) -> Result<Vec<CollectionRef<'_>>> {
        let channels = self.get_channel_list().await?;
        normalize::collections(self, &channels)
    }

    /// Paid courses. Always fetched anonymously.
    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn get_cheese(&self) -> Result<Value> {
        self.call(Operation::Cheese { uid: self.uid }).await
    }

    #[instrument(skip(self), fields(uid = self.uid))]
    pub async fn modify_relation(&self, relation: RelationType) -> Result<Value> {
        self.call(Operation::ModifyRelation {
            uid: self.uid,
            relation,
        })
        .await
    }

    /// Sends a plain text private message to this user.
    #[instrument(skip(self, text), fields(uid = self.uid))]
    pub async fn send_msg(&self, text: &str) -> Result<Value> {
        self.credential
            .require_all(Access::SessionAndWriteTokenRequired.claims())?;
        let sender_uid = normalize::self_mid(self.get_self_info().await?)?;

        self.call(Operation::SendMessage {
            sender_uid,
            receiver_uid: self.uid,
            text: text.to_string(),
            timestamp: Timestamp::now().as_second(),
        })
        .await
    }

    /// Creates a following group for the credential's owner.
    #[instrument(skip(self))]
    pub async fn create_subscribe_group(&self, name: &str) -> Result<Value> {
        self.call(Operation::CreateSubscribeGroup {
            name: name.to_string(),
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_subscribe_group(&self, group_id: u64) -> Result<Value> {
        self.call(Operation::DeleteSubscribeGroup { group_id }).await
    }

    #[instrument(skip(self))]
    pub async fn rename_subscribe_group(&self, group_id: u64, new_name: &str) -> Result<Value> {
        self.call(Operation::RenameSubscribeGroup {
            group_id,
            name: new_name.to_string(),
        })
        .await
    }

    /// Copies already-followed `uids` into each of `group_ids`.
    #[instrument(skip(self))]
    pub async fn set_subscribe_group(&self, uids: &[u64], group_ids: &[u64]) -> Result<Value> {
        self.call(Operation::SetSubscribeGroup {
            uids: uids.to_vec(),
            group_ids: group_ids.to_vec(),
        })
        .await
    }

    /// One page of the credential owner's browsing history.
    #[instrument(skip(self))]
    pub async fn get_self_history(&self, pn: u32, ps: u32) -> Result<Value> {
        self.call(Operation::History { pn, ps }).await
    }

    /// Coin balance of the credential's owner.
    #[instrument(skip(self))]
    pub async fn get_self_coins(&self) -> Result<f64> {
        let balance = self.call(Operation::Coins).await?;
        normalize::coins(&balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Claim;
    use crate::error::Error;
    use crate::mock::MockRequester;
    use crate::types::ChannelSeriesType;
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio_stream::StreamExt;

    fn profile(uid: u64, credential: Credential) -> (MockRequester, UserProfile) {
        let mock = MockRequester::new();
        let user =
            UserProfile::with_credential(uid, Arc::new(credential), Client::new(mock.clone()));
        (mock, user)
    }

    fn logged_in() -> Credential {
        Credential::builder()
            .sessdata("s")
            .bili_jct("j")
            .dedeuserid("1")
            .build()
            .unwrap()
    }

    fn query(call: &crate::mock::RecordedCall) -> Vec<(&'static str, &str)> {
        call.request.query.as_ref().unwrap().iter().collect()
    }

    #[tokio::test]
    async fn relation_info_anonymous() {
        let mock = MockRequester::new();
        let payload = json!({"mid": 100, "following": 3, "follower": 4});
        mock.respond(Ok(payload.clone()));
        let user = UserProfile::new(100, Client::new(mock.clone()));

        assert_eq!(user.get_relation_info().await.unwrap(), payload);

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].request.method, Method::GET);
        assert_eq!(
            calls[0].request.url,
            "https://api.bilibili.com/x/relation/stat"
        );
        assert_eq!(query(&calls[0]), vec![("vmid", "100")]);
        assert!(calls[0].credential.is_anonymous());
    }

    #[tokio::test]
    async fn missing_claims_never_reach_requester() {
        let (mock, user) = profile(7, Credential::anonymous());

        let failures = [
            user.get_up_stat().await.unwrap_err(),
            user.get_self_info().await.unwrap_err(),
            user.modify_relation(RelationType::Subscribe)
                .await
                .unwrap_err(),
            user.send_msg("hi").await.unwrap_err(),
            user.create_subscribe_group("g").await.unwrap_err(),
            user.delete_subscribe_group(1).await.unwrap_err(),
            user.rename_subscribe_group(1, "h").await.unwrap_err(),
            user.set_subscribe_group(&[1], &[2]).await.unwrap_err(),
            user.get_self_history(1, 100).await.unwrap_err(),
            user.get_self_coins().await.unwrap_err(),
        ];
        let missing: Vec<_> = failures
            .iter()
            .map(|err| match err {
                Error::MissingCredential(claim) => *claim,
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(
            missing,
            vec![
                Claim::WriteToken,
                Claim::Session,
                Claim::Session,
                Claim::Session,
                Claim::Session,
                Claim::Session,
                Claim::Session,
                Claim::Session,
                Claim::Session,
                Claim::Session,
            ]
        );
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn session_without_write_token() {
        let (mock, user) = profile(7, Credential::builder().sessdata("s").build().unwrap());

        for err in [
            user.modify_relation(RelationType::Block).await.unwrap_err(),
            user.send_msg("hi").await.unwrap_err(),
            user.set_subscribe_group(&[1], &[2]).await.unwrap_err(),
        ] {
            assert!(
                matches!(err, Error::MissingCredential(Claim::WriteToken)),
                "{err:?}"
            );
        }
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let (mock, user) = profile(7, Credential::anonymous());
        mock.respond(Err(Error::Response {
            status: 412,
            url: "u".into(),
            body: "banned".into(),
        }));
        mock.respond(Err(Error::ResponseCode {
            code: -404,
            message: "啥都木有".into(),
        }));

        let err = user.get_user_info().await.unwrap_err();
        assert!(matches!(err, Error::Response { status: 412, .. }), "{err:?}");
        let err = user.get_user_info().await.unwrap_err();
        assert!(matches!(err, Error::ResponseCode { code: -404, .. }), "{err:?}");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn self_info_fetched_once() {
        let (mock, user) = profile(2, logged_in());
        mock.respond(Ok(json!({"mid": 1, "name": "me"})));
        mock.respond(Ok(json!({"msg_key": 1})));
        mock.respond(Ok(json!({"msg_key": 2})));

        user.send_msg("one").await.unwrap();
        user.send_msg("two").await.unwrap();

        assert_eq!(mock.calls_to("/x/space/myinfo"), 1);
        assert_eq!(mock.calls_to("/web_im/send_msg"), 2);
        assert_eq!(user.get_self_info().await.unwrap()["name"], json!("me"));
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn send_msg_body() {
        let (mock, user) = profile(2, logged_in());
        mock.respond(Ok(json!({"mid": 1})));
        mock.respond(Ok(json!({})));

        user.send_msg("hello").await.unwrap();

        let calls = mock.calls();
        let send = &calls[1].request;
        assert_eq!(send.method, Method::POST);
        let body = send.body.as_ref().unwrap();
        assert_eq!(body.get("msg[sender_uid]"), Some("1"));
        assert_eq!(body.get("msg[receiver_id]"), Some("2"));
        assert_eq!(body.get("msg[content]"), Some(r#"{"content":"hello"}"#));
        let timestamp: i64 = body.get("msg[timestamp]").unwrap().parse().unwrap();
        assert!(timestamp > 1_600_000_000, "{timestamp}");
    }

    #[tokio::test]
    async fn failed_self_info_is_not_cached() {
        let (mock, user) = profile(2, logged_in());
        mock.respond(Err(Error::ResponseCode {
            code: -101,
            message: "账号未登录".into(),
        }));
        mock.respond(Ok(json!({"mid": 1})));

        assert!(user.get_self_info().await.is_err());
        assert_eq!(user.get_self_info().await.unwrap()["mid"], json!(1));
        assert_eq!(mock.calls_to("/x/space/myinfo"), 2);
    }

    #[tokio::test]
    async fn dynamics_start_sentinel_and_offset_round_trip() {
        let (mock, user) = profile(9, Credential::anonymous());
        mock.respond(Ok(json!({
            "has_more": 1,
            "next_offset": 700,
            "cards": [{"card": "{\"id\": 1}", "extend_json": "{}"}],
        })));
        mock.respond(Ok(json!({"has_more": 0, "next_offset": 0})));

        let first = user.get_dynamics(0, false).await.unwrap();
        assert_eq!(first["cards"][0]["card"], json!({"id": 1}));
        assert_eq!(first["cards"][0]["extend_json"], json!({}));

        let next = first["next_offset"].as_u64().unwrap();
        user.get_dynamics(next, true).await.unwrap();

        let calls = mock.calls();
        assert_eq!(
            query(&calls[0]),
            vec![("host_uid", "9"), ("offset_dynamic_id", "0"), ("need_top", "0")]
        );
        assert_eq!(
            query(&calls[1]),
            vec![
                ("host_uid", "9"),
                ("offset_dynamic_id", "700"),
                ("need_top", "1")
            ]
        );
    }

    #[tokio::test]
    async fn dynamics_stream_walks_feed() {
        let (mock, user) = profile(9, Credential::anonymous());
        mock.respond(Ok(json!({
            "has_more": 1,
            "next_offset": 50,
            "cards": [{"card": "{\"n\": 1}"}, {"card": "{\"n\": 2}"}],
        })));
        mock.respond(Ok(json!({
            "has_more": 0,
            "next_offset": 0,
            "cards": [{"card": "{\"n\": 3}"}],
        })));

        let cards: Vec<Value> = user
            .dynamics_stream(false)
            .collect::<Result<_>>()
            .await
            .unwrap();
        let numbers: Vec<_> = cards.iter().map(|card| card["card"]["n"].clone()).collect();
        assert_eq!(numbers, vec![json!(1), json!(2), json!(3)]);

        let offsets: Vec<_> = mock
            .calls()
            .iter()
            .map(|call| {
                let query = call.request.query.as_ref().unwrap();
                query.get("offset_dynamic_id").unwrap().to_string()
            })
            .collect();
        assert_eq!(offsets, vec!["0", "50"]);
    }

    #[tokio::test]
    async fn dynamics_stream_skips_empty_pages() {
        let (mock, user) = profile(9, Credential::anonymous());
        mock.respond(Ok(json!({"has_more": 1, "next_offset": "30", "cards": []})));
        mock.respond(Ok(json!({"has_more": 1, "next_offset": 40})));
        mock.respond(Ok(json!({"has_more": 0, "cards": [{"card": "{\"n\": 1}"}]})));

        let cards: Vec<Value> = user
            .dynamics_stream(true)
            .collect::<Result<_>>()
            .await
            .unwrap();
        assert_eq!(cards, vec![json!({"card": {"n": 1}})]);
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn dynamics_stream_ends_on_error() {
        let (mock, user) = profile(9, Credential::anonymous());
        mock.respond(Ok(json!({"has_more": 1, "next_offset": 1, "cards": [{"desc": {}}]})));
        mock.respond(Err(Error::ResponseCode {
            code: -412,
            message: "request was banned".into(),
        }));

        let stream = user.dynamics_stream(false);
        let mut stream = std::pin::pin!(stream);

        assert_eq!(stream.next().await.unwrap().unwrap(), json!({"desc": {}}));
        let err = stream.next().await.unwrap().unwrap_err();
        assert!(
            matches!(err, Error::ResponseCode { code: -412, .. }),
            "{err:?}"
        );
        assert!(stream.next().await.is_none());
        assert_eq!(mock.calls().len(), 2);
    }

    fn channel_list(total: u64) -> Value {
        json!({
            "items_lists": {
                "page": {"page_num": 1, "page_size": 1, "total": total},
                "seasons_list": [{"meta": {"season_id": 11}}],
                "series_list": [{"meta": {"series_id": 21}}],
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn channel_list_probe_then_full_page() {
        let (mock, user) = profile(3, Credential::anonymous());
        mock.respond(Ok(channel_list(12)));
        mock.respond(Ok(channel_list(12)));

        let started = tokio::time::Instant::now();
        user.get_channel_list().await.unwrap();
        assert!(started.elapsed() >= CHANNEL_LIST_PAUSE);

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            query(&calls[0]),
            vec![("mid", "3"), ("page_num", "1"), ("page_size", "1")]
        );
        assert_eq!(
            query(&calls[1]),
            vec![("mid", "3"), ("page_num", "1"), ("page_size", "12")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_channel_list_uses_page_size_one() {
        let (mock, user) = profile(3, Credential::anonymous());
        mock.respond(Ok(channel_list(0)));
        mock.respond(Ok(channel_list(0)));

        user.get_channel_list().await.unwrap();

        let calls = mock.calls();
        let query = calls[1].request.query.as_ref().unwrap();
        assert_eq!(query.get("page_size"), Some("1"));
    }

    #[tokio::test]
    async fn failed_probe_stops_discovery() {
        let (mock, user) = profile(3, Credential::anonymous());
        mock.respond(Err(Error::ResponseCode {
            code: -400,
            message: "请求错误".into(),
        }));

        assert!(user.get_channel_list().await.is_err());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn channels_carry_metadata() {
        let (mock, user) = profile(3, Credential::anonymous());
        mock.respond(Ok(channel_list(2)));
        mock.respond(Ok(channel_list(2)));

        let channels = user.get_channels().await.unwrap();
        let found: Vec<_> = channels.iter().map(|c| (c.kind(), c.id())).collect();
        assert_eq!(
            found,
            vec![(ChannelSeriesType::Season, 11), (ChannelSeriesType::Series, 21)]
        );
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn listing_parameters() {
        let (mock, user) = profile(4, Credential::anonymous());
        for _ in 0..5 {
            mock.respond(Ok(json!({})));
        }

        user.get_videos(0, 2, 30, "rust", VideoOrder::View)
            .await
            .unwrap();
        user.get_audios(AudioOrder::Pubdate, 1, 30).await.unwrap();
        user.get_followings(3, 20, true).await.unwrap();
        user.get_subscribed_bangumi(1, 15, BangumiType::Drama)
            .await
            .unwrap();
        user.get_overview_stat().await.unwrap();

        let calls = mock.calls();
        assert_eq!(
            query(&calls[0]),
            vec![
                ("mid", "4"),
                ("ps", "30"),
                ("tid", "0"),
                ("pn", "2"),
                ("keyword", "rust"),
                ("order", "click"),
            ]
        );
        assert_eq!(
            query(&calls[1]),
            vec![("uid", "4"), ("ps", "30"), ("pn", "1"), ("order", "1")]
        );
        assert_eq!(
            query(&calls[2]),
            vec![("vmid", "4"), ("ps", "20"), ("pn", "3"), ("order", "desc")]
        );
        assert_eq!(
            query(&calls[3]),
            vec![("vmid", "4"), ("pn", "1"), ("ps", "15"), ("type", "2")]
        );
        assert_eq!(query(&calls[4]), vec![("mid", "4"), ("jsonp", "jsonp")]);
    }

    #[tokio::test]
    async fn cheese_is_sent_anonymously() {
        let (mock, user) = profile(4, logged_in());
        mock.respond(Ok(json!({"items": []})));

        user.get_cheese().await.unwrap();

        let calls = mock.calls();
        assert!(calls[0].credential.is_anonymous());
        assert_eq!(query(&calls[0]), vec![("mid", "4")]);
    }

    #[tokio::test]
    async fn coins_are_extracted() {
        let (mock, user) = profile(4, logged_in());
        mock.respond(Ok(json!({"money": 42.5})));

        assert_eq!(user.get_self_coins().await.unwrap(), 42.5);
        assert_eq!(mock.calls()[0].credential, logged_in());
    }

    #[tokio::test]
    async fn subscribe_group_writes() {
        let (mock, user) = profile(4, logged_in());
        for _ in 0..4 {
            mock.respond(Ok(json!({})));
        }

        user.create_subscribe_group("friends").await.unwrap();
        user.rename_subscribe_group(8, "pals").await.unwrap();
        user.set_subscribe_group(&[5, 6], &[8, 9]).await.unwrap();
        user.delete_subscribe_group(8).await.unwrap();

        let bodies: Vec<Vec<_>> = mock
            .calls()
            .iter()
            .map(|call| {
                assert_eq!(call.request.method, Method::POST);
                call.request
                    .body
                    .as_ref()
                    .unwrap()
                    .iter()
                    .map(|(k, v)| (k, v.to_string()))
                    .collect()
            })
            .collect();
        assert_eq!(
            bodies,
            vec![
                vec![("tag", "friends".to_string())],
                vec![("tagid", "8".to_string()), ("name", "pals".to_string())],
                vec![("fids", "5,6".to_string()), ("tagids", "8,9".to_string())],
                vec![("tagid", "8".to_string())],
            ]
        );
    }
}
