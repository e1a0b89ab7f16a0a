//! Reshaping of raw payloads into what the façade returns.
//!
//! Payloads pass through untouched except for the transforms below. Missing optional fields are
//! never an error; a container is only required when a transform has to walk it.

use crate::channel::CollectionRef;
use crate::error::{Error, Result};
use crate::types::ChannelSeriesType;
use crate::user::UserProfile;
use serde_json::{Map, Value};

/// Parses, in place, every `fields` entry that holds a JSON string in each item of `list_field`.
///
/// Nothing happens if `list_field` is absent. Fields that are missing or already decoded are
/// left alone, so running this twice is harmless.
pub fn decode_embedded_json(payload: &mut Value, list_field: &str, fields: &[&str]) -> Result<()> {
    let Some(items) = payload.get_mut(list_field).and_then(Value::as_array_mut) else {
        return Ok(());
    };
    for item in items {
        for &field in fields {
            let decoded: Value = match item.get(field) {
                Some(Value::String(raw)) => serde_json::from_str(raw)?,
                _ => continue,
            };
            item[field] = decoded;
        }
    }
    Ok(())
}

/// Decodes the `card` and `extend_json` strings of a dynamics feed page.
pub fn decode_dynamics(payload: &mut Value) -> Result<()> {
    decode_embedded_json(payload, "cards", &["card", "extend_json"])
}

/// Splits a decoded feed page into its cards and the offset of the next page.
///
/// The next offset is `None` once the feed reports `has_more` as false.
pub(crate) fn feed_page(mut payload: Value) -> (Vec<Value>, Option<u64>) {
    let has_more = match payload.get("has_more") {
        Some(Value::Bool(more)) => *more,
        Some(more) => more.as_u64().is_some_and(|more| more != 0),
        None => false,
    };
    let next_offset = payload.get("next_offset").and_then(|offset| {
        offset
            .as_u64()
            .or_else(|| offset.as_str().and_then(|offset| offset.parse().ok()))
    });
    let cards = match payload.get_mut("cards").map(Value::take) {
        Some(Value::Array(cards)) => cards,
        _ => Vec::new(),
    };
    (cards, next_offset.filter(|_| has_more))
}

/// Total number of seasons and series reported by the channel list envelope.
pub fn channel_total(payload: &Value) -> Result<u64> {
    payload
        .pointer("/items_lists/page/total")
        .and_then(Value::as_u64)
        .ok_or(Error::MalformedResponse("items_lists.page.total"))
}

fn channel_entries(payload: &Value, kind: ChannelSeriesType) -> Result<&[Value]> {
    let items_lists = payload
        .get("items_lists")
        .ok_or(Error::MalformedResponse("items_lists"))?;
    items_lists
        .get(kind.list_field())
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(Error::MalformedResponse(match kind {
            ChannelSeriesType::Season => "items_lists.seasons_list",
            ChannelSeriesType::Series => "items_lists.series_list",
        }))
}

fn entry_meta(entry: &Value, kind: ChannelSeriesType) -> Option<(u64, &Map<String, Value>)> {
    let meta = entry.get("meta")?.as_object()?;
    let id = meta.get(kind.id_field())?.as_u64()?;
    Some((id, meta))
}

/// The `meta` of the entry of the given kind and id, if the channel list has one.
pub fn find_collection_meta(
    payload: &Value,
    kind: ChannelSeriesType,
    id: u64,
) -> Result<Option<Map<String, Value>>> {
    Ok(channel_entries(payload, kind)?
        .iter()
        .filter_map(|entry| entry_meta(entry, kind))
        .find(|&(entry_id, _)| entry_id == id)
        .map(|(_, meta)| meta.clone()))
}

/// One [`CollectionRef`] per entry of a full channel list, seasons first.
///
/// Entries without a `meta` object or id are skipped.
pub fn collections<'a>(owner: &'a UserProfile, payload: &Value) -> Result<Vec<CollectionRef<'a>>> {
    let mut collections = Vec::new();
    for kind in [ChannelSeriesType::Season, ChannelSeriesType::Series] {
        for entry in channel_entries(payload, kind)? {
            if let Some((id, meta)) = entry_meta(entry, kind) {
                collections.push(CollectionRef::from_meta(owner, kind, id, meta.clone()));
            }
        }
    }
    Ok(collections)
}

/// The numeric `mid` of a self-info payload.
pub(crate) fn self_mid(payload: &Value) -> Result<u64> {
    payload
        .get("mid")
        .and_then(Value::as_u64)
        .ok_or(Error::MalformedResponse("mid"))
}

/// The `money` field of a coin balance payload.
pub(crate) fn coins(payload: &Value) -> Result<f64> {
    payload
        .get("money")
        .and_then(Value::as_f64)
        .ok_or(Error::MalformedResponse("money"))
}
