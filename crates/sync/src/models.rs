//! Wire payloads exchanged with the remote service, and sync results.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote identifiers arrive as either JSON numbers or strings.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(u64),
    Text(String),
}

/// One entry of the remote item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteItem {
    pub id: ItemId,
    pub name: String,
    /// Any other fields, preserved untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
impl RemoteItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }
}
impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}
impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Body sent when linking a remote item to a catalog collection.
#[derive(Debug, Serialize)]
pub(crate) struct LinkRequest<'a> {
    pub collection: &'a str,
}

pub(crate) fn decode_items(body: &[u8]) -> Result<Vec<RemoteItem>> {
    serde_json::from_slice(body).or_raise(|| ErrorKind::Decode)
}

pub(crate) fn encode_link(collection: &str) -> Result<Vec<u8>> {
    serde_json::to_vec(&LinkRequest { collection }).or_raise(|| ErrorKind::Encode)
}

/// What happened to a single remote item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    /// The item's name didn't match the selection filter.
    Filtered(RemoteItem),
    /// No catalog collection matched the item's name closely enough.
    Unmatched(RemoteItem),
    /// Dry run: the item would have been linked to `collection`.
    WouldLink {
        item: RemoteItem,
        collection: String,
        score: f64,
    },
    /// The item was linked to `collection` on the remote service.
    Linked {
        item: RemoteItem,
        collection: String,
        score: f64,
    },
    /// Linking was attempted but every attempt failed.
    Failed {
        item: RemoteItem,
        collection: String,
        reason: String,
    },
}
impl ItemOutcome {
    pub fn item(&self) -> &RemoteItem {
        match self {
            Self::Filtered(item) | Self::Unmatched(item) => item,
            Self::WouldLink { item, .. } | Self::Linked { item, .. } | Self::Failed { item, .. } => item,
        }
    }
}

/// Per-outcome counts for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: u64,
    pub filtered: u64,
    pub unmatched: u64,
    pub would_link: u64,
    pub linked: u64,
    pub failed: u64,
}
impl Summary {
    pub(crate) fn record(&mut self, outcome: &ItemOutcome) {
        let counter = match outcome {
            ItemOutcome::Filtered(_) => &mut self.filtered,
            ItemOutcome::Unmatched(_) => &mut self.unmatched,
            ItemOutcome::WouldLink { .. } => &mut self.would_link,
            ItemOutcome::Linked { .. } => &mut self.linked,
            ItemOutcome::Failed { .. } => &mut self.failed,
        };
        *counter += 1;
    }

    /// Items that reached a final state.
    pub fn processed(&self) -> u64 {
        self.filtered + self.unmatched + self.would_link + self.linked + self.failed
    }
}
