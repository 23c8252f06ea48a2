//! In-memory feed used by unit tests across the crate.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LookupError;
use crate::source::ItemSource;
use crate::types::{ItemId, ItemRecord};

/// Scripted behavior for one item ID
#[derive(Clone, Debug)]
pub(crate) enum Scripted {
    /// Resolve to this record after an optional delay
    Record(ItemRecord, Duration),
    /// Fail with this error
    Fail(LookupError),
}

/// [`ItemSource`] that answers from a fixed script and counts calls
pub(crate) struct ScriptedSource {
    ranking: Mutex<std::result::Result<Vec<ItemId>, LookupError>>,
    items: HashMap<ItemId, Scripted>,
    item_calls: AtomicUsize,
    top_calls: AtomicUsize,
    lookups: Mutex<Vec<ItemId>>,
}

impl ScriptedSource {
    pub(crate) fn new(ranking: Vec<u64>) -> Self {
        Self {
            ranking: Mutex::new(Ok(ranking.into_iter().map(ItemId).collect())),
            items: HashMap::new(),
            item_calls: AtomicUsize::new(0),
            top_calls: AtomicUsize::new(0),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// A source whose ranked list cannot be loaded
    pub(crate) fn failing_ranking(error: LookupError) -> Self {
        let source = Self::new(vec![]);
        source.fail_ranking(error);
        source
    }

    pub(crate) fn story(self, id: u64) -> Self {
        self.story_after(id, Duration::ZERO)
    }

    pub(crate) fn story_after(mut self, id: u64, delay: Duration) -> Self {
        self.items
            .insert(ItemId(id), Scripted::Record(story_record(id), delay));
        self
    }

    pub(crate) fn record(mut self, record: ItemRecord) -> Self {
        self.items
            .insert(record.id, Scripted::Record(record, Duration::ZERO));
        self
    }

    pub(crate) fn failing(mut self, id: u64, error: LookupError) -> Self {
        self.items.insert(ItemId(id), Scripted::Fail(error));
        self
    }

    pub(crate) fn set_ranking(&self, ranking: Vec<u64>) {
        *self.ranking.lock().unwrap() = Ok(ranking.into_iter().map(ItemId).collect());
    }

    pub(crate) fn fail_ranking(&self, error: LookupError) {
        *self.ranking.lock().unwrap() = Err(error);
    }

    pub(crate) fn top_calls(&self) -> usize {
        self.top_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn item_calls(&self) -> usize {
        self.item_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn looked_up(&self) -> Vec<ItemId> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemSource for ScriptedSource {
    async fn top_items(&self) -> std::result::Result<Vec<ItemId>, LookupError> {
        self.top_calls.fetch_add(1, Ordering::SeqCst);
        self.ranking.lock().unwrap().clone()
    }

    async fn get_item(&self, id: ItemId) -> std::result::Result<ItemRecord, LookupError> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        self.lookups.lock().unwrap().push(id);
        match self.items.get(&id) {
            Some(Scripted::Record(record, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(record.clone())
            }
            Some(Scripted::Fail(error)) => Err(error.clone()),
            // Unscripted IDs behave like comments: valid items that never qualify
            None => Ok(ItemRecord {
                id,
                kind: "comment".into(),
                by: "someone".into(),
                ..Default::default()
            }),
        }
    }
}

/// A linked story record whose host encodes its ID
pub(crate) fn story_record(id: u64) -> ItemRecord {
    ItemRecord {
        id: ItemId(id),
        kind: "story".into(),
        url: Some(format!("https://www.site{id}.example/post")),
        title: format!("Story {id}"),
        by: "author".into(),
        score: id as i64,
        ..Default::default()
    }
}

/// IDs of a story list, for compact assertions
pub(crate) fn ids(stories: &[crate::types::Story]) -> Vec<u64> {
    stories.iter().map(|s| s.id.0).collect()
}
