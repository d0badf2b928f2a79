//! Parent → children index over contest chains.
//!
//! Events only store a back-reference to the event they contest. This index
//! adds the forward direction so a chain can be walked both ways.

use historia_types::EventId;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenealogyIndex {
    parents: BTreeMap<EventId, EventId>,
    children: BTreeMap<EventId, Vec<EventId>>,
}

impl GenealogyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from `(child, parent)` pairs.
    pub fn from_links(links: impl IntoIterator<Item = (EventId, EventId)>) -> Self {
        let mut index = Self::new();
        for (child, parent) in links {
            index.link(parent, child);
        }
        index
    }

    pub fn link(&mut self, parent: EventId, child: EventId) {
        self.parents.insert(child, parent);
        let siblings = self.children.entry(parent).or_default();
        if let Err(pos) = siblings.binary_search(&child) {
            siblings.insert(pos, child);
        }
    }

    pub fn unlink(&mut self, child: EventId) {
        if let Some(parent) = self.parents.remove(&child) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|c| *c != child);
                if siblings.is_empty() {
                    self.children.remove(&parent);
                }
            }
        }
    }

    pub fn parent_of(&self, id: EventId) -> Option<EventId> {
        self.parents.get(&id).copied()
    }

    /// Direct contests of `id`, oldest first.
    pub fn contests_of(&self, id: EventId) -> &[EventId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `id` followed by each ancestor up to the root.
    pub fn lineage(&self, id: EventId) -> Vec<EventId> {
        let mut chain = vec![id];
        let mut cur = id;
        while let Some(parent) = self.parent_of(cur) {
            chain.push(parent);
            cur = parent;
        }
        chain
    }

    pub fn root_of(&self, id: EventId) -> EventId {
        let mut cur = id;
        while let Some(parent) = self.parent_of(cur) {
            cur = parent;
        }
        cur
    }

    /// The most recent version of the claim: follow the newest contest at
    /// each level until reaching an uncontested event.
    pub fn latest_version(&self, id: EventId) -> EventId {
        let mut cur = id;
        while let Some(newest) = self.contests_of(cur).last() {
            cur = *newest;
        }
        cur
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
