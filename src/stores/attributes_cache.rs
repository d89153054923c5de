//! Shared cache of social attributes (follow status, follower/following counts)
//!
//! One instance is created at startup and handed to every profile screen through
//! the service locator. Entries never expire; `clear` drops everything and is run
//! after a pull-to-refresh so counts get re-derived.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::SocialAttributes;

#[derive(Clone, Debug, Default)]
pub struct AttributesCache {
    entries: Arc<RwLock<HashMap<String, SocialAttributes>>>,
}

impl AttributesCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<String, SocialAttributes>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<String, SocialAttributes>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, user_id: &str) -> Option<SocialAttributes> {
        self.read_entries().get(user_id).copied()
    }

    /// Overwrite the entry for a user (last writer wins)
    pub fn set(&self, user_id: &str, attributes: SocialAttributes) {
        self.write_entries().insert(user_id.to_string(), attributes);
    }

    /// Drop all entries for all users
    pub fn clear(&self) {
        let mut entries = self.write_entries();
        log::debug!("Clearing attributes cache ({} entries)", entries.len());
        entries.clear();
    }

    pub fn follow_status(&self, user_id: &str) -> Option<bool> {
        self.get(user_id).and_then(|attributes| attributes.follow_status)
    }

    pub fn counts(&self, user_id: &str) -> Option<(u64, u64)> {
        self.get(user_id).and_then(|attributes| attributes.counts())
    }

    /// Merge a follow status into the existing entry
    pub fn update_follow_status(&self, user_id: &str, following: bool) {
        let mut entries = self.write_entries();
        entries.entry(user_id.to_string()).or_default().follow_status = Some(following);
    }

    /// Merge both counts into the existing entry
    pub fn update_counts(&self, user_id: &str, followers: u64, following: u64) {
        let mut entries = self.write_entries();
        let entry = entries.entry(user_id.to_string()).or_default();
        entry.followers_count = Some(followers);
        entry.following_count = Some(following);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }
}
