//! Deduplicated collection of tracks keyed by track id.

use std::collections::HashMap;

use super::track::Track;

/// Tracks keyed by id, iterated in first-insertion order
///
/// Iteration order decides which track owns a browsable link shared by
/// several titles.
#[derive(Debug, Clone, Default)]
pub struct TrackSet {
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl TrackSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, or replace in place by id
    pub fn insert(&mut self, track: Track) {
        match self.index.get(&track.id) {
            Some(&pos) => self.tracks[pos] = track,
            None => {
                self.index.insert(track.id.clone(), self.tracks.len());
                self.tracks.push(track);
            }
        }
    }

    /// Insert only when the id is not present yet; returns whether it was added
    pub fn insert_if_absent(&mut self, track: Track) -> bool {
        if self.index.contains_key(&track.id) {
            return false;
        }
        self.insert(track);
        true
    }

    /// Overlay another set without overwriting existing ids; returns how many were added
    pub fn merge_missing(&mut self, other: TrackSet) -> usize {
        other
            .into_iter()
            .map(|track| self.insert_if_absent(track))
            .filter(|added| *added)
            .count()
    }

    pub fn get(&self, id: &str) -> Option<&Track> {
        self.index.get(id).map(|&pos| &self.tracks[pos])
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }
}

impl IntoIterator for TrackSet {
    type Item = Track;
    type IntoIter = std::vec::IntoIter<Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

impl FromIterator<Track> for TrackSet {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut set = TrackSet::new();
        for track in iter {
            set.insert(track);
        }
        set
    }
}
