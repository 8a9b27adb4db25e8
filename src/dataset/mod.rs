//! 数据集处理
//!
//! Offline eye-tracking dataset: two grayscale streams, `eye0` and `eye1`,
//! each listed by a `data.csv` manifest of `timestamp,filename` rows.
mod manifest;
mod offline_eye;

pub use manifest::read_manifest;
pub use offline_eye::{load_data, load_data_from, load_data_with};

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use crate::error::{LoaderError, Result};
use crate::frame::FrameHandle;

/// Timestamp in nanoseconds.
pub type Timestamp = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stream {
    Eye0,
    Eye1,
}

impl Stream {
    pub const ALL: [Stream; 2] = [Stream::Eye0, Stream::Eye1];

    /// Directory name under the dataset root.
    pub fn name(&self) -> &'static str {
        match self {
            Stream::Eye0 => "eye0",
            Stream::Eye1 => "eye1",
        }
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Both eyes at one instant. A half is `None` when its manifest has no row
/// for this timestamp.
#[derive(Debug)]
pub struct FramePair {
    timestamp: Timestamp,
    pub eye0: Option<FrameHandle>,
    pub eye1: Option<FrameHandle>,
}

impl FramePair {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            eye0: None,
            eye1: None,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn get(&self, stream: Stream) -> Option<&FrameHandle> {
        match stream {
            Stream::Eye0 => self.eye0.as_ref(),
            Stream::Eye1 => self.eye1.as_ref(),
        }
    }

    /// Like [FramePair::get], but a missing half is an error.
    pub fn frame(&self, stream: Stream) -> Result<&FrameHandle> {
        self.get(stream).ok_or(LoaderError::MissingFrame {
            timestamp: self.timestamp,
            stream,
        })
    }

    pub fn eye0(&self) -> Result<&FrameHandle> {
        self.frame(Stream::Eye0)
    }

    pub fn eye1(&self) -> Result<&FrameHandle> {
        self.frame(Stream::Eye1)
    }

    pub fn is_complete(&self) -> bool {
        self.eye0.is_some() && self.eye1.is_some()
    }

    /// First stream with no frame, if any.
    pub fn missing(&self) -> Option<Stream> {
        Stream::ALL.into_iter().find(|s| self.get(*s).is_none())
    }

    /// Returns the handle it replaced.
    fn set(&mut self, stream: Stream, handle: FrameHandle) -> Option<FrameHandle> {
        let slot = match stream {
            Stream::Eye0 => &mut self.eye0,
            Stream::Eye1 => &mut self.eye1,
        };
        slot.replace(handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableStats {
    pub frames: usize,
    pub complete: usize,
    pub eye0_only: usize,
    pub eye1_only: usize,
    pub first: Option<Timestamp>,
    pub last: Option<Timestamp>,
}

impl TableStats {
    /// Span between first and last timestamp in seconds.
    pub fn duration_secs(&self) -> f64 {
        match (self.first, self.last) {
            (Some(first), Some(last)) => (last - first) as f64 / 1e9,
            _ => 0.0,
        }
    }
}

/// Frame pairs keyed by timestamp, iterated in ascending order.
#[derive(Debug, Default)]
pub struct TimeIndexedTable {
    data: BTreeMap<Timestamp, FramePair>,
}

impl TimeIndexedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one half of the pair at `timestamp`, creating the pair if needed.
    pub(crate) fn insert(
        &mut self,
        timestamp: Timestamp,
        stream: Stream,
        handle: FrameHandle,
    ) -> Option<FrameHandle> {
        self.data
            .entry(timestamp)
            .or_insert_with(|| FramePair::new(timestamp))
            .set(stream, handle)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, timestamp: Timestamp) -> Option<&FramePair> {
        self.data.get(&timestamp)
    }

    #[allow(dead_code)]
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.data.contains_key(&timestamp)
    }

    #[allow(dead_code)]
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.data.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, &FramePair)> + '_ {
        self.data.iter().map(|(t, pair)| (*t, pair))
    }

    #[allow(dead_code)]
    pub fn range<R>(&self, range: R) -> impl Iterator<Item = (Timestamp, &FramePair)> + '_
    where
        R: RangeBounds<Timestamp>,
    {
        self.data.range(range).map(|(t, pair)| (*t, pair))
    }

    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.data.keys().next().copied()
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.data.keys().next_back().copied()
    }

    pub fn complete_pairs(&self) -> impl Iterator<Item = (Timestamp, &FramePair)> + '_ {
        self.iter().filter(|(_, pair)| pair.is_complete())
    }

    pub fn incomplete_timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.iter()
            .filter(|(_, pair)| !pair.is_complete())
            .map(|(t, _)| t)
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            frames: self.len(),
            first: self.first_timestamp(),
            last: self.last_timestamp(),
            ..Default::default()
        };
        for (_, pair) in self.iter() {
            match (pair.eye0.is_some(), pair.eye1.is_some()) {
                (true, true) => stats.complete += 1,
                (true, false) => stats.eye0_only += 1,
                (false, true) => stats.eye1_only += 1,
                (false, false) => {}
            }
        }
        stats
    }
}

impl<'a> IntoIterator for &'a TimeIndexedTable {
    type Item = (&'a Timestamp, &'a FramePair);
    type IntoIter = std::collections::btree_map::Iter<'a, Timestamp, FramePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
