//! NMEA sentence synchronization.
//!
//! [`SentenceSync`] consumes the receiver byte stream one byte at a time, finds
//! sentence boundaries, and keeps only the one sentence type selected by its
//! [`SentenceFilter`]. A complete sentence is copied into the [`LatestReading`]
//! store and marked unparsed; everything else is dropped in place.
//!
//! ## Framing
//!
//! - `$` starts a sentence while unsynced; the marker is buffered
//! - `*` ends the data portion; the checksum digits after it are never read
//! - a sentence reaching [`MAX_SENTENCE_LEN`] bytes is treated as complete
//! - once [`SENTENCE_TYPE_LEN`] bytes are buffered, a talker/type mismatch
//!   abandons the sentence immediately
//!
//! The incoming NMEA checksum is not validated.

use heapless::Vec;

use crate::consts::{MAX_SENTENCE_LEN, SENTENCE_END, SENTENCE_START, SENTENCE_TYPE_LEN};

/// Selects the one NMEA sentence type retained by the synchronizer.
///
/// The first talker character must match `talker`; the second talker character is
/// a wildcard so `$GPGGA`, `$GNGGA` and `$GLGGA` are all accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceFilter {
    talker: u8,
    sentence_id: [u8; 3],
}

impl SentenceFilter {
    /// Any GNSS talker, GGA (fix data) sentences.
    pub const GGA: Self = Self::new(b'G', *b"GGA");

    /// Creates a filter for `sentence_id` from talkers starting with `talker`.
    pub const fn new(talker: u8, sentence_id: [u8; 3]) -> Self {
        Self {
            talker,
            sentence_id,
        }
    }

    /// Whether `head` (at least [`SENTENCE_TYPE_LEN`] bytes) starts a wanted sentence.
    pub fn matches(&self, head: &[u8]) -> bool {
        match head {
            [SENTENCE_START, talker, _, id @ ..] if id.len() >= 3 => {
                *talker == self.talker && id[..3] == self.sentence_id
            }
            _ => false,
        }
    }
}

/// Synchronizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// Discarding bytes until a start marker arrives.
    #[default]
    Unsynced,
    /// Buffering a sentence.
    Syncing,
}

/// What happened to one byte fed to the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// The byte was outside a sentence and dropped.
    Ignored,
    /// The byte was buffered as part of the current sentence.
    Buffering,
    /// A wanted sentence completed and was copied to the latest reading.
    Captured,
    /// The sentence was abandoned: wrong talker/type, or it ended before its type was known.
    Rejected,
}

/// The most recent complete sentence and whether it has been parsed.
#[derive(Debug, Clone)]
pub struct LatestReading {
    bytes: Vec<u8, MAX_SENTENCE_LEN>,
    parsed: bool,
}

impl Default for LatestReading {
    fn default() -> Self {
        Self::new()
    }
}

impl LatestReading {
    /// An empty store with nothing left to parse.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            parsed: true,
        }
    }

    /// Raw bytes of the latest sentence, starting with `$`.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the stored sentence has already been parsed.
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    pub(crate) fn mark_parsed(&mut self) {
        self.parsed = true;
    }

    fn store(&mut self, sentence: &[u8]) {
        self.bytes.clear();
        // Both buffers share MAX_SENTENCE_LEN, so the copy always fits.
        let _ = self.bytes.extend_from_slice(sentence);
        self.parsed = false;
    }
}

/// Byte-at-a-time NMEA sentence synchronizer.
#[derive(Debug, Clone)]
pub struct SentenceSync {
    filter: SentenceFilter,
    state: SyncState,
    buf: Vec<u8, MAX_SENTENCE_LEN>,
}

impl SentenceSync {
    /// Creates an unsynced synchronizer retaining sentences accepted by `filter`.
    pub const fn new(filter: SentenceFilter) -> Self {
        Self {
            filter,
            state: SyncState::Unsynced,
            buf: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Number of bytes buffered for the current sentence.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Feeds one received byte.
    ///
    /// A completed wanted sentence is copied into `latest` and its parsed flag is
    /// cleared; rejected sentences never touch `latest`.
    pub fn feed(&mut self, byte: u8, latest: &mut LatestReading) -> SyncEvent {
        if self.state == SyncState::Unsynced {
            if byte != SENTENCE_START {
                return SyncEvent::Ignored;
            }
            self.buf.clear();
            self.state = SyncState::Syncing;
        }

        // Never full here: a full buffer completes the sentence below.
        let _ = self.buf.push(byte);

        let type_known = self.buf.len() >= SENTENCE_TYPE_LEN;
        if type_known && !self.filter.matches(&self.buf) {
            trace!("sentence rejected after {} bytes", self.buf.len());
            self.reset();
            return SyncEvent::Rejected;
        }

        if byte == SENTENCE_END || self.buf.is_full() {
            let event = if type_known {
                latest.store(&self.buf);
                debug!("sentence captured, {} bytes", self.buf.len());
                SyncEvent::Captured
            } else {
                SyncEvent::Rejected
            };
            self.reset();
            return event;
        }

        SyncEvent::Buffering
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.state = SyncState::Unsynced;
    }
}
