//! # Domain Model: Entries, Day Keys and the Journal Document
//!
//! The journal holds at most one short note per calendar day. A year is drawn as
//! a grid of 365 dots, and every dot is addressed by a [`DayKey`]:
//!
//! ```text
//! 2024-0     January 1st, 2024
//! 2024-41    February 11th, 2024
//! 2024-364   December 30th, 2024 (leap year) / December 31st otherwise
//! ```
//!
//! ## Records
//!
//! An [`EntryRecord`] carries the note text (`memory`) and the timestamp of its
//! last write (`date`). Text is trimmed on save. An empty note is a real record:
//! saving blank text is a deliberate action and is never treated as a delete.
//!
//! ## The Journal Document
//!
//! Both stores persist the same shape, a single JSON document:
//!
//! ```json
//! { "entries": { "2024-0": { "date": "2024-01-01T20:15:00.000Z", "memory": "Hello" } } }
//! ```
//!
//! [`JournalData`] is forgiving on the way in:
//! - a missing or `null` `entries` field reads as an empty journal,
//! - keys that are not valid day keys, and records that do not parse, survive
//!   a read-modify-write untouched but are left out of
//!   [`JournalData::entry_map`].
//!
//! Whether an unparseable document reads as empty or as an error is a decision
//! of the calling store (see [`JournalData::parse_lenient`]).

use crate::error::{JournalError, Result};
use chrono::{DateTime, Datelike, Local, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of dots on a year's grid. Valid day indexes are `0..DAYS_IN_GRID`.
pub const DAYS_IN_GRID: u16 = 365;

/// Entries keyed by day, in chronological order.
pub type EntryMap = BTreeMap<DayKey, EntryRecord>;

/// Identifies one day's dot: `{year}-{dayIndex}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey {
    year: i32,
    day_index: u16,
}

impl DayKey {
    pub fn new(year: i32, day_index: u16) -> Result<Self> {
        if day_index >= DAYS_IN_GRID {
            return Err(JournalError::InvalidDayKey(format!("{}-{}", year, day_index)));
        }
        Ok(Self { year, day_index })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn day_index(&self) -> u16 {
        self.day_index
    }

    /// Key for a calendar date. The 366th day of a leap year has no dot.
    pub fn for_date(date: NaiveDate) -> Result<Self> {
        let index = date.ordinal0();
        if index >= u32::from(DAYS_IN_GRID) {
            return Err(JournalError::InvalidDate(format!(
                "{} is not on the {}-day grid",
                date, DAYS_IN_GRID
            )));
        }
        Self::new(date.year(), index as u16)
    }

    /// Key for today in local time.
    pub fn today() -> Result<Self> {
        Self::for_date(Local::now().date_naive())
    }

    /// Calendar date this key stands for.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_yo_opt(self.year, u32::from(self.day_index) + 1)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.day_index)
    }
}

impl FromStr for DayKey {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || JournalError::InvalidDayKey(s.to_string());
        let (year, index) = s.rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let index: u16 = index.parse().map_err(|_| invalid())?;
        let key = Self::new(year, index).map_err(|_| invalid())?;
        // `2024-041` and `+2024-1` would alias `2024-41` and `2024-1`
        if key.to_string() != s {
            return Err(invalid());
        }
        Ok(key)
    }
}

/// One day's note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Time of the last write.
    pub date: DateTime<Utc>,
    /// Note text, stored trimmed. May be empty.
    pub memory: String,
}

impl EntryRecord {
    /// Builds a record for `text` stamped with the current time.
    pub fn new(text: &str) -> Self {
        Self::at(text, Utc::now())
    }

    pub fn at(text: &str, date: DateTime<Utc>) -> Self {
        Self {
            date: date.trunc_subsecs(3),
            memory: text.trim().to_string(),
        }
    }
}

/// Which store currently backs the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// The app-private key/value area.
    Ephemeral,
    /// A directory the user picked.
    Durable,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageMode::Ephemeral => write!(f, "local"),
            StorageMode::Durable => write!(f, "directory"),
        }
    }
}

/// The persisted journal document.
///
/// Records stay raw JSON until asked for, so one damaged record never takes
/// its neighbours down with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub entries: BTreeMap<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl JournalData {
    /// Strict parse: malformed JSON is an error.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Fail-soft parse: malformed JSON reads as an empty journal.
    pub fn parse_lenient(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "journal document is corrupt, reading it as empty");
                Self::default()
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The record stored for `key`. A damaged record reads as absent.
    pub fn get(&self, key: &DayKey) -> Option<EntryRecord> {
        let raw_key = key.to_string();
        let value = self.entries.get(&raw_key)?;
        decode_record(&raw_key, value).ok()
    }

    pub fn insert(&mut self, key: &DayKey, record: EntryRecord) -> Result<()> {
        self.entries
            .insert(key.to_string(), serde_json::to_value(record)?);
        Ok(())
    }

    /// Removes whatever is stored under `key`, damaged or not.
    pub fn remove(&mut self, key: &DayKey) -> bool {
        self.entries.remove(&key.to_string()).is_some()
    }

    /// Entries under valid day keys. Unknown keys and damaged records are
    /// skipped.
    pub fn entry_map(&self) -> EntryMap {
        let mut map = EntryMap::new();
        for (raw_key, value) in &self.entries {
            let Ok(key) = raw_key.parse::<DayKey>() else {
                tracing::debug!(key = %raw_key, "skipping entry with unrecognized key");
                continue;
            };
            match decode_record(raw_key, value) {
                Ok(record) => {
                    map.insert(key, record);
                }
                Err(e) => tracing::warn!(key = %raw_key, error = %e, "skipping damaged entry"),
            }
        }
        map
    }

    /// Like [`entry_map`](Self::entry_map), but a damaged record under a day
    /// key is an error. Used before the source of a migration is cleared.
    pub fn strict_entry_map(&self) -> Result<EntryMap> {
        let mut map = EntryMap::new();
        for (raw_key, value) in &self.entries {
            if let Ok(key) = raw_key.parse::<DayKey>() {
                map.insert(key, decode_record(raw_key, value)?);
            }
        }
        Ok(map)
    }
}

fn decode_record(raw_key: &str, value: &Value) -> Result<EntryRecord> {
    EntryRecord::deserialize(value)
        .map_err(|e| JournalError::Store(format!("entry {} is damaged: {}", raw_key, e)))
}
