//! Retention entry model
//!
//! A retention entry is one stored version of one tracked item, named
//! `<base_name>.<generation>` inside the retention store.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;

use super::plan::RetentionKind;

/// Date format used for dated generation suffixes
pub const DATE_SUFFIX_FORMAT: &str = "%Y-%m-%d";

/// Position of an entry in its retention chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generation {
    /// Numbered generation, 0 = newest
    Number(u32),
    /// Calendar date of a dated backup
    Date(NaiveDate),
}

impl Generation {
    /// Parse a generation suffix (the part after `<base_name>.`)
    ///
    /// Numbered suffixes are canonical decimal numbers: ASCII digits with no
    /// leading zero (except `0` itself), small enough to be aged by one more
    /// generation. Dated suffixes are exactly `YYYY-MM-DD` and must name a
    /// real calendar day. Anything else belongs to an unrelated file.
    pub fn parse_suffix(suffix: &str, kind: RetentionKind) -> Option<Self> {
        match kind {
            RetentionKind::ByCount => {
                if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                if suffix.len() > 1 && suffix.starts_with('0') {
                    return None;
                }
                suffix
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n < u32::MAX)
                    .map(Self::Number)
            }
            RetentionKind::ByAge => {
                let bytes = suffix.as_bytes();
                let shaped = bytes.len() == 10
                    && bytes.iter().enumerate().all(|(i, b)| match i {
                        4 | 7 => *b == b'-',
                        _ => b.is_ascii_digit(),
                    });
                if !shaped {
                    return None;
                }
                NaiveDate::parse_from_str(suffix, DATE_SUFFIX_FORMAT)
                    .ok()
                    .map(Self::Date)
            }
        }
    }

    /// Numbered generation, if this is one
    pub fn as_number(&self) -> Option<u32> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Date(_) => None,
        }
    }

    /// Date of a dated generation, if this is one
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Number(_) => None,
            Self::Date(d) => Some(*d),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Date(d) => write!(f, "{}", d.format(DATE_SUFFIX_FORMAT)),
        }
    }
}

/// One stored version of a tracked item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionEntry {
    /// File name of the tracked item (or `save_as` of a tracked directory)
    pub base_name: String,
    /// Generation of this version
    pub generation: Generation,
    /// Full path inside the retention store
    pub path: PathBuf,
}

impl RetentionEntry {
    /// File name an entry for `base_name` at `generation` is stored under
    pub fn file_name(base_name: &str, generation: &Generation) -> String {
        format!("{}.{}", base_name, generation)
    }

    /// Match a file name against `<base_name>.<generation>`
    ///
    /// The base name must match exactly; anything between it and a valid
    /// generation suffix (e.g. `notes.txt.bak.1` for `notes.txt`) is rejected.
    pub fn match_file_name(
        base_name: &str,
        file_name: &str,
        kind: RetentionKind,
    ) -> Option<Generation> {
        let suffix = file_name.strip_prefix(base_name)?.strip_prefix('.')?;
        Generation::parse_suffix(suffix, kind)
    }

    /// Age in whole days relative to `today`, for dated entries
    ///
    /// Future-dated entries have a negative age.
    pub fn age_in_days(&self, today: NaiveDate) -> Option<i64> {
        self.generation
            .as_date()
            .map(|date| today.signed_duration_since(date).num_days())
    }
}
