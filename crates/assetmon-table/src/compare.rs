//! Record ordering.
//!
//! String fields are compared the way an operator expects a table to sort:
//! runs of digits compare by numeric value ("Asset 2" < "Asset 10"), letters
//! compare case-insensitively first, and punctuation sorts before digits,
//! which sort before letters. Remaining ties are broken so that the order is
//! total: lower case before upper case, then raw code points.

use crate::error::{TableError, TableResult};
use assetmon_core::{AssetField, AssetRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Apply this direction to an ascending ordering.
    pub fn apply(self, ascending: Ordering) -> Ordering {
        match self {
            Self::Ascending => ascending,
            Self::Descending => ascending.reverse(),
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = TableError;

    fn from_str(s: &str) -> TableResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(TableError::InvalidDirection(other.to_string())),
        }
    }
}

/// Compare two records by `key` in `direction`.
///
/// Equal keys fall back to `id` in the same direction, so for a collection
/// with unique ids the descending order is exactly the reversed ascending
/// order.
pub fn compare_records(
    a: &AssetRecord,
    b: &AssetRecord,
    key: AssetField,
    direction: SortDirection,
) -> Ordering {
    let ascending = natural_cmp(a.field(key), b.field(key)).then_with(|| {
        if key == AssetField::Id {
            Ordering::Equal
        } else {
            natural_cmp(&a.id, &b.id)
        }
    });
    direction.apply(ascending)
}

/// Numeric-aware, case-insensitive string comparison with a total tie-break.
///
/// Returns `Equal` only for identical strings.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    primary_cmp(a, b)
        .then_with(|| case_cmp(a, b))
        .then_with(|| a.cmp(b))
}

/// Character class rank: whitespace/punctuation < digits < letters < other.
fn class_rank(c: char) -> u8 {
    if c.is_whitespace() || c.is_ascii_punctuation() {
        0
    } else if c.is_numeric() {
        1
    } else if c.is_alphabetic() {
        2
    } else {
        3
    }
}

fn fold(c: char) -> (u8, char) {
    (class_rank(c), c.to_lowercase().next().unwrap_or(c))
}

fn primary_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek().copied(), b_chars.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let run_a = take_digits(&mut a_chars);
                let run_b = take_digits(&mut b_chars);
                let ord = compare_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = fold(ca).cmp(&fold(cb));
                if ord != Ordering::Equal {
                    return ord;
                }
                a_chars.next();
                b_chars.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

/// Compare two ASCII digit runs by value; "007" and "7" are equal here.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Lower case sorts before upper case at the first case-only difference.
fn case_cmp(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        if ca.is_lowercase() && cb.is_uppercase() {
            return Ordering::Less;
        }
        if ca.is_uppercase() && cb.is_lowercase() {
            return Ordering::Greater;
        }
        return Ordering::Equal;
    }
    Ordering::Equal
}
