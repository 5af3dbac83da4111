use std::{collections::BTreeMap, fmt, str::FromStr};

use num::{NumCast, PrimInt};
use serde::{Deserialize, Serialize};

use crate::error::ParseStatusError;

/// Document identifier
/// Negative values are rejected at insertion time.
pub type DocumentId = i32;

/// Moderation status of a stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    #[serde(alias = "ACTUAL")]
    Actual,
    #[serde(alias = "IRRELEVANT")]
    Irrelevant,
    #[serde(alias = "BANNED")]
    Banned,
    #[serde(alias = "REMOVED")]
    Removed,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentStatus::Actual => "ACTUAL",
            DocumentStatus::Irrelevant => "IRRELEVANT",
            DocumentStatus::Banned => "BANNED",
            DocumentStatus::Removed => "REMOVED",
        };
        write!(f, "DocumentStatus::{}", name)
    }
}

impl FromStr for DocumentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "actual" => Ok(DocumentStatus::Actual),
            "irrelevant" => Ok(DocumentStatus::Irrelevant),
            "banned" => Ok(DocumentStatus::Banned),
            "removed" => Ok(DocumentStatus::Removed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// One ranked search result
/// Recomputed on every search, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self { id, relevance, rating }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Data kept per stored document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentData {
    /// average rating (saturating sum / count)
    pub rating: i32,
    pub status: DocumentStatus,
    /// term -> normalized term frequency
    /// empty when the document has no indexable tokens
    pub word_freqs: BTreeMap<String, f64>,
}

/// Add `x` to `sum`, clamping to the type's MIN/MAX instead of overflowing.
#[inline]
pub fn secure_sum<T: PrimInt>(sum: T, x: T) -> T {
    let zero = T::zero();
    if sum < zero && x < zero && T::min_value() - x > sum {
        T::min_value()
    } else if sum > zero && x > zero && T::max_value() - x < sum {
        T::max_value()
    } else {
        sum + x
    }
}

/// Average of `ratings` using [`secure_sum`] accumulation and integer division.
/// Returns zero for an empty slice.
pub fn compute_average_rating<T: PrimInt>(ratings: &[T]) -> T {
    if ratings.is_empty() {
        return T::zero();
    }
    let sum = ratings.iter().fold(T::zero(), |acc, &x| secure_sum(acc, x));
    // 件数が T に収まらない場合 |sum| <= MAX < count なので平均は 0
    <T as NumCast>::from(ratings.len()).map_or(T::zero(), |count| sum / count)
}
