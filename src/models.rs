use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A daily record of any metric stream, keyed by calendar day
pub trait DailyRecord {
    /// Calendar day this record covers
    fn day(&self) -> NaiveDate;
}

/// Zero-default policy for numeric fields: absent and explicit-null both
/// deserialize to the type's default
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One day of sleep data
///
/// The upstream sleep score is 0-100 where higher means better sleep
/// quality. A record with the score absent upstream carries 0, matching the
/// permissive zero-default parsing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySleepRecord {
    /// Calendar day the score applies to
    pub day: NaiveDate,

    /// Sleep quality score (0-100, higher is better)
    #[serde(default, deserialize_with = "null_to_default")]
    pub score: u8,
}

/// One day of activity data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivityRecord {
    /// Calendar day the count applies to
    pub day: NaiveDate,

    /// Total step count for the day
    #[serde(default, deserialize_with = "null_to_default")]
    pub steps: u32,
}

/// One day of stress data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStressRecord {
    /// Calendar day the measurement applies to
    pub day: NaiveDate,

    /// Seconds of the day classified as high stress
    #[serde(default, deserialize_with = "null_to_default")]
    pub stress_high: u32,
}

impl DailyRecord for DailySleepRecord {
    fn day(&self) -> NaiveDate {
        self.day
    }
}

impl DailyRecord for DailyActivityRecord {
    fn day(&self) -> NaiveDate {
        self.day
    }
}

impl DailyRecord for DailyStressRecord {
    fn day(&self) -> NaiveDate {
        self.day
    }
}

/// An ordered sequence of daily records covering one trailing window
///
/// Order is insertion order as returned by the upstream API and is not
/// guaranteed chronological; callers that need day order (charts) sort a
/// copy via [`MetricWindow::day_sorted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricWindow<T> {
    records: Vec<T>,
}

impl<T> Default for MetricWindow<T> {
    fn default() -> Self {
        MetricWindow {
            records: Vec::new(),
        }
    }
}

impl<T> MetricWindow<T> {
    /// Empty window (no records returned upstream)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a window from records in upstream order
    pub fn from_records(records: Vec<T>) -> Self {
        MetricWindow { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Arithmetic mean of a per-record value, or None for an empty window
    pub fn average_by<F>(&self, f: F) -> Option<f64>
    where
        F: Fn(&T) -> f64,
    {
        if self.records.is_empty() {
            return None;
        }
        let sum: f64 = self.records.iter().map(f).sum();
        Some(sum / self.records.len() as f64)
    }
}

impl<T: DailyRecord + Clone> MetricWindow<T> {
    /// Records sorted by calendar day, for time-ordered rendering
    pub fn day_sorted(&self) -> Vec<T> {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|r| r.day());
        sorted
    }
}

impl<T> FromIterator<T> for MetricWindow<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        MetricWindow {
            records: iter.into_iter().collect(),
        }
    }
}

/// The three metric windows of one dashboard fetch
///
/// A bundle is fetched fresh on every aggregation request; nothing is cached
/// or persisted between cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    pub sleep: MetricWindow<DailySleepRecord>,
    pub activity: MetricWindow<DailyActivityRecord>,
    pub stress: MetricWindow<DailyStressRecord>,
}

impl MetricBundle {
    /// True iff all three windows carry at least one record
    ///
    /// The composite score is only defined in this case.
    pub fn is_complete(&self) -> bool {
        !self.sleep.is_empty() && !self.activity.is_empty() && !self.stress.is_empty()
    }
}

/// Profile fields returned by the upstream credential check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Upstream user identifier
    #[serde(default)]
    pub id: String,

    /// Age in years
    #[serde(default)]
    pub age: Option<u16>,

    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,

    /// Height in meters
    #[serde(default)]
    pub height: Option<f64>,
}
