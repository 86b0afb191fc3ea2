//! Label-related data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LabelCategory;

/// A categorized annotation over `[start_time, end_time)` of a signal.
///
/// `category`, `color` and the default description are copies taken from
/// the catalog when the label was created, so later catalog edits never
/// reach existing labels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub start_time: f64,
    pub end_time: f64,
    pub category: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Label {
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn midpoint(&self) -> f64 {
        (self.start_time + self.end_time) / 2.0
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    pub fn segment(&self) -> Segment {
        Segment {
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// A candidate interval that has not been committed as a label yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub start_time: f64,
    pub end_time: f64,
}

impl Segment {
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Builds a segment from two times in either order.
    pub fn spanning(a: f64, b: f64) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Partial update merged into an existing label by `LabelStore::edit`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LabelUpdate {
    pub category: Option<String>,
    pub color: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl LabelUpdate {
    /// Reassigns the label to `category`, snapshotting its color.
    pub fn recategorize(category: &LabelCategory) -> Self {
        Self {
            category: Some(category.name.clone()),
            color: Some(category.color.clone()),
            ..Self::default()
        }
    }

    pub fn describe(description: Option<String>) -> Self {
        Self {
            description: Some(description),
            ..Self::default()
        }
    }

    pub fn retime(segment: Segment) -> Self {
        Self {
            start_time: Some(segment.start_time),
            end_time: Some(segment.end_time),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.color.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }
}
