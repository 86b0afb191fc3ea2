use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::LabelError,
    log_debug, log_info,
    models::{Label, LabelCategory, LabelUpdate, Segment},
};

const ENABLE_LOGS: bool = true;

/// Checks `0 <= start < end <= duration` with finite bounds.
pub fn validate_interval(start: f64, end: f64, duration: f64) -> Result<(), LabelError> {
    let valid = start.is_finite()
        && end.is_finite()
        && start >= 0.0
        && start < end
        && end <= duration;
    if valid {
        Ok(())
    } else {
        Err(LabelError::InvalidInterval {
            start,
            end,
            duration,
        })
    }
}

/// Authoritative collection of labels for the active signal.
///
/// Labels are kept in insertion order; [`LabelStore::list`] sorts by start
/// time on read. Overlapping intervals are accepted as-is and never merged.
#[derive(Debug, Clone)]
pub struct LabelStore {
    duration: f64,
    labels: Vec<Label>,
}

impl LabelStore {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            labels: Vec::new(),
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.labels.iter().any(|label| label.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.id == id)
    }

    /// Creates a label under a freshly allocated id.
    pub fn add(
        &mut self,
        segment: Segment,
        category: &LabelCategory,
        description: Option<String>,
    ) -> Result<Label, LabelError> {
        let id = self.allocate_id();
        self.add_with_id(id, segment, category, description)
    }

    /// Creates a label under a caller-chosen id, rejecting ids already in use.
    pub fn add_with_id(
        &mut self,
        id: String,
        segment: Segment,
        category: &LabelCategory,
        description: Option<String>,
    ) -> Result<Label, LabelError> {
        validate_interval(segment.start_time, segment.end_time, self.duration)?;
        if self.contains(&id) {
            return Err(LabelError::DuplicateId(id));
        }

        let now = Utc::now();
        let label = Label {
            id,
            start_time: segment.start_time,
            end_time: segment.end_time,
            category: category.name.clone(),
            color: category.color.clone(),
            description: description
                .filter(|text| !text.trim().is_empty())
                .or_else(|| Some(category.description.clone())),
            created_at: now,
            updated_at: now,
        };

        log_info!(
            "Added {} label {} [{:.3}, {:.3})",
            label.category,
            label.id,
            label.start_time,
            label.end_time
        );
        self.labels.push(label.clone());
        Ok(label)
    }

    /// Merges `update` into the label. On failure the label is left untouched.
    pub fn edit(&mut self, id: &str, update: LabelUpdate) -> Result<Label, LabelError> {
        let duration = self.duration;
        let label = self
            .labels
            .iter_mut()
            .find(|label| label.id == id)
            .ok_or_else(|| LabelError::NotFound(id.to_string()))?;

        if update.is_empty() {
            return Ok(label.clone());
        }

        let mut merged = label.clone();
        if let Some(category) = update.category {
            merged.category = category;
        }
        if let Some(color) = update.color {
            merged.color = color;
        }
        if let Some(description) = update.description {
            merged.description = description;
        }
        if let Some(start) = update.start_time {
            merged.start_time = start;
        }
        if let Some(end) = update.end_time {
            merged.end_time = end;
        }
        validate_interval(merged.start_time, merged.end_time, duration)?;

        merged.updated_at = Utc::now();
        *label = merged.clone();
        log_info!("Edited label {}", id);
        Ok(merged)
    }

    /// Removes the label if present. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|label| label.id != id);
        let removed = self.labels.len() != before;
        if removed {
            log_info!("Deleted label {}", id);
        } else {
            log_debug!("Delete of unknown label {} ignored", id);
        }
        removed
    }

    /// Labels ordered by start time, ties in insertion order.
    pub fn list(&self) -> Vec<Label> {
        let mut labels = self.labels.clone();
        labels.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
        labels
    }

    /// The most recently added label still in the store.
    pub fn last_added(&self) -> Option<&Label> {
        self.labels.last()
    }

    /// Labels whose interval covers `time`, in display order.
    pub fn labels_at(&self, time: f64) -> Vec<Label> {
        self.list()
            .into_iter()
            .filter(|label| label.contains(time))
            .collect()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Empties the store and rebinds it to a new signal duration.
    pub fn reset(&mut self, duration: f64) {
        self.labels.clear();
        self.duration = duration;
    }

    fn allocate_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;

    fn anomaly() -> LabelCategory {
        default_categories().remove(1)
    }

    fn store_with(intervals: &[(f64, f64)]) -> LabelStore {
        let mut store = LabelStore::new(10.0);
        for &(start, end) in intervals {
            store
                .add(Segment::new(start, end), &anomaly(), None)
                .expect("valid interval");
        }
        store
    }

    #[test]
    fn add_snapshots_category_fields() {
        let mut store = LabelStore::new(10.0);
        let category = anomaly();
        let label = store.add(Segment::new(2.0, 3.0), &category, None).unwrap();
        assert_eq!(label.category, "Anomaly");
        assert_eq!(label.color, "#ef4444");
        assert_eq!(label.description.as_deref(), Some("Abnormal pattern detected"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_keeps_user_description() {
        let mut store = LabelStore::new(10.0);
        let label = store
            .add(Segment::new(2.0, 3.0), &anomaly(), Some("arrhythmia".into()))
            .unwrap();
        assert_eq!(label.description.as_deref(), Some("arrhythmia"));
    }

    #[test]
    fn add_rejects_invalid_intervals() {
        let mut store = LabelStore::new(10.0);
        for (start, end) in [(3.0, 3.0), (4.0, 3.0), (-0.1, 1.0), (9.0, 10.01), (f64::NAN, 1.0)] {
            let result = store.add(Segment::new(start, end), &anomaly(), None);
            assert!(
                matches!(result, Err(LabelError::InvalidInterval { .. })),
                "({start}, {end}) accepted"
            );
        }
        assert!(store.is_empty());
    }

    #[test]
    fn add_accepts_full_signal_span() {
        let mut store = LabelStore::new(10.0);
        assert!(store.add(Segment::new(0.0, 10.0), &anomaly(), None).is_ok());
    }

    #[test]
    fn add_with_id_rejects_duplicates() {
        let mut store = LabelStore::new(10.0);
        store
            .add_with_id("a".into(), Segment::new(1.0, 2.0), &anomaly(), None)
            .unwrap();
        let result = store.add_with_id("a".into(), Segment::new(3.0, 4.0), &anomaly(), None);
        assert_eq!(result, Err(LabelError::DuplicateId("a".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn allocated_ids_are_unique() {
        let store = store_with(&[(0.0, 1.0), (0.5, 1.5), (1.0, 2.0), (2.0, 3.0)]);
        let mut ids: Vec<_> = store.list().into_iter().map(|l| l.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn list_sorts_by_start_with_stable_ties() {
        let mut store = LabelStore::new(10.0);
        let late = store.add(Segment::new(5.0, 6.0), &anomaly(), None).unwrap();
        let tie_a = store.add(Segment::new(1.0, 4.0), &anomaly(), None).unwrap();
        let tie_b = store.add(Segment::new(1.0, 2.0), &anomaly(), None).unwrap();

        let order: Vec<_> = store.list().into_iter().map(|l| l.id).collect();
        assert_eq!(order, vec![tie_a.id, tie_b.id, late.id]);
    }

    #[test]
    fn overlapping_labels_are_kept_separately() {
        let store = store_with(&[(1.0, 3.0), (2.0, 4.0)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.labels_at(2.5).len(), 2);
        assert_eq!(store.labels_at(3.0).len(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = store_with(&[(1.0, 2.0), (3.0, 4.0)]);
        let id = store.list()[0].id.clone();

        assert!(store.delete(&id));
        let after_first = store.list();
        assert!(!store.delete(&id));
        assert_eq!(store.list(), after_first);
        assert!(!store.delete("never-existed"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn edit_merges_fields() {
        let mut store = store_with(&[(1.0, 2.0)]);
        let id = store.list()[0].id.clone();
        let peak = default_categories().remove(4);

        let edited = store.edit(&id, LabelUpdate::recategorize(&peak)).unwrap();
        assert_eq!(edited.category, "Peak");
        assert_eq!(edited.color, peak.color);
        assert_eq!(edited.start_time, 1.0);

        let edited = store.edit(&id, LabelUpdate::describe(None)).unwrap();
        assert_eq!(edited.description, None);

        let edited = store
            .edit(&id, LabelUpdate::retime(Segment::new(0.5, 9.5)))
            .unwrap();
        assert_eq!((edited.start_time, edited.end_time), (0.5, 9.5));
    }

    #[test]
    fn failed_edit_leaves_label_unchanged() {
        let mut store = store_with(&[(1.0, 2.0)]);
        let before = store.list()[0].clone();
        let update = LabelUpdate {
            category: Some("Noise".into()),
            end_time: Some(0.5),
            ..LabelUpdate::default()
        };
        assert!(matches!(
            store.edit(&before.id, update),
            Err(LabelError::InvalidInterval { .. })
        ));
        assert_eq!(store.get(&before.id), Some(&before));
    }

    #[test]
    fn edit_of_unknown_id_is_not_found() {
        let mut store = LabelStore::new(10.0);
        assert_eq!(
            store.edit("ghost", LabelUpdate::describe(None)),
            Err(LabelError::NotFound("ghost".into()))
        );
    }

    #[test]
    fn reset_rebinds_duration() {
        let mut store = store_with(&[(1.0, 9.0)]);
        store.reset(2.0);
        assert!(store.is_empty());
        assert!(store.add(Segment::new(1.0, 3.0), &anomaly(), None).is_err());
        assert!(store.add(Segment::new(1.0, 2.0), &anomaly(), None).is_ok());
    }

    #[test]
    fn last_added_follows_insertion_order() {
        let mut store = LabelStore::new(10.0);
        store.add(Segment::new(6.0, 7.0), &anomaly(), None).unwrap();
        let second = store.add(Segment::new(1.0, 2.0), &anomaly(), None).unwrap();
        assert_eq!(store.last_added().map(|l| l.id.as_str()), Some(second.id.as_str()));
    }

    #[test]
    fn clear_empties_but_keeps_duration() {
        let mut store = store_with(&[(1.0, 2.0), (3.0, 4.0)]);
        store.clear();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert_eq!(store.duration(), 10.0);
        assert!(store.add(Segment::new(9.0, 10.0), &anomaly(), None).is_ok());
    }

}
