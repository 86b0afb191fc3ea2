use serde::{Deserialize, Serialize};

/// A tag users attach to labels. Read-only configuration to the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelCategory {
    pub id: String,
    pub name: String,
    pub color: String,
    pub description: String,
}

impl LabelCategory {
    pub fn new(id: &str, name: &str, color: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        }
    }
}

/// The stock catalog. Position in this list is the quick-label hotkey
/// (`1` for the first entry).
pub fn default_categories() -> Vec<LabelCategory> {
    vec![
        LabelCategory::new("normal", "Normal", "#10b981", "Normal signal behavior"),
        LabelCategory::new("anomaly", "Anomaly", "#ef4444", "Abnormal pattern detected"),
        LabelCategory::new("transition", "Transition", "#f59e0b", "State transition period"),
        LabelCategory::new("noise", "Noise", "#6b7280", "Noisy or unclear signal"),
        LabelCategory::new("peak", "Peak", "#8b5cf6", "Peak or spike in signal"),
        LabelCategory::new("baseline", "Baseline", "#3b82f6", "Baseline reference period"),
    ]
}

pub fn find_category<'a>(catalog: &'a [LabelCategory], name: &str) -> Option<&'a LabelCategory> {
    catalog
        .iter()
        .find(|category| category.name.eq_ignore_ascii_case(name) || category.id == name)
}
