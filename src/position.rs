//! Writes pointer-driven geometry back onto a component.

use serde_json::Value;

use crate::model::Component;

/// Pixel offsets produced by a drag or resize. Absent values are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn offset(top: f64, left: f64) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("top", self.top),
            ("left", self.left),
            ("width", self.width),
            ("height", self.height),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
    }
}

/// Store every present dimension as a `"<n>px"` string in the component's
/// position attributes. Returns how many values were written.
pub fn commit_position(component: &mut Component, dimensions: &Dimensions) -> usize {
    if dimensions.entries().next().is_none() {
        return 0;
    }
    let position = component.position_mut();
    let mut written = 0;
    for (key, value) in dimensions.entries() {
        position.insert(key.to_string(), Value::String(format!("{value}px")));
        written += 1;
    }
    written
}
