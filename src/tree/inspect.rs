use std::collections::HashSet;

use crate::model::Room;

use super::enumerate::walk;

/// Structural health of a forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestReport {
    pub component_count: usize,
    /// Identifiers seen more than once, in first-repeat order.
    pub duplicate_ids: Vec<String>,
    pub deepest: usize,
    /// Some container at the depth limit still has children.
    pub depth_exceeded: bool,
}

impl ForestReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty() && !self.depth_exceeded
    }
}

pub fn inspect_forest(forest: &[Room], max_depth: usize) -> ForestReport {
    let mut report = ForestReport::default();
    let mut seen = HashSet::new();
    let mut repeated = HashSet::new();

    for room in forest {
        walk(&room.components, 1, max_depth, &mut |component, depth| {
            report.component_count += 1;
            report.deepest = report.deepest.max(depth);
            if !seen.insert(component.id.as_str()) && repeated.insert(component.id.as_str()) {
                report.duplicate_ids.push(component.id.clone());
            }
            if depth == max_depth
                && component
                    .payload()
                    .is_some_and(|payload| payload.lists().any(|list| !list.is_empty()))
            {
                report.depth_exceeded = true;
            }
        });
    }
    report
}
