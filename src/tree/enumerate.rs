use crate::model::{Component, Room};

use super::MAX_DEPTH;

/// A component paired with the name of the top-level room that holds it.
#[derive(Debug, Clone, Copy)]
pub struct ComponentEntry<'a> {
    pub component: &'a Component,
    pub room_name: &'a str,
}

/// Flatten the forest into depth-first order.
///
/// Components without an identifier are descended into but not reported.
pub fn collect_all(forest: &[Room]) -> Vec<ComponentEntry<'_>> {
    collect_all_within(forest, MAX_DEPTH)
}

pub fn collect_all_within(forest: &[Room], max_depth: usize) -> Vec<ComponentEntry<'_>> {
    let mut entries = Vec::new();
    for room in forest {
        walk(&room.components, 1, max_depth, &mut |component, _| {
            if !component.id.is_empty() {
                entries.push(ComponentEntry {
                    component,
                    room_name: &room.name,
                });
            }
        });
    }
    entries
}

/// Run `visit` on every identified component in `list`, parents before
/// children.
pub fn visit_all<F>(list: &mut [Component], mut visit: F)
where
    F: FnMut(&mut Component),
{
    walk_mut(list, 1, MAX_DEPTH, &mut visit);
}

/// [`visit_all`] over every room of the forest.
pub fn visit_forest<F>(forest: &mut [Room], visit: F)
where
    F: FnMut(&mut Component),
{
    visit_forest_within(forest, MAX_DEPTH, visit);
}

pub fn visit_forest_within<F>(forest: &mut [Room], max_depth: usize, mut visit: F)
where
    F: FnMut(&mut Component),
{
    for room in forest.iter_mut() {
        walk_mut(&mut room.components, 1, max_depth, &mut visit);
    }
}

pub(super) fn walk<'a, F>(list: &'a [Component], depth: usize, max_depth: usize, visit: &mut F)
where
    F: FnMut(&'a Component, usize),
{
    if depth > max_depth {
        return;
    }
    for component in list {
        visit(component, depth);
        if let Some(payload) = component.payload() {
            for child in payload.lists() {
                walk(child, depth + 1, max_depth, visit);
            }
        }
    }
}

fn walk_mut<F>(list: &mut [Component], depth: usize, max_depth: usize, visit: &mut F)
where
    F: FnMut(&mut Component),
{
    if depth > max_depth {
        return;
    }
    for component in list.iter_mut() {
        if !component.id.is_empty() {
            visit(component);
        }
        if let Some(payload) = component.payload_mut() {
            for child in payload.lists_mut() {
                walk_mut(child, depth + 1, max_depth, visit);
            }
        }
    }
}
