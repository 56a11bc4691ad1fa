use crate::handle::ContainerHandle;
use crate::model::{Component, ContainerPayload, Node, NodeMut, Room};

use super::MAX_DEPTH;

/// One hop below a room: which child list of the parent, then which entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub list: usize,
    pub index: usize,
}

/// Index path from the room list to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    pub room: usize,
    pub steps: Vec<PathStep>,
}

impl NodePath {
    /// Nesting level of the node; rooms are level zero.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }
}

/// List that should receive a newly created component.
#[derive(Debug)]
pub enum InsertionTarget<'a> {
    List(&'a mut Vec<Component>),
    /// The handle names a slot the multi container has not created yet.
    Unallocated { slot: usize },
}

impl<'a> InsertionTarget<'a> {
    pub fn into_list(self) -> Option<&'a mut Vec<Component>> {
        match self {
            InsertionTarget::List(list) => Some(list),
            InsertionTarget::Unallocated { .. } => None,
        }
    }

    pub fn is_unallocated(&self) -> bool {
        matches!(self, InsertionTarget::Unallocated { .. })
    }

    /// Number of components already in the target; zero when unallocated.
    pub fn len(&self) -> usize {
        match self {
            InsertionTarget::List(list) => list.len(),
            InsertionTarget::Unallocated { .. } => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Locate a node depth-first, left to right.
///
/// Rooms match on the decimal form of their `ID` before their components are
/// searched. With duplicate component IDs the first match in traversal order
/// wins.
pub fn find_path(forest: &[Room], id: &str) -> Option<NodePath> {
    find_path_within(forest, id, MAX_DEPTH)
}

pub fn find_path_within(forest: &[Room], id: &str, max_depth: usize) -> Option<NodePath> {
    let mut steps = Vec::new();
    for (room_idx, room) in forest.iter().enumerate() {
        if room.id.to_string() == id {
            return Some(NodePath {
                room: room_idx,
                steps,
            });
        }
        if search_list(&room.components, 0, id, 1, max_depth, &mut steps) {
            return Some(NodePath {
                room: room_idx,
                steps,
            });
        }
    }
    None
}

fn search_list(
    list: &[Component],
    list_idx: usize,
    id: &str,
    depth: usize,
    max_depth: usize,
    steps: &mut Vec<PathStep>,
) -> bool {
    if depth > max_depth {
        return false;
    }

    for (index, component) in list.iter().enumerate() {
        steps.push(PathStep {
            list: list_idx,
            index,
        });
        if component.id == id {
            return true;
        }
        if let Some(payload) = component.payload() {
            for (child_idx, child) in payload.lists().enumerate() {
                if search_list(child, child_idx, id, depth + 1, max_depth, steps) {
                    return true;
                }
            }
        }
        steps.pop();
    }
    false
}

pub fn resolve<'a>(forest: &'a [Room], path: &NodePath) -> Option<Node<'a>> {
    let room = forest.get(path.room)?;
    let Some((first, rest)) = path.steps.split_first() else {
        return Some(Node::Room(room));
    };

    let mut current = room.components.get(first.index)?;
    for step in rest {
        current = current.payload()?.list(step.list)?.get(step.index)?;
    }
    Some(Node::Component(current))
}

pub fn resolve_mut<'a>(forest: &'a mut [Room], path: &NodePath) -> Option<NodeMut<'a>> {
    let room = forest.get_mut(path.room)?;
    let Some((first, rest)) = path.steps.split_first() else {
        return Some(NodeMut::Room(room));
    };

    let mut current = room.components.get_mut(first.index)?;
    for step in rest {
        current = current.payload_mut()?.list_mut(step.list)?.get_mut(step.index)?;
    }
    Some(NodeMut::Component(current))
}

/// Find a room or component by identifier. Returns the node itself, not a copy.
pub fn find_by_id<'a>(forest: &'a [Room], id: &str) -> Option<Node<'a>> {
    find_by_id_within(forest, id, MAX_DEPTH)
}

pub fn find_by_id_within<'a>(forest: &'a [Room], id: &str, max_depth: usize) -> Option<Node<'a>> {
    let path = find_path_within(forest, id, max_depth)?;
    resolve(forest, &path)
}

pub fn find_by_id_mut<'a>(forest: &'a mut [Room], id: &str) -> Option<NodeMut<'a>> {
    find_by_id_mut_within(forest, id, MAX_DEPTH)
}

pub fn find_by_id_mut_within<'a>(
    forest: &'a mut [Room],
    id: &str,
    max_depth: usize,
) -> Option<NodeMut<'a>> {
    let path = find_path_within(forest, id, max_depth)?;
    resolve_mut(forest, &path)
}

/// Convenience lookup restricted to components.
pub fn find_component<'a>(forest: &'a [Room], id: &str) -> Option<&'a Component> {
    find_component_within(forest, id, MAX_DEPTH)
}

pub fn find_component_within<'a>(
    forest: &'a [Room],
    id: &str,
    max_depth: usize,
) -> Option<&'a Component> {
    find_by_id_within(forest, id, max_depth)?.as_component()
}

pub fn find_component_mut<'a>(forest: &'a mut [Room], id: &str) -> Option<&'a mut Component> {
    find_component_mut_within(forest, id, MAX_DEPTH)
}

pub fn find_component_mut_within<'a>(
    forest: &'a mut [Room],
    id: &str,
    max_depth: usize,
) -> Option<&'a mut Component> {
    find_by_id_mut_within(forest, id, max_depth)?.into_component()
}

/// Resolve a rendering-layer container handle to the list that receives new
/// components.
///
/// Rooms hand out their own component list, single containers their child
/// list, multi containers the slot named by the handle's leading index.
/// Returns `None` for malformed handles, unknown owners, leaf owners, and
/// multi containers addressed without a slot index.
pub fn find_owning_container<'a>(
    forest: &'a mut [Room],
    handle: &str,
) -> Option<InsertionTarget<'a>> {
    find_owning_container_within(forest, handle, MAX_DEPTH)
}

pub fn find_owning_container_within<'a>(
    forest: &'a mut [Room],
    handle: &str,
    max_depth: usize,
) -> Option<InsertionTarget<'a>> {
    let handle = ContainerHandle::parse(handle)?;
    let path = find_path_within(forest, handle.owner_id(), max_depth)?;

    match resolve_mut(forest, &path)? {
        NodeMut::Room(room) => Some(InsertionTarget::List(&mut room.components)),
        NodeMut::Component(component) => match component.payload_mut()? {
            ContainerPayload::Single(list) => Some(InsertionTarget::List(list)),
            ContainerPayload::Multi(slots) => {
                let slot = handle.slot()?;
                Some(match slots.get_mut(slot) {
                    Some(found) => InsertionTarget::List(&mut found.components),
                    None => InsertionTarget::Unallocated { slot },
                })
            }
        },
    }
}

/// Whether `node_id` lies strictly inside the subtree of `edit_root_id`.
pub fn editable(forest: &[Room], node_id: &str, edit_root_id: &str) -> bool {
    editable_within(forest, node_id, edit_root_id, MAX_DEPTH)
}

/// [`editable`] with an explicit cap. Depth counts from the room, not from
/// the edit root.
pub fn editable_within(forest: &[Room], node_id: &str, edit_root_id: &str, max_depth: usize) -> bool {
    let Some(path) = find_path_within(forest, edit_root_id, max_depth) else {
        return false;
    };
    let Some(root) = resolve(forest, &path) else {
        return false;
    };
    let child_depth = path.depth() + 1;
    let mut steps = Vec::new();
    root.child_lists().into_iter().enumerate().any(|(list_idx, list)| {
        steps.clear();
        search_list(list, list_idx, node_id, child_depth, max_depth, &mut steps)
    })
}

/// Whether `node_id` exists and is itself the active edit root.
pub fn is_edit_root(forest: &[Room], node_id: &str, edit_root_id: &str) -> bool {
    is_edit_root_within(forest, node_id, edit_root_id, MAX_DEPTH)
}

pub fn is_edit_root_within(
    forest: &[Room],
    node_id: &str,
    edit_root_id: &str,
    max_depth: usize,
) -> bool {
    find_by_id_within(forest, node_id, max_depth).is_some_and(|node| node.id() == edit_root_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forest() -> Vec<Room> {
        vec![
            Room::new(0, "_a", "Home").with_components(vec![
                Component::new("clock"),
                Component::single(
                    "popup",
                    vec![
                        Component::new("inner"),
                        Component::multi(
                            "tabs",
                            vec![
                                vec![Component::new("t0")],
                                vec![Component::new("t1a"), Component::new("t1b")],
                                vec![],
                                vec![],
                            ],
                        ),
                    ],
                ),
            ]),
            Room::new(1, "_b", "Kitchen").with_components(vec![Component::multi(
                "xyz",
                vec![vec![], vec![], vec![], vec![Component::new("deep")]],
            )]),
        ]
    }

    #[test]
    fn finds_components_across_shapes() {
        let forest = forest();
        for id in ["clock", "popup", "inner", "tabs", "t0", "t1b", "deep"] {
            let node = find_by_id(&forest, id).unwrap_or_else(|| panic!("missing {id}"));
            assert_eq!(node.id(), id);
        }
        assert!(find_by_id(&forest, "nope").is_none());
    }

    #[test]
    fn found_node_is_the_stored_node() {
        let forest = forest();
        let found = find_component(&forest, "t1a").unwrap();
        let stored = &forest[0].components[1].payload().unwrap().list(0).unwrap()[1]
            .payload()
            .unwrap()
            .list(1)
            .unwrap()[0];
        assert!(std::ptr::eq(found, stored));
    }

    #[test]
    fn rooms_match_on_decimal_id() {
        let forest = forest();
        let node = find_by_id(&forest, "1").unwrap();
        assert_eq!(node.as_room().unwrap().name, "Kitchen");
    }

    #[test]
    fn duplicate_ids_resolve_to_first_depth_first_match() {
        let mut forest = forest();
        forest[1].components.push(Component::new("inner"));
        forest[1].components[1]
            .extra
            .insert("marker".into(), serde_json::json!(true));

        let found = find_component(&forest, "inner").unwrap();
        assert!(found.extra.is_empty());
    }

    #[test]
    fn path_reports_slot_and_depth() {
        let forest = forest();
        let path = find_path(&forest, "t1b").unwrap();
        assert_eq!(path.room, 0);
        assert_eq!(path.depth(), 3);
        assert_eq!(
            path.steps,
            vec![
                PathStep { list: 0, index: 1 },
                PathStep { list: 0, index: 1 },
                PathStep { list: 1, index: 1 },
            ]
        );
    }

    #[test]
    fn depth_cap_stops_descent() {
        let forest = forest();
        assert!(find_path_within(&forest, "t0", 2).is_none());
        assert!(find_path_within(&forest, "t0", 3).is_some());
    }

    #[test]
    fn mutable_lookup_edits_in_place() {
        let mut forest = forest();
        let component = find_component_mut(&mut forest, "deep").unwrap();
        component
            .extra
            .insert("name".into(), serde_json::json!("renamed"));

        let again = find_component(&forest, "deep").unwrap();
        assert_eq!(again.extra.get("name"), Some(&serde_json::json!("renamed")));
    }

    #[test]
    fn swiper_handle_resolves_to_the_slot_list() {
        let mut forest = forest();
        let target = find_owning_container(&mut forest, "3_swiper_@xyz").unwrap();
        let list = target.into_list().unwrap();
        assert_eq!(list.len(), 1);
        list.push(Component::new("added"));

        let path = find_path(&forest, "added").unwrap();
        assert_eq!(path.steps.last(), Some(&PathStep { list: 3, index: 1 }));
    }

    #[test]
    fn room_handle_resolves_to_room_components() {
        let mut forest = forest();
        let target = find_owning_container(&mut forest, "room_@1").unwrap();
        assert_eq!(target.len(), 1);
    }

    #[test]
    fn single_container_handle_resolves_to_child_list() {
        let mut forest = forest();
        let list = find_owning_container(&mut forest, "popup_@popup")
            .and_then(InsertionTarget::into_list)
            .unwrap();
        assert_eq!(list[0].id, "inner");
    }

    #[test]
    fn missing_slot_is_unallocated_not_an_error() {
        let mut forest = forest();
        let target = find_owning_container(&mut forest, "9_swiper_@xyz").unwrap();
        assert!(target.is_unallocated());
        assert!(target.is_empty());
    }

    #[test]
    fn unresolvable_handles_yield_none() {
        let mut forest = forest();
        assert!(find_owning_container(&mut forest, "swiper").is_none());
        assert!(find_owning_container(&mut forest, "popup_@ghost").is_none());
        assert!(find_owning_container(&mut forest, "clock_@clock").is_none());
        assert!(find_owning_container(&mut forest, "swiper_@xyz").is_none());
    }

    #[test]
    fn editable_checks_subtree_of_edit_root() {
        let forest = forest();
        assert!(editable(&forest, "t1a", "popup"));
        assert!(editable(&forest, "t1a", "tabs"));
        assert!(editable(&forest, "clock", "0"));
        assert!(!editable(&forest, "popup", "popup"));
        assert!(!editable(&forest, "clock", "popup"));
        assert!(!editable(&forest, "deep", "0"));
        assert!(!editable(&forest, "clock", "ghost"));
    }

    #[test]
    fn edit_root_matches_only_itself() {
        let forest = forest();
        assert!(is_edit_root(&forest, "popup", "popup"));
        assert!(is_edit_root(&forest, "0", "0"));
        assert!(!is_edit_root(&forest, "inner", "popup"));
        assert!(!is_edit_root(&forest, "ghost", "ghost"));
    }

    /// One room holding a single-container chain `c1 > c2 > .. > leaf`, with
    /// `leaf` at nesting level `levels`.
    fn chain(levels: usize) -> Vec<Room> {
        let mut node = Component::new("leaf");
        for level in (1..levels).rev() {
            node = Component::single(format!("c{level}"), vec![node]);
        }
        vec![Room::new(0, "_a", "Home").with_components(vec![node])]
    }

    #[test]
    fn configured_depth_reaches_below_the_default_cap() {
        let mut forest = chain(MAX_DEPTH + 7);
        assert!(find_component(&forest, "leaf").is_none());
        assert!(find_component_within(&forest, "leaf", 100).is_some());
        assert!(find_component_mut_within(&mut forest, "leaf", 100).is_some());
        assert!(
            find_owning_container_within(&mut forest, "popup_@c70", 100)
                .is_some_and(|target| target.len() == 1)
        );
    }

    #[test]
    fn editable_counts_depth_from_the_room() {
        let forest = chain(5);
        assert!(editable_within(&forest, "c3", "c2", 3));
        assert!(!editable_within(&forest, "c4", "c2", 3));
        assert!(editable_within(&forest, "c4", "c2", 4));
        assert!(!is_edit_root_within(&forest, "c4", "c4", 3));
    }
}
