use std::collections::HashSet;

use crate::model::{GroupRef, Room, RoomId};

/// A `groupRooms` entry dropped because it no longer resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct PrunedReference {
    /// `ID` of the group room at the time of pruning.
    pub group_id: RoomId,
    pub group_uid: String,
    pub reference: GroupRef,
}

/// Grouped view of the flat room list as shown by the editor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredView {
    /// Top-level rooms; group members are reachable only through their group.
    pub rooms: Vec<Room>,
    /// Stale references removed from the flat list while deriving.
    pub pruned: Vec<PrunedReference>,
}

/// Result of folding an edited structured view back into a flat list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitOutcome {
    /// New authoritative flat list, `ID`s renumbered `0..N`.
    pub rooms: Vec<Room>,
    pub pruned: Vec<PrunedReference>,
}

/// Derive the structured view from the flat list.
///
/// Members referenced by a group room are removed from the top level.
/// `groupRooms` on a room that is not a group is ignored. A reference is pruned from the flat list when its target is missing, is the
/// group itself, is a group room, or was already claimed by an earlier group.
/// Running this twice prunes nothing the second time.
pub fn derive_structured_view(flat: &mut [Room]) -> StructuredView {
    let mut claimed: HashSet<RoomId> = HashSet::new();
    let mut pruned = Vec::new();

    for idx in 0..flat.len() {
        if !flat[idx].is_group() {
            continue;
        }
        let Some(references) = flat[idx].group_rooms.take() else {
            continue;
        };
        let owner_id = flat[idx].id;

        let mut kept = Vec::with_capacity(references.len());
        for reference in references {
            let resolves = reference.id != owner_id
                && flat
                    .iter()
                    .any(|room| room.id == reference.id && !room.is_group())
                && claimed.insert(reference.id);
            if resolves {
                kept.push(reference);
            } else {
                pruned.push(PrunedReference {
                    group_id: owner_id,
                    group_uid: flat[idx].uid.clone(),
                    reference,
                });
            }
        }
        flat[idx].group_rooms = Some(kept);
    }

    let rooms = flat
        .iter()
        .filter(|room| !claimed.contains(&room.id))
        .cloned()
        .collect();

    StructuredView { rooms, pruned }
}

/// Fold an edited structured view back into a flat list.
///
/// Rooms are emitted in display order; each group room is followed by copies
/// of its members taken from `flat`. Rooms that no longer resolve against
/// `flat` are dropped, which is how deletion is expressed. Every emitted room
/// gets its output index as `ID`; `UID`s are left untouched and group
/// references are rewritten to the new `ID`s. A room that is not a group
/// leaves without `groupRooms`, since its old references would point at
/// renumbered rooms.
pub fn commit_structured_edits(structured: Vec<Room>, flat: &[Room]) -> CommitOutcome {
    let resolve = |id: RoomId| flat.iter().find(|room| room.id == id);

    let mut rooms: Vec<Room> = Vec::with_capacity(flat.len());
    let mut pruned = Vec::new();
    let mut emitted: HashSet<RoomId> = HashSet::new();

    for mut room in structured {
        let source_id = room.id;
        let known = resolve(source_id).is_some();

        if !room.is_group() {
            if known && emitted.insert(source_id) {
                room.group_rooms = None;
                room.id = rooms.len();
                rooms.push(room);
            }
            continue;
        }

        let references = room.group_rooms.take().unwrap_or_default();
        let group_uid = room.uid.clone();
        let owner_slot = if known && emitted.insert(source_id) {
            room.id = rooms.len();
            rooms.push(room);
            Some(rooms.len() - 1)
        } else {
            None
        };

        let mut kept = Vec::with_capacity(references.len());
        for reference in references {
            match resolve(reference.id) {
                Some(member) if emitted.insert(member.id) => {
                    let mut copy = member.clone();
                    copy.id = rooms.len();
                    kept.push(GroupRef {
                        id: copy.id,
                        uid: copy.uid.clone(),
                        extra: reference.extra,
                    });
                    rooms.push(copy);
                }
                _ => pruned.push(PrunedReference {
                    group_id: source_id,
                    group_uid: group_uid.clone(),
                    reference,
                }),
            }
        }

        if let Some(slot) = owner_slot {
            rooms[slot].group_rooms = Some(kept);
        }
    }

    CommitOutcome { rooms, pruned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Component;

    fn room(id: RoomId, uid: &str) -> Room {
        Room::new(id, uid, uid.trim_start_matches('_'))
    }

    fn ids(rooms: &[Room]) -> Vec<RoomId> {
        rooms.iter().map(|room| room.id).collect()
    }

    fn uids(rooms: &[Room]) -> Vec<&str> {
        rooms.iter().map(|room| room.uid.as_str()).collect()
    }

    #[test]
    fn grouping_a_room_nests_it_after_its_owner() {
        let flat = vec![room(0, "a"), room(1, "b")];
        let structured = vec![room(0, "a").with_group(vec![GroupRef::new(1, "b")])];

        let outcome = commit_structured_edits(structured, &flat);

        let expected = vec![
            room(0, "a").with_group(vec![GroupRef::new(1, "b")]),
            room(1, "b"),
        ];
        assert_eq!(outcome.rooms, expected);
        assert!(outcome.pruned.is_empty());
    }

    #[test]
    fn derive_hides_group_members_from_top_level() {
        let mut flat = vec![
            room(0, "a").with_group(vec![GroupRef::new(2, "c")]),
            room(1, "b"),
            room(2, "c"),
        ];
        let view = derive_structured_view(&mut flat);
        assert_eq!(uids(&view.rooms), ["a", "b"]);
        assert!(view.pruned.is_empty());
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn derive_prunes_stale_references_from_the_flat_list() {
        let mut flat = vec![
            room(0, "a").with_group(vec![GroupRef::new(1, "b"), GroupRef::new(7, "gone")]),
            room(1, "b"),
        ];
        let view = derive_structured_view(&mut flat);

        assert_eq!(view.pruned.len(), 1);
        assert_eq!(view.pruned[0].reference.id, 7);
        assert_eq!(view.pruned[0].group_uid, "a");
        assert_eq!(flat[0].group_rooms, Some(vec![GroupRef::new(1, "b")]));
        assert_eq!(view.rooms[0].group_rooms, Some(vec![GroupRef::new(1, "b")]));
    }

    #[test]
    fn derive_prunes_self_nested_and_doubly_claimed_references() {
        let mut flat = vec![
            room(0, "a").with_group(vec![GroupRef::new(0, "a"), GroupRef::new(2, "c")]),
            room(1, "b").with_group(vec![GroupRef::new(2, "c"), GroupRef::new(0, "a")]),
            room(2, "c"),
        ];
        let view = derive_structured_view(&mut flat);

        let pruned: Vec<_> = view
            .pruned
            .iter()
            .map(|p| (p.group_id, p.reference.id))
            .collect();
        assert_eq!(pruned, [(0, 0), (1, 2), (1, 0)]);
        assert_eq!(uids(&view.rooms), ["a", "b"]);
    }

    #[test]
    fn derive_twice_prunes_nothing_the_second_time() {
        let mut flat = vec![
            room(0, "a").with_group(vec![GroupRef::new(1, "b"), GroupRef::new(9, "x")]),
            room(1, "b"),
            room(2, "c").with_group(vec![GroupRef::new(1, "b")]),
        ];
        let first = derive_structured_view(&mut flat);
        let second = derive_structured_view(&mut flat);

        assert_eq!(first.pruned.len(), 2);
        assert!(second.pruned.is_empty());
        assert_eq!(first.rooms, second.rooms);
    }

    #[test]
    fn round_trip_preserves_content_and_renumbers() {
        let mut flat = vec![
            room(0, "a").with_components(vec![Component::new("x")]),
            room(3, "g").with_group(vec![GroupRef::new(5, "m"), GroupRef::new(4, "n")]),
            room(5, "m").with_components(vec![Component::single("p", vec![])]),
            room(4, "n"),
        ];
        let view = derive_structured_view(&mut flat);
        let outcome = commit_structured_edits(view.rooms, &flat);

        assert_eq!(ids(&outcome.rooms), [0, 1, 2, 3]);
        assert_eq!(uids(&outcome.rooms), ["a", "g", "m", "n"]);
        assert_eq!(outcome.rooms[0].components, flat[0].components);
        assert_eq!(outcome.rooms[2].components, flat[2].components);
        assert_eq!(
            outcome.rooms[1].group_rooms,
            Some(vec![GroupRef::new(2, "m"), GroupRef::new(3, "n")])
        );
    }

    #[test]
    fn omitted_rooms_are_deleted_and_ids_stay_contiguous() {
        let mut flat = vec![room(0, "a"), room(1, "b"), room(2, "c"), room(3, "d")];
        let mut view = derive_structured_view(&mut flat);
        view.rooms.retain(|room| room.uid != "b");
        view.rooms.reverse();

        let outcome = commit_structured_edits(view.rooms, &flat);
        assert_eq!(ids(&outcome.rooms), [0, 1, 2]);
        assert_eq!(uids(&outcome.rooms), ["d", "c", "a"]);
    }

    #[test]
    fn rooms_unknown_to_the_flat_list_are_dropped() {
        let flat = vec![room(0, "a")];
        let structured = vec![room(0, "a"), room(8, "stray")];
        let outcome = commit_structured_edits(structured, &flat);
        assert_eq!(uids(&outcome.rooms), ["a"]);
    }

    #[test]
    fn commit_prunes_members_deleted_out_of_band() {
        let flat = vec![room(0, "a"), room(1, "b")];
        let structured = vec![
            room(0, "a").with_group(vec![GroupRef::new(1, "b"), GroupRef::new(2, "c")]),
        ];
        let outcome = commit_structured_edits(structured, &flat);

        assert_eq!(uids(&outcome.rooms), ["a", "b"]);
        assert_eq!(outcome.pruned.len(), 1);
        assert_eq!(outcome.pruned[0].reference.uid, "c");
        assert_eq!(outcome.rooms[0].group_rooms, Some(vec![GroupRef::new(1, "b")]));
    }

    #[test]
    fn member_left_on_top_level_is_emitted_once() {
        let flat = vec![room(0, "a"), room(1, "b")];
        let structured = vec![
            room(0, "a").with_group(vec![GroupRef::new(1, "b")]),
            room(1, "b"),
        ];
        let outcome = commit_structured_edits(structured, &flat);
        assert_eq!(uids(&outcome.rooms), ["a", "b"]);
    }

    #[test]
    fn members_of_an_unknown_group_are_still_kept() {
        let flat = vec![room(0, "a"), room(1, "b")];
        let structured = vec![
            room(0, "a"),
            room(6, "new").with_group(vec![GroupRef::new(1, "b")]),
        ];
        let outcome = commit_structured_edits(structured, &flat);
        assert_eq!(uids(&outcome.rooms), ["a", "b"]);
        assert_eq!(ids(&outcome.rooms), [0, 1]);
    }

    #[test]
    fn ungrouped_room_sheds_its_member_list_on_commit() {
        let mut flat = vec![
            room(0, "a").with_group(vec![GroupRef::new(1, "b")]),
            room(1, "b"),
            room(2, "c"),
        ];
        let mut view = derive_structured_view(&mut flat);
        view.rooms[0].use_room_as_group = Some(false);

        let mut first = commit_structured_edits(view.rooms, &flat);
        assert_eq!(uids(&first.rooms), ["a", "c"]);
        assert_eq!(first.rooms[0].group_rooms, None);

        let view = derive_structured_view(&mut first.rooms);
        assert_eq!(uids(&view.rooms), ["a", "c"]);
        let second = commit_structured_edits(view.rooms, &first.rooms);
        assert_eq!(uids(&second.rooms), ["a", "c"]);
    }

    #[test]
    fn derive_ignores_member_lists_on_plain_rooms() {
        let mut stale = room(0, "a");
        stale.group_rooms = Some(vec![GroupRef::new(1, "b")]);
        let mut flat = vec![stale, room(1, "b")];

        let view = derive_structured_view(&mut flat);

        assert_eq!(uids(&view.rooms), ["a", "b"]);
        assert!(view.pruned.is_empty());
    }
}
