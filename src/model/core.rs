use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Position of a room inside the flat list. Renumbered on every commit.
pub type RoomId = usize;

/// Component identifier, unique across the whole forest.
pub type ComponentId = String;

/// Passthrough storage for keys the engine does not interpret.
pub type Extra = Map<String, Value>;

/// Top-level container of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "ID")]
    pub id: RoomId,
    /// Stable cross-reference key. Empty means "not yet assigned".
    #[serde(rename = "UID", default)]
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(
        rename = "useRoomAsGroup",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub use_room_as_group: Option<bool>,
    #[serde(rename = "groupRooms", default, skip_serializing_if = "Option::is_none")]
    pub group_rooms: Option<Vec<GroupRef>>,
    #[serde(
        rename = "groupComponents",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group_components: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Room {
    pub fn new(id: RoomId, uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            uid: uid.into(),
            name: name.into(),
            icon: String::new(),
            components: Vec::new(),
            use_room_as_group: None,
            group_rooms: None,
            group_components: None,
            extra: Extra::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_components(mut self, components: Vec<Component>) -> Self {
        self.components = components;
        self
    }

    /// Turn the room into a folder holding the given rooms.
    pub fn with_group(mut self, members: Vec<GroupRef>) -> Self {
        self.use_room_as_group = Some(true);
        self.group_rooms = Some(members);
        self
    }

    pub fn is_group(&self) -> bool {
        self.use_room_as_group.unwrap_or(false)
    }

    pub fn has_uid(&self) -> bool {
        !self.uid.is_empty()
    }

    pub fn group_ref(&self) -> GroupRef {
        GroupRef::new(self.id, self.uid.clone())
    }
}

/// Cross-reference from a group room to one of its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
    #[serde(rename = "ID")]
    pub id: RoomId,
    #[serde(rename = "UID", default)]
    pub uid: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl GroupRef {
    pub fn new(id: RoomId, uid: impl Into<String>) -> Self {
        Self {
            id,
            uid: uid.into(),
            extra: Extra::new(),
        }
    }
}

/// A placed widget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "ID")]
    pub id: ComponentId,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Extra>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Component {
    pub fn new(id: impl Into<ComponentId>) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::default(),
            position: None,
            extra: Extra::new(),
        }
    }

    /// Component holding a single child list.
    pub fn single(id: impl Into<ComponentId>, children: Vec<Component>) -> Self {
        let mut component = Self::new(id);
        component.attributes.components = Some(ContainerPayload::Single(children));
        component
    }

    /// Component holding one child list per slot (tabs, swiper pages).
    pub fn multi(id: impl Into<ComponentId>, slots: Vec<Vec<Component>>) -> Self {
        let mut component = Self::new(id);
        component.attributes.components = Some(ContainerPayload::Multi(
            slots.into_iter().map(Slot::new).collect(),
        ));
        component
    }

    pub fn payload(&self) -> Option<&ContainerPayload> {
        self.attributes.components.as_ref()
    }

    pub fn payload_mut(&mut self) -> Option<&mut ContainerPayload> {
        self.attributes.components.as_mut()
    }

    pub fn is_container(&self) -> bool {
        self.attributes.components.is_some()
    }

    /// Position attributes, created on first access.
    pub fn position_mut(&mut self) -> &mut Extra {
        self.position.get_or_insert_with(Extra::new)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<ContainerPayload>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Attributes {
    pub fn is_empty(&self) -> bool {
        self.components.is_none() && self.extra.is_empty()
    }
}

/// One independent child list inside a multi-container component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub components: Vec<Component>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Slot {
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            components,
            extra: Extra::new(),
        }
    }
}

/// Nested payload of a container component.
///
/// The persisted shape is a bare array either way. The variant is decided
/// once, while parsing: when the first element carries a `components` key the
/// array is a list of slots, otherwise it is a flat component list.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerPayload {
    Single(Vec<Component>),
    Multi(Vec<Slot>),
}

impl ContainerPayload {
    /// Every child list in slot order. Single containers yield one list.
    pub fn lists(&self) -> impl Iterator<Item = &Vec<Component>> {
        let (single, slots) = match self {
            ContainerPayload::Single(list) => (Some(list), Default::default()),
            ContainerPayload::Multi(slots) => (None, slots.as_slice()),
        };
        single
            .into_iter()
            .chain(slots.iter().map(|slot| &slot.components))
    }

    pub fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<Component>> {
        let (single, slots) = match self {
            ContainerPayload::Single(list) => (Some(list), Default::default()),
            ContainerPayload::Multi(slots) => (None, slots.as_mut_slice()),
        };
        single
            .into_iter()
            .chain(slots.iter_mut().map(|slot| &mut slot.components))
    }

    /// List at `index`: the slot for multi containers, the sole list otherwise.
    pub fn list(&self, index: usize) -> Option<&Vec<Component>> {
        match self {
            ContainerPayload::Single(list) => (index == 0).then_some(list),
            ContainerPayload::Multi(slots) => slots.get(index).map(|slot| &slot.components),
        }
    }

    pub fn list_mut(&mut self, index: usize) -> Option<&mut Vec<Component>> {
        match self {
            ContainerPayload::Single(list) => (index == 0).then_some(list),
            ContainerPayload::Multi(slots) => {
                slots.get_mut(index).map(|slot| &mut slot.components)
            }
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, ContainerPayload::Multi(_))
    }

    pub fn slot_count(&self) -> usize {
        match self {
            ContainerPayload::Single(_) => 1,
            ContainerPayload::Multi(slots) => slots.len(),
        }
    }
}

impl Serialize for ContainerPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContainerPayload::Single(list) => list.serialize(serializer),
            ContainerPayload::Multi(slots) => slots.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ContainerPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<Value>::deserialize(deserializer)?;
        let is_multi = raw
            .first()
            .and_then(Value::as_object)
            .is_some_and(|first| first.contains_key("components"));

        if is_multi {
            let slots = raw
                .into_iter()
                .map(serde_json::from_value::<Slot>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(D::Error::custom)?;
            Ok(ContainerPayload::Multi(slots))
        } else {
            let list = raw
                .into_iter()
                .map(serde_json::from_value::<Component>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(D::Error::custom)?;
            Ok(ContainerPayload::Single(list))
        }
    }
}

/// A node found in the forest: either a top-level room or a component.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Room(&'a Room),
    Component(&'a Component),
}

impl<'a> Node<'a> {
    /// Identifier in its string form; rooms use the decimal `ID`.
    pub fn id(&self) -> String {
        match *self {
            Node::Room(room) => room.id.to_string(),
            Node::Component(component) => component.id.clone(),
        }
    }

    pub fn as_room(&self) -> Option<&'a Room> {
        match *self {
            Node::Room(room) => Some(room),
            Node::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&'a Component> {
        match *self {
            Node::Component(component) => Some(component),
            Node::Room(_) => None,
        }
    }

    /// Child lists the node exposes as a container.
    pub fn child_lists(&self) -> Vec<&'a Vec<Component>> {
        match *self {
            Node::Room(room) => vec![&room.components],
            Node::Component(component) => component
                .payload()
                .map(|payload| payload.lists().collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug)]
pub enum NodeMut<'a> {
    Room(&'a mut Room),
    Component(&'a mut Component),
}

impl<'a> NodeMut<'a> {
    pub fn into_component(self) -> Option<&'a mut Component> {
        match self {
            NodeMut::Component(component) => Some(component),
            NodeMut::Room(_) => None,
        }
    }

    pub fn into_room(self) -> Option<&'a mut Room> {
        match self {
            NodeMut::Room(room) => Some(room),
            NodeMut::Component(_) => None,
        }
    }
}
