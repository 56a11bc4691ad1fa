//! Data model for the persisted room forest.
//!
//! Rooms own ordered component lists; container components own either one
//! child list or several independent slots. Nothing holds a parent pointer,
//! so every traversal starts from the room list.

mod core;

pub use core::{
    Attributes, Component, ComponentId, ContainerPayload, Extra, GroupRef, Node, NodeMut, Room,
    RoomId, Slot,
};
