//! Container handles emitted by the rendering layer.
//!
//! A handle names the node that owns a container (`room_@0`, `popup_@x1`)
//! and, for multi-slot containers, the slot (`3_swiper_@x1`).

mod core;

pub use core::ContainerHandle;
