//! Infrastructure layer: concrete implementations of the domain interfaces
//! plus the wire/HTTP DTOs.

pub mod dto;
pub mod pusher;
pub mod registry;
