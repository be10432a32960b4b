//! Infrastructure layer: the in-memory hub and wire DTOs.

pub mod dto;
pub mod hub;
