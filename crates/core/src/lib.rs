//! `nearbykaam-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! errors, identifiers, the entity/aggregate traits and geographic math.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod geo;
pub mod id;
pub mod phone;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use geo::{GeoPoint, Location, LocationSource, haversine_km, round_to_tenth};
pub use id::{JobId, LogEntryId};
pub use phone::normalize_mobile;
pub use value_object::ValueObject;
