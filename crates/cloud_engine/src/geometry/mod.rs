//! Rays, boxes and the cloud container

pub mod aabb;
pub mod container;
pub mod ray;

pub use aabb::{Aabb, RayBoxHit, SLAB_EPSILON};
pub use container::{CloudContainer, ContainerGeometry};
pub use ray::Ray;
