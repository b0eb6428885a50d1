//! Reusable record types for typed-allocation tests.
//!
//! Accepted by the indirection gate:
//!
//! - [`Vec3`]: three `f32`s.
//! - [`Particle`]: nested arrays and scalars.
//! - [`Marker`]: a zero-sized record.
//!
//! Rejected by the gate, despite carrying a (wrong) [`Pod`] impl so they
//! reach it through typed allocation:
//!
//! - [`Labelled`]: a `&'static str` field.
//! - [`SelfLink`]: a raw pointer to its own type.
//! - [`Samples`]: a `&'static [u32]` field.
//!
//! Describe-only, never `Pod`: [`Inventory`] with owned collections.

#![allow(unsafe_code)]

use bumpyard_core::{describe_struct, Pod};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

describe_struct!(Vec3 { x: f32, y: f32, z: f32 });
// SAFETY: repr(C), three f32 fields, no padding.
unsafe impl Pod for Vec3 {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Particle {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub mass: f32,
    pub id: u32,
}

describe_struct!(Particle {
    position: [f32; 3],
    velocity: [f32; 3],
    mass: f32,
    id: u32,
});
// SAFETY: repr(C), 4-byte fields only, no padding.
unsafe impl Pod for Particle {}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Marker;

describe_struct!(Marker {});
// SAFETY: zero-sized.
unsafe impl Pod for Marker {}

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Labelled {
    pub id: u64,
    pub label: &'static str,
}

describe_struct!(Labelled {
    id: u64,
    label: &'static str,
});
// SAFETY: deliberately unsound; exists so tests can show the gate refuses it.
unsafe impl Pod for Labelled {}

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct SelfLink {
    pub value: u64,
    pub next: *const SelfLink,
}

describe_struct!(SelfLink {
    value: u64,
    next: *const SelfLink,
});
// SAFETY: deliberately unsound; exists so tests can show the gate refuses it.
unsafe impl Pod for SelfLink {}

#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct Samples {
    pub count: u64,
    pub values: &'static [u32],
}

describe_struct!(Samples {
    count: u64,
    values: &'static [u32],
});
// SAFETY: deliberately unsound; exists so tests can show the gate refuses it.
unsafe impl Pod for Samples {}

#[derive(Clone, Debug, Default)]
pub struct Inventory {
    pub owner: String,
    pub items: Vec<u32>,
    pub weight: f64,
}

describe_struct!(Inventory {
    owner: String,
    items: Vec<u32>,
    weight: f64,
});
