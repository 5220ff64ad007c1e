//! Domain types and pure logic for the GLTF translation bridge.

pub mod correlation;
pub mod documents;
pub mod error;
pub mod hashing;
pub mod translation;
pub mod types;
pub mod webhook;
