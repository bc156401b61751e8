//! Core runtime for a 3D product-showcase landing page: declarative scene
//! variants, pointer-driven interaction (a spotlight that tracks the cursor
//! across the ground plane, a turntable spin, overlay parallax) and a
//! control-panel binding with clipboard export.
//!
//! The crate is host-agnostic at its core. [`scene`], [`variants`],
//! [`interaction`], [`panel`] and [`data_model`] have no windowing or GPU
//! dependencies and are exercised headlessly; [`render`] and the hosts
//! ([`web`] on wasm, the `vitrine` binary natively) sit on top.

pub mod app;
pub mod data_model;
pub mod interaction;
pub mod panel;
pub mod render;
pub mod scene;
pub mod variants;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use data_model::StageModel;
pub use scene::Scene;
