//! Editing core for the seating floor-plan designer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! plan being edited: the element model, every state transition and its undo
//! history, chair-to-table attachment, selection and transforms, hit-testing,
//! and drawing the plan to a canvas or an exported image. The host JavaScript
//! layer wires DOM events to [`engine::Engine`] and persists the snapshots it
//! produces to the schematics service.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`element`] | Element kinds, defaults and inspector fields |
//! | [`doc`] | Application state, snapshots and element patches |
//! | [`action`] | Actions accepted by the reducer |
//! | [`reducer`] | Pure state transitions |
//! | [`history`] | Undo/redo and the dispatching [`history::Editor`] |
//! | [`attach`] | Chair-to-table attachment and its consistency repair |
//! | [`selection`] | Marquee selection and resize/rotate baking |
//! | [`seating`] | Neighbours and participant seat assignment |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against elements |
//! | [`geometry`] | Rectangles, rotation and distances |
//! | [`scene`] | Per-element drawing primitives |
//! | [`export`] | Raster export planning |
//! | [`render`] | Canvas 2D drawing |
//! | [`config`] | Editor tunables |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants (zoom limits, attach buffer, etc.) |

pub mod action;
pub mod attach;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod element;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod history;
pub mod hit;
pub mod input;
pub mod reducer;
pub mod render;
pub mod scene;
pub mod seating;
pub mod selection;
