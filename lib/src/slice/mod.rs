//! Layer data model - the structures the skin and infill stages work on.
//!
//! - [`SliceMesh`] - Layers plus mesh settings, handed over by the wall stage
//! - [`Layer`] - All regions sharing one Z height
//! - [`LayerRegion`] - One connected region with its walls, skin and infill
//! - [`SkinPart`] - One connected skin area with its perimeter loops

mod layer;
mod region;

pub use layer::{Layer, Layers, SliceMesh};
pub use region::{LayerRegion, SkinPart};
