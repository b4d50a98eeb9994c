//! Configuration types for the skin and infill stages.

mod skin_settings;

pub use skin_settings::{
    CombineParams, InfillParams, SkinAreaParams, SkinInsetParams, SkinSettings, SkinStrategy,
    DEFAULT_COMBINE_OPENING_DISTANCE, MIN_AREA_SIZE,
};
