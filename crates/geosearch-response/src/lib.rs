//! Response Transformer: raw backend hits to a stable, GeoJSON-aware
//! API envelope.

pub mod transform;

pub use transform::{transform, Feature, FeatureCollection, ResponseEnvelope};
