//! Device Generations
//!
//! Implementations of `DeviceGenerationStrategy`, one per device generation.

pub mod convention;
pub mod indexed;

pub use convention::ConventionGeneration;
pub use indexed::IndexedGeneration;

use crate::application::build::DeviceGenerationStrategy;
use crate::domain::value_objects::DeviceGeneration;

/// Every generation this build knows how to stage
pub fn all_generations() -> Vec<Box<dyn DeviceGenerationStrategy>> {
    vec![
        Box::new(ConventionGeneration::new()),
        Box::new(IndexedGeneration::new()),
    ]
}

/// Strategy for a single generation
pub fn for_generation(generation: DeviceGeneration) -> Box<dyn DeviceGenerationStrategy> {
    match generation {
        DeviceGeneration::V1 => Box::new(ConventionGeneration::new()),
        DeviceGeneration::V2 => Box::new(IndexedGeneration::new()),
    }
}
