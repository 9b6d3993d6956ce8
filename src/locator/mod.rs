pub mod evaluate;
pub mod locator_model;
pub mod synthesizer;
