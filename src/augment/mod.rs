pub mod ai_model;
pub mod augment;
pub mod error;
