pub mod compute;
pub mod context_model;
