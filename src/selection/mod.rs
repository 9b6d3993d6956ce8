pub mod selection;
pub mod selection_model;
