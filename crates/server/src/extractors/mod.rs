pub mod validation_extractor;

pub use validation_extractor::{validate_ordered, FieldOrder, ValidationExtractor};
