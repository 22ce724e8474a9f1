//! OSLC browser core - resource model, link filtering, labels and errors

pub mod error;
pub mod filter;
pub mod label;
pub mod types;
pub mod vocab;

pub use error::{Error, Result};
pub use filter::{LinkFilter, Rule};
pub use label::{decode_entities, display_label, local_name};
pub use types::*;
