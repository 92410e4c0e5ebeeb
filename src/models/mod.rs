pub mod enums;
pub mod history;
pub mod patient;
pub mod scenario;
pub mod wire;

pub use enums::*;
pub use history::*;
pub use patient::*;
pub use scenario::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
