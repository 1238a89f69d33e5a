pub mod enums;
pub mod patient;
pub mod schema;
pub mod session;
pub mod transcript;

pub use enums::*;
pub use patient::*;
pub use schema::*;
pub use session::*;
pub use transcript::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
