pub mod error;
pub mod options;
pub mod types;
pub mod value;

pub use error::VnError;
pub use options::*;
pub use types::*;
pub use value::*;
