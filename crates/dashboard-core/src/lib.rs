pub mod error;
pub mod http;
pub mod model;
pub mod traits;
pub mod types;

pub use error::*;
pub use model::*;
pub use traits::*;
pub use types::*;
