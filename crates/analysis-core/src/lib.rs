pub mod config;
pub mod error;
pub mod numeric;
pub mod rules;
pub mod sanitize;
pub mod types;

pub use config::*;
pub use error::*;
pub use numeric::*;
pub use rules::*;
pub use sanitize::*;
pub use types::*;
