pub mod agent;
pub mod auth;
pub mod call;
pub mod error;
pub mod results;
pub mod transcript;
mod util;

pub use agent::*;
pub use auth::*;
pub use call::*;
pub use error::{Error, Result};
pub use results::*;
pub use transcript::*;
pub use util::*;
