//! Authentication: API key credentials, session state, and token exchange.

mod credentials;
mod session;
mod token;

pub use credentials::Credentials;
pub use session::{Environment, Session};
pub use token::TokenManager;
