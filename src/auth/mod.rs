pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use service::{AuthService, AuthSession};
pub use token::{Claims, TokenIssuer};
