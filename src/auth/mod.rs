//! Authentication and authorization module

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{auth_middleware, extract_token, CurrentUser, AUTH_HEADER};
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};
