//! Token authentication

mod jwt;
mod provider;

pub use jwt::{Claims, JwtService, UserMetadata};
pub use provider::TokenAuthProvider;
