//! Bearer-token verification for tokens issued by the external identity provider.

mod claims;
pub mod extractors;
pub mod jwt;

pub use claims::Claims;
pub use extractors::AuthUser;
pub use jwt::JwtKeys;
