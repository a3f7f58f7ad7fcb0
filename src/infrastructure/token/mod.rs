mod jwt;

pub use jwt::{create_jwt_issuer, JwtTokenIssuer, TokenClaims};
