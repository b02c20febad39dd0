pub mod jwt;

pub use jwt::{
    Claims, JwtConfig, TokenAuthError, create_refresh_cookie, create_removal_cookie,
    extract_subject, generate_access_token, generate_refresh_cookie, generate_refresh_token,
    is_token_valid, verify_refresh_token,
};
