pub mod allow_list;
pub mod email;
pub mod otp;
pub mod password;
pub mod pending_signup;
pub mod reset_otp;
pub mod user;
pub mod username;
