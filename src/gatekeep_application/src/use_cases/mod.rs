pub mod change_password;
pub mod login;
pub mod mail;
pub mod register;
pub mod request_reset_otp;
pub mod verify_registration;
pub mod verify_reset_otp;

#[cfg(test)]
pub(crate) mod test_support;
