pub mod error;
pub mod forget_password;
pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod verify_otp;

pub use error::{AuthApiError, ErrorResponse};
pub use forget_password::{change_password, verify_mail, verify_reset_otp};
pub use login::login;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh;
pub use register::register;
pub use verify_otp::verify_otp;
