mod helpers;

mod me;
mod password_reset;
mod refresh;
