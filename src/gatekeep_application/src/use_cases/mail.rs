//! HTML bodies for the mails the credential flows send.

use gatekeep_core::{Otp, Username};

pub const VERIFICATION_SUBJECT: &str = "Verify your Email - Gatekeep";
pub const WELCOME_SUBJECT: &str = "Registration Successful";
pub const RESET_OTP_SUBJECT: &str = "OTP for Password Reset Request";

pub fn verification_body(username: &Username, otp: Otp, ttl_minutes: i64) -> String {
    format!(
        "<!DOCTYPE html><html><body style='font-family: Arial, sans-serif; background-color: #f4f4f4; padding: 20px;'>\
         <div style='background-color: #fff; padding: 20px; border-radius: 10px;'>\
         <h2 style='color: #4CAF50;'>Email Verification</h2>\
         <p>Hi {username},</p>\
         <p>Thank you for registering with Gatekeep!</p>\
         <p>Please use the OTP below to verify your email address:</p>\
         <p style='font-size: 24px; font-weight: bold; color: #4CAF50;'>{otp}</p>\
         <p>This OTP is valid for {ttl_minutes} minutes.</p>\
         <p>If you didn't request this, you can ignore this email.</p>\
         </div></body></html>"
    )
}

pub fn welcome_body(username: &Username) -> String {
    format!(
        "<!DOCTYPE html><html><body style='font-family: Arial, sans-serif; background-color: #f9f9f9; padding: 20px;'>\
         <div style='background-color: #ffffff; padding: 20px; border-radius: 10px;'>\
         <h2 style='color: #4CAF50;'>Welcome to Gatekeep!</h2>\
         <p>Hi {username},</p>\
         <p>Your registration was successful. We're excited to have you on board!</p>\
         </div></body></html>"
    )
}

pub fn reset_otp_body(username: &Username, otp: Otp) -> String {
    format!(
        "<html><body style='font-family: Arial; background-color: #f9f9f9; padding: 30px;'>\
         <div style='max-width: 400px; margin: auto; background: white; padding: 20px; border-radius: 10px;'>\
         <h2 style='color: #333;'>Hi {username}!</h2>\
         <p style='font-size: 16px; color: #555;'>Your OTP code is:</p>\
         <p style='font-size: 24px; font-weight: bold; color: #2c3e50;'>{otp}</p>\
         <p style='font-size: 14px; color: #888;'>Please use this code to reset your password. It will expire soon.</p>\
         </div></body></html>"
    )
}
