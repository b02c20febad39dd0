pub mod activity_log;
pub mod hashmap_reset_otp_store;
pub mod hashmap_user_store;
pub mod in_memory_signup_cache;
pub mod postgres_reset_otp_store;
pub mod postgres_user_store;
pub mod redis_signup_cache;

pub use activity_log::{ActivityEntry, InMemoryActivityLog, PostgresActivityLog};
pub use hashmap_reset_otp_store::HashmapResetOtpStore;
pub use hashmap_user_store::HashmapUserStore;
pub use in_memory_signup_cache::InMemorySignupCache;
pub use postgres_reset_otp_store::PostgresResetOtpStore;
pub use postgres_user_store::PostgresUserStore;
pub use redis_signup_cache::RedisSignupCache;
