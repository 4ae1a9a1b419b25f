pub mod handlers;
pub mod middleware;

/// Session key holding the signed-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";
