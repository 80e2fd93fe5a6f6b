pub mod agent;
pub mod auth;
pub mod call;
pub mod guidance;
pub mod test_call;
