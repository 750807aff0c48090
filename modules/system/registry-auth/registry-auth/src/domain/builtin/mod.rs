//! Providers that every chain carries.

pub mod deny_all;
pub mod static_users;

pub use deny_all::DenyAllProvider;
pub use static_users::StaticUsersProvider;
