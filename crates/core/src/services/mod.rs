pub mod cataloger;
pub mod matcher;
