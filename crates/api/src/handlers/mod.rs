pub mod notifications;
pub mod preferences;
