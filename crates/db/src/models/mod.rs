pub mod delivery;
pub mod preferences;
