pub mod delivery_record_repo;
pub mod preference_repo;

pub use delivery_record_repo::DeliveryRecordRepo;
pub use preference_repo::PreferenceRepo;
