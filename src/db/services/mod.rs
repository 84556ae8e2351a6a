pub mod history_service;
pub mod profile_service;
pub mod site_service;
pub mod snapshot_service;
