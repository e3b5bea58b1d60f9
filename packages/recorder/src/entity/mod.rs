pub mod country;
pub mod location;
pub mod operator;
pub mod port;
pub mod registration_history;
pub mod sighting;
pub mod vessel;
pub mod vessel_type;
pub mod voyage;
pub mod voyage_event;
