pub mod normalize;
pub mod validation;
pub mod voyage_event_type;

pub use normalize::{clean, clean_code, title_case};
pub use validation::{Bound, ValidationError};
pub use voyage_event_type::VoyageEventType;
