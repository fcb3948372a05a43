pub mod event_type;
pub mod season;
pub mod source;
