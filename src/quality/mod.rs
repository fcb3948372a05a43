pub mod interpolate;
pub mod null_profile;
