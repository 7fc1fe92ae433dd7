//! Backend access for the WeatherBear front end
//!
//! Wire types for the forecast backend, the HTTP client that talks to it,
//! unit conversion for chart values, and location helpers.

pub mod client;
pub mod geocode;
pub mod location;
pub mod types;
pub mod units;

pub use client::BackendClient;
pub use geocode::ReverseGeocoder;
pub use location::{FixedGeolocation, Geolocator, NoGeolocation};
pub use types::*;
