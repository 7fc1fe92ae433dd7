//! Device position lookup.
//!
//! The host (browser, OS service, CLI flags) supplies a [`Geolocator`];
//! the front end only needs to know whether one exists and what it returns.

use crate::types::{Coordinates, LocationError};

#[allow(async_fn_in_trait)]
pub trait Geolocator {
    /// False when the host has no geolocation at all.
    fn is_supported(&self) -> bool;

    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Host without geolocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocation;

impl Geolocator for NoGeolocation {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Position known up front, e.g. passed on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation(pub Coordinates);

impl Geolocator for FixedGeolocation {
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}
