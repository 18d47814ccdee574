//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing a booking.
#[derive(Clone, Copy, Debug)]
pub struct Booking;

/// Marker type describing a vacating notice.
#[derive(Clone, Copy, Debug)]
pub struct Notice;

/// Marker type describing a rent due date.
#[derive(Clone, Copy, Debug)]
pub struct RentDue;
