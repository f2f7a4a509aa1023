pub mod booking;
pub mod lifecycle;
pub mod references;

pub use booking::AppointmentBookingService;
pub use lifecycle::AppointmentLifecycleService;
