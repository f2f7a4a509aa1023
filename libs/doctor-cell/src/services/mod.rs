pub mod availability;
pub mod decision;
pub mod doctor;

pub use availability::AvailabilityService;
pub use decision::AppointmentDecisionService;
pub use doctor::DoctorService;
