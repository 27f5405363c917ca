//! Scheduling core: interval math, busy aggregation, slot generation, the
//! appointment state machine, and the locked booking engine.

pub mod booking;
pub mod busy;
pub mod interval;
pub mod locks;
pub mod slots;
pub mod state;

pub use booking::{BookingEngine, BookingRequest};
pub use busy::busy_intervals;
pub use interval::{Interval, merge_intervals};
pub use locks::StaffLockRegistry;
pub use slots::{
    DEFAULT_DURATION_MINUTES, DEFAULT_STEP_MINUTES, MAX_DURATION_MINUTES, MAX_STEP_MINUTES,
    MIN_DURATION_MINUTES, MIN_STEP_MINUTES, day_bounds, fits_working_hours, generate_slots,
};
pub use state::{AppointmentStatus, CanceledBy, ensure_transition};
