//! Domain models

pub mod dentist;
pub mod event;
pub mod registration;
pub mod review;
pub mod validation;

pub use dentist::{active_in_display_order, Dentist, SocialLinks};
pub use event::Event;
pub use registration::{initial_status, Registration, RegistrationFormData};
pub use review::{featured_first, NewReview, Review, MAX_REVIEW_TEXT_LEN};
pub use validation::FieldError;
