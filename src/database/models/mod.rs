pub mod client;
pub mod review_request;
pub mod testimonial;
pub mod user;

pub use client::{Client, ClientPatch, NewClient};
pub use review_request::{NewReviewRequest, ReviewRequest};
pub use testimonial::{NewTestimonial, Testimonial};
pub use user::User;
