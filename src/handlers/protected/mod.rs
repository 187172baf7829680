// handlers/protected/mod.rs - handlers behind the bearer-token gate
//
// Every handler here reaches storage through a TenantRepository extracted
// from the request, so each query is scoped to the verified caller.
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod review_requests;
pub mod testimonials;
