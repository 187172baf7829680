// handlers/mod.rs - two security tiers
//
// public:    no authentication (/health)
// protected: bearer token verified by middleware::require_identity (/api/*)
pub mod protected;
pub mod public;
