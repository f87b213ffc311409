// Two security tiers: public (no auth) and protected (JWT auth).
pub mod protected;
pub mod public;
