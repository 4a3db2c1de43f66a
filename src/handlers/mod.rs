// Two security tiers:
// Public (no token) → Protected (bearer token carrying the route's permission)
pub mod protected;
pub mod public;
