pub mod canonical;
pub mod reconcile;

pub use canonical::CanonicalSchema;
pub use reconcile::{close_matches, Reconciler, MATCH_TIERS};
