// Re-export glam for convenience
pub use glam::*;

// Sable math types
mod ray;
mod vector;

pub use ray::{Ray, BOUNCE_OFFSET};
pub use vector::{abs_dot, almost_zero, make_same_side, normalize, reflect, safe_sqrt, EPSILON};
