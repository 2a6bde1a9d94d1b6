pub const DEFAULT_N_MAX: usize = 500;
pub const DEFAULT_EPS: f64 = 1e-10;
/// Upper bound on rows times columns of one stacked evaluation table (about 1 GB of f64).
pub const MAX_EVALUATION_CELLS: usize = 1 << 27;
