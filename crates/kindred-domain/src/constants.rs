//! Domain layer constants
//!
//! Defaults that belong to the matching and clustering rules themselves.
//! Deployment knobs (timeouts, concurrency, TTLs) live in
//! `kindred_infrastructure::constants`.

// ============================================================================
// SIMILARITY DOMAIN CONSTANTS
// ============================================================================

/// Minimum cosine similarity kept by the `similar` ranking mode
pub const SIMILARITY_THRESHOLD_DEFAULT: f64 = 0.7;

/// Lower bound of the similarity band kept by the `complementary` mode
pub const COMPLEMENTARY_BAND_MIN_DEFAULT: f64 = 0.1;

/// Upper bound of the similarity band kept by the `complementary` mode
pub const COMPLEMENTARY_BAND_MAX_DEFAULT: f64 = 0.5;

/// Candidate pool size as a multiple of the requested match limit
pub const CANDIDATE_POOL_MULTIPLIER: usize = 3;

// ============================================================================
// CLUSTERING DOMAIN CONSTANTS
// ============================================================================

/// Smallest population the clustering engine accepts
pub const CLUSTERING_MIN_POPULATION: usize = 10;

/// Largest k evaluated by the elbow heuristic
pub const CLUSTERING_MAX_K: usize = 10;

/// Iteration cap for a single k-means run
pub const CLUSTERING_MAX_ITERATIONS: usize = 100;

/// Maximum centroid movement under which k-means is considered converged
pub const CLUSTERING_CONVERGENCE_TOLERANCE: f64 = 1e-3;

/// Fewest representatives reported per cluster (when it has that many members)
pub const CLUSTER_REPRESENTATIVES_MIN: usize = 3;

/// Most representatives reported per cluster
pub const CLUSTER_REPRESENTATIVES_MAX: usize = 5;

/// Cap on the dominant traits reported per cluster
pub const CLUSTER_DOMINANT_TRAITS_MAX: usize = 5;

/// Centroid similarity above which two clusters are recommended to each other
pub const CLUSTER_SIMILARITY_FLOOR: f64 = 0.6;

/// Most cross-cluster recommendations returned
pub const CLUSTER_MATCHES_MAX: usize = 3;

// ============================================================================
// SCORING DOMAIN CONSTANTS
// ============================================================================

/// Score used whenever a data source is missing
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Tolerance when checking that a weight group sums to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Maximum angular distance (degrees) from an exact aspect
pub const ASPECT_ORB_DEGREES: f64 = 8.0;

// ============================================================================
// PROJECT DOMAIN CONSTANTS
// ============================================================================

/// Feasibility contribution used for unrecognised difficulty or duration labels
pub const FEASIBILITY_UNKNOWN: f64 = 0.5;

/// Highest potential impact rating a project idea can carry
pub const PROJECT_IMPACT_MAX: u8 = 10;
