use thiserror::Error;

/// Top-level error type for tank fill-level computations.
#[derive(Debug, Error)]
pub enum TankfillError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Rasterize(#[from] RasterizeError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors related to voxel grids and the interior solve.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero, got {nx}x{ny}x{nz}")]
    EmptyDimensions { nx: usize, ny: usize, nz: usize },

    #[error("grid of {nx}x{ny}x{nz} cells is too large to allocate")]
    TooLarge { nx: usize, ny: usize, nz: usize },

    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f64),

    #[error("voxel ({x}, {y}, {z}) is outside the grid")]
    OutOfBounds { x: usize, y: usize, z: usize },

    #[error("flood-fill seed ({x}, {y}, {z}) lies in shell material; the grid needs an empty margin")]
    SeedInShell { x: usize, y: usize, z: usize },
}

/// Errors related to mesh construction and clean-up.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no usable faces left after clean-up")]
    NoUsableFaces,
}

/// Errors raised while turning a triangle mesh into a shell grid.
#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("mesh has no triangles")]
    EmptyMesh,

    #[error("mesh contains non-finite coordinates")]
    NonFinite,

    #[error("triangle {triangle} references missing vertex {vertex}")]
    IndexOutOfRange { triangle: usize, vertex: u32 },

    #[error("grid of {cells} cells exceeds the budget of {budget}")]
    CellBudgetExceeded { cells: u128, budget: usize },

    #[error("rasterization failed after {attempts} attempts, last voxel edge {edge}")]
    RetriesExhausted { attempts: usize, edge: f64 },
}

impl RasterizeError {
    /// Returns `true` if the failure may go away at a coarser resolution.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CellBudgetExceeded { .. })
    }
}

/// Errors related to fill curves and their composition.
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("fill curve has no samples")]
    Empty,

    #[error("no parts to compose")]
    NoParts,

    #[error("repeat count must be at least 1")]
    ZeroRepeatCount,

    #[error("height steps differ: {left} m vs {right} m")]
    StepMismatch { left: f64, right: f64 },

    #[error("cannot scale to {target} l: raw curve ends at zero")]
    DegenerateScale { target: u32 },
}

/// Errors related to tank definitions and the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("tank not found: {0}")]
    TankNotFound(String),

    #[error("invalid assembly: {0}")]
    InvalidAssembly(String),

    #[error("{tank}: parts add up to {assembled} l but {declared} l is declared")]
    Irreconcilable {
        tank: String,
        declared: u32,
        assembled: u64,
    },

    #[error("no mesh available for {0}")]
    MeshUnavailable(String),
}

/// Convenience type alias for results using [`TankfillError`].
pub type Result<T> = std::result::Result<T, TankfillError>;
