use std::collections::VecDeque;

use tracing::debug;

use crate::error::{GridError, Result};
use crate::grid::{GridIndex, VoxelGrid};

/// Voxel the exterior flood fill starts from.
const SEED: GridIndex = [0, 0, 0];

/// Derives the interior of a tank from its shell grid.
///
/// Tank meshes are rarely closed, so the interior is found topologically:
/// the top layer is closed with a lid, a breadth-first flood fill over
/// 6-connected neighbours marks everything reachable from the seed corner
/// as exterior, and what is neither exterior nor shell is interior. The lid
/// is removed again before returning.
///
/// The shell grid is consumed and reused as the visited set.
pub struct SolveInterior {
    shell: VoxelGrid,
    include_shell: bool,
}

impl SolveInterior {
    /// Creates a new `SolveInterior` operation.
    #[must_use]
    pub fn new(shell: VoxelGrid) -> Self {
        Self {
            shell,
            include_shell: false,
        }
    }

    /// Counts wall voxels as interior too.
    #[must_use]
    pub fn include_shell(mut self, include: bool) -> Self {
        self.include_shell = include;
        self
    }

    /// Executes the solve, returning the filled grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SeedInShell`] if the seed corner is shell
    /// material once the lid is in place. Filling from there would reach
    /// nothing and report the whole box as interior.
    pub fn execute(self) -> Result<VoxelGrid> {
        let mut visited = self.shell;
        let top = visited.top_layer();
        visited.set_layer(top, true)?;

        if visited.get(SEED)? {
            let [x, y, z] = SEED;
            return Err(GridError::SeedInShell { x, y, z }.into());
        }
        let shell_count = visited.count();

        let mut result =
            VoxelGrid::filled(visited.dims(), visited.cell_size(), visited.unit())?
                .with_origin(visited.origin());

        let seed = visited.linear(SEED);
        visited.cells_mut()[seed] = true;
        result.cells_mut()[seed] = false;

        let mut frontier = VecDeque::from([seed]);
        let mut exterior = 1usize;
        while let Some(cell) = frontier.pop_front() {
            for next in visited.neighbors(cell) {
                if visited.cells()[next] {
                    continue;
                }
                visited.cells_mut()[next] = true;
                result.cells_mut()[next] = false;
                exterior += 1;
                frontier.push_back(next);
            }
        }

        if !self.include_shell {
            // Everything visited is either exterior or shell.
            for (out, &seen) in result.cells_mut().iter_mut().zip(visited.cells()) {
                *out &= !seen;
            }
        }
        result.set_layer(top, false)?;

        debug!(
            shell = shell_count,
            exterior,
            interior = result.count(),
            "solved interior"
        );
        Ok(result)
    }
}
