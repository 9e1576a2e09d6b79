//! Runs the fill-level pipeline over a small catalog of procedural tanks.
//!
//! Usage:
//! ```text
//! cargo run --example batch                  # CSV to stdout
//! cargo run --example batch -- curves.csv    # CSV to a file
//! RUST_LOG=tankfill=debug cargo run --example batch
//! ```

use std::fs::File;
use std::io::{self, BufWriter};

use tankfill::batch::FillBatch;
use tankfill::catalog::{Part, TankCatalog, TankDefinition, UnitCache, UnitDescriptor};
use tankfill::error::CatalogError;
use tankfill::math::Point3;
use tankfill::mesh::{MakeBoxMesh, MakeCylinderMesh, TriangleMesh};
use tankfill::operations::SurfaceRasterizer;
use tankfill::Result;

/// Procedural stand-ins for the exported tank meshes.
///
/// Round tanks are modelled in meters, the segment parts in millimeters and
/// the slim tank in decimeters, like real exports mixing units.
fn load_mesh(unit: &UnitDescriptor) -> Result<TriangleMesh> {
    match (unit.system.as_str(), unit.volume_l) {
        ("Round", 1500) => MakeCylinderMesh::new(Point3::origin(), 0.6, 1.35)
            .with_open_top(true)
            .execute(),
        ("Round", 3000) => MakeCylinderMesh::new(Point3::origin(), 0.8, 1.5)
            .with_open_top(true)
            .execute(),
        ("Slim", 3000) => MakeBoxMesh::new(Point3::origin(), Point3::new(25.0, 12.0, 10.0))
            .with_open_top(true)
            .execute(),
        ("Segment", 3750) => MakeCylinderMesh::new(Point3::origin(), 800.0, 1900.0).execute(),
        ("Segment", 2500) => {
            MakeBoxMesh::new(Point3::origin(), Point3::new(1600.0, 800.0, 1950.0)).execute()
        }
        _ => Err(CatalogError::MeshUnavailable(unit.label()).into()),
    }
}

fn catalog() -> Result<TankCatalog> {
    let mut catalog = TankCatalog::new();
    catalog.add(TankDefinition::single(UnitDescriptor::new("Round", 1500)));
    catalog.add(TankDefinition::single(
        UnitDescriptor::new("Round", 3000).with_scale_to_volume(true),
    ));
    catalog.add(TankDefinition::single(
        UnitDescriptor::new("Slim", 3000).with_scale_to_volume(true),
    ));

    let end_cap = UnitDescriptor::new("Segment", 3750);
    let middle = UnitDescriptor::new("Segment", 2500);
    catalog.add(TankDefinition::assembled(
        UnitDescriptor::new("Long", 10_000),
        vec![Part::new(end_cap.clone(), 2), Part::new(middle.clone(), 1)],
    ));
    for total in [15_000, 20_000] {
        catalog.add(TankDefinition::segmented(
            UnitDescriptor::new("Long", total),
            end_cap.clone(),
            middle.clone(),
        )?);
    }
    // no mesh for this one: reported, the rest still runs
    catalog.add(TankDefinition::single(UnitDescriptor::new("Round", 4000)));
    Ok(catalog)
}

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for tankfill.
    // Override with RUST_LOG env var (e.g. RUST_LOG=tankfill=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("tankfill=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let catalog = catalog()?;
    let rasterizer = SurfaceRasterizer::new();
    let mut cache = UnitCache::new();

    let report = FillBatch::new(&load_mesh, &rasterizer).run(&catalog, &mut cache);

    for row in &report.table.rows {
        let gradient = row.curve.gradient();
        let peak = gradient.iter().copied().fold(0.0_f64, f64::max);
        tracing::info!(
            tank = %row.name,
            height_m = row.curve.max_height_m(),
            volume_l = ?row.curve.last(),
            peak_l_per_step = peak,
            "curve"
        );
    }
    for failure in &report.failures {
        tracing::warn!(tank = %failure.name, error = %failure.error, "no curve");
    }

    match std::env::args().nth(1) {
        Some(path) => report.table.write_csv(BufWriter::new(File::create(path)?))?,
        None => report.table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}
