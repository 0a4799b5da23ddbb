//! Integration test: end-to-end properties of the trap and of position sweeps.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use tweezer_beams::{BeamProfile, GaussianBeam, Polarisation, UniformBeam};
use tweezer_core::{sweep, Lens, OpticalSystem, PositionAxis, PositionGrid};

const RP: f64 = 5e-6;

fn system_with(relative_index: f64, beam: Arc<dyn BeamProfile>) -> OpticalSystem {
    let lens = Lens::from_numerical_aperture(1.25, 1.33, 1e-3).unwrap();
    OpticalSystem::new(RP, relative_index, lens, beam).unwrap()
}

fn uniform_system(relative_index: f64) -> OpticalSystem {
    system_with(
        relative_index,
        Arc::new(UniformBeam::new(Polarisation::X).unwrap()),
    )
}

#[test]
fn test_index_matched_particle_feels_no_force() {
    let system = uniform_system(1.0);
    let grid = system.aperture_grid(50, 50).unwrap();
    for position in [[0.0, 0.0, 1.01 * RP], [0.3 * RP, -0.4 * RP, -0.2 * RP]] {
        let q = system.force_at(position, &grid).unwrap();
        for component in q {
            assert_abs_diff_eq!(component, 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_axial_restoring_force() {
    // Ahead of the focus the particle is pushed on; beyond it, pulled back.
    let system = uniform_system(1.2);
    let grid = system.aperture_grid(60, 60).unwrap();
    let before = system.force_at([0.0, 0.0, -RP], &grid).unwrap();
    let after = system.force_at([0.0, 0.0, RP], &grid).unwrap();
    assert!(before[2] > 0.0);
    assert!(after[2] < 0.0);
    assert_abs_diff_eq!(after[2], -0.2775, epsilon = 2e-3);
}

#[test]
fn test_low_index_particle_is_expelled() {
    let system = uniform_system(0.75);
    let grid = system.aperture_grid(60, 60).unwrap();
    let q = system.force_at([0.0, 0.0, 0.5 * RP], &grid).unwrap();
    assert!(q[2] > 0.0);
}

#[test]
fn test_low_index_particle_is_expelled_sideways() {
    // Off axis, many rays hit a bubble beyond its critical angle.
    let system = uniform_system(0.75);
    let grid = system.aperture_grid(60, 60).unwrap();
    let q = system.force_at([0.5 * RP, 0.0, 0.0], &grid).unwrap();
    assert_abs_diff_eq!(q[0], 0.2397, epsilon = 5e-3);
    assert_abs_diff_eq!(q[1], 0.0, epsilon = 1e-9);
    assert!(q[2] > 0.0);

    let q = system.force_at([RP, RP, -RP], &grid).unwrap();
    assert!(q.iter().all(|c| c.is_finite()));
}

#[test]
fn test_axial_positions_have_no_lateral_force() {
    let system = system_with(
        1.2,
        Arc::new(GaussianBeam::new(1.0, Polarisation::CircularLeft).unwrap()),
    );
    let grid = system.aperture_grid(60, 60).unwrap();
    for z in [-0.5 * RP, 0.5 * RP, 2.0 * RP] {
        let q = system.force_at([0.0, 0.0, z], &grid).unwrap();
        assert_abs_diff_eq!(q[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(q[1], 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_profile_changes_axial_efficiency() {
    // An underfilled (Gaussian) aperture has fewer steep rays and a weaker
    // backward gradient force than a uniform fill.
    let position = [0.0, 0.0, 1.01 * RP];
    let uniform = uniform_system(1.2);
    let gaussian = system_with(
        1.2,
        Arc::new(GaussianBeam::new(1.0, Polarisation::X).unwrap()),
    );
    let radial = system_with(
        1.2,
        Arc::new(GaussianBeam::new(1.0, Polarisation::Radial).unwrap()),
    );
    let grid = uniform.aperture_grid(100, 100).unwrap();

    let qu = uniform.force_at(position, &grid).unwrap()[2];
    let qg = gaussian.force_at(position, &grid).unwrap()[2];
    let qr = radial.force_at(position, &grid).unwrap()[2];

    assert_abs_diff_eq!(qu, -0.2778, epsilon = 2e-3);
    assert_abs_diff_eq!(qg, -0.2255, epsilon = 2e-3);
    assert_abs_diff_eq!(qr, -0.2668, epsilon = 2e-3);
}

#[test]
fn test_sweep_preserves_grid_order() {
    let system = uniform_system(1.2);
    let grid = system.aperture_grid(30, 30).unwrap();
    let positions = PositionGrid::new(
        PositionAxis::new(-0.5 * RP, 0.5 * RP, 3).unwrap(),
        PositionAxis::fixed(0.0),
        PositionAxis::new(-RP, RP, 4).unwrap(),
    )
    .unwrap();

    let records = sweep(&system, &positions, &grid).unwrap();
    assert_eq!(records.len(), 12);
    for (record, expected) in records.iter().zip(positions.positions()) {
        assert_eq!(record.position, expected);
        assert_eq!(record.force, system.force_at(expected, &grid).unwrap());
    }
}

#[test]
fn test_sweep_collapsed_axes() {
    let system = uniform_system(1.2);
    let grid = system.aperture_grid(20, 20).unwrap();
    let positions = PositionGrid::new(
        PositionAxis::new(0.0, 0.0, 50).unwrap(),
        PositionAxis::new(0.0, 0.0, 50).unwrap(),
        PositionAxis::new(RP, RP, 50).unwrap(),
    )
    .unwrap();
    let records = sweep(&system, &positions, &grid).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].position, [0.0, 0.0, RP]);
}

#[test]
fn test_axial_sweep_crosses_equilibrium() {
    let system = uniform_system(1.2);
    let grid = system.aperture_grid(40, 40).unwrap();
    let positions = PositionGrid::along_z(-RP, RP, 9).unwrap();
    let records = sweep(&system, &positions, &grid).unwrap();

    let crossings = records
        .windows(2)
        .filter(|w| w[0].force[2] > 0.0 && w[1].force[2] <= 0.0)
        .count();
    assert_eq!(crossings, 1);
}
