//! Sweep runner: builds the optical system from a job and writes the force map.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use tweezer_beams::{BeamProfile, GaussianBeam, UniformBeam};
use tweezer_core::{
    ashkin_efficiencies, sweep, ForceRecord, Lens, OpticalSystem, PositionGrid, RayEfficiency,
};

use crate::config::{BeamConfig, JobConfig, LensConfig, OutputFormat, ProfileKind};

/// Build the lens from either its numerical aperture or its radius.
pub fn build_lens(config: &LensConfig) -> Result<Lens> {
    let lens = match (config.numerical_aperture, config.radius) {
        (Some(na), None) => {
            Lens::from_numerical_aperture(na, config.medium_index, config.focal_distance)?
        }
        (None, Some(radius)) => Lens::new(radius, config.focal_distance)?,
        (Some(_), Some(_)) => {
            anyhow::bail!("[lens] takes either 'numerical_aperture' or 'radius', not both")
        }
        (None, None) => anyhow::bail!("[lens] requires 'numerical_aperture' or 'radius'"),
    };
    Ok(lens)
}

/// Build the beam profile strategy.
pub fn build_beam(config: &BeamConfig) -> Result<Arc<dyn BeamProfile>> {
    let beam: Arc<dyn BeamProfile> = match config.profile {
        ProfileKind::Uniform => Arc::new(UniformBeam::new(config.polarisation)?),
        ProfileKind::Gaussian => Arc::new(GaussianBeam::new(config.width, config.polarisation)?),
    };
    Ok(beam)
}

/// Build the optical system described by a job.
pub fn build_system(job: &JobConfig) -> Result<OpticalSystem> {
    let lens = build_lens(&job.lens).context("Invalid [lens] section")?;
    let beam = build_beam(&job.beam).context("Invalid [beam] section")?;
    let system = OpticalSystem::new(job.particle.radius, job.particle.relative_index, lens, beam)
        .context("Invalid [particle] section")?;
    Ok(system)
}

/// Position grid of a job.
pub fn build_positions(job: &JobConfig) -> Result<PositionGrid> {
    let p = &job.positions;
    PositionGrid::new(p.x, p.y, p.z).context("Invalid [positions] section")
}

/// Run the full position sweep of a job.
pub fn run_sweep(job: &JobConfig) -> Result<Vec<ForceRecord>> {
    let system = build_system(job)?;
    let positions = build_positions(job)?;
    let grid = system
        .aperture_grid(job.integration.radial_steps, job.integration.azimuthal_steps)
        .context("Invalid [integration] section")?;

    println!(
        "Particle: radius={:e}, n_r={}; lens: radius={:e}, f={:e}",
        system.sphere().radius(),
        system.sphere().relative_index(),
        system.lens().radius(),
        system.lens().focal_distance()
    );
    println!(
        "Beam: {} ({}); grid {}×{}; {} positions",
        system.beam().name(),
        job.beam.polarisation.label(),
        grid.radial_steps(),
        grid.azimuthal_steps(),
        positions.len()
    );

    let records = sweep(&system, &positions, &grid)?;
    Ok(records)
}

fn write_metadata<W: Write>(out: &mut W, job: &JobConfig) -> Result<()> {
    writeln!(out, "# tweezer-cli {} force map", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        out,
        "# particle: radius={:e}, relative_index={}",
        job.particle.radius, job.particle.relative_index
    )?;
    match (job.lens.numerical_aperture, job.lens.radius) {
        (Some(na), _) => writeln!(
            out,
            "# lens: focal_distance={:e}, numerical_aperture={}, medium_index={}",
            job.lens.focal_distance, na, job.lens.medium_index
        )?,
        (None, radius) => writeln!(
            out,
            "# lens: focal_distance={:e}, radius={:e}",
            job.lens.focal_distance,
            radius.unwrap_or(f64::NAN)
        )?,
    }
    match job.beam.profile {
        ProfileKind::Uniform => writeln!(
            out,
            "# beam: uniform, polarisation={}",
            job.beam.polarisation.label()
        )?,
        ProfileKind::Gaussian => writeln!(
            out,
            "# beam: gaussian, width={}, polarisation={}",
            job.beam.width,
            job.beam.polarisation.label()
        )?,
    }
    writeln!(
        out,
        "# grid: {} radial x {} azimuthal",
        job.integration.radial_steps, job.integration.azimuthal_steps
    )?;
    Ok(())
}

/// C-style `%.6e`: six decimals and a signed exponent of at least two digits.
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        // inf and NaN carry no exponent
        None => formatted,
    }
}

fn write_rows<W: Write>(out: &mut W, records: &[ForceRecord], delimiter: &str) -> Result<()> {
    for r in records {
        let row: Vec<String> = r.position.iter().chain(&r.force).map(|&v| scientific(v)).collect();
        writeln!(out, "{}", row.join(delimiter))?;
    }
    Ok(())
}

/// Tab-separated force map with a `#` metadata header.
pub fn write_tsv<W: Write>(out: &mut W, records: &[ForceRecord], job: &JobConfig) -> Result<()> {
    write_metadata(out, job)?;
    writeln!(out, "# x\ty\tz\tFx\tFy\tFz")?;
    write_rows(out, records, "\t")
}

/// Comma-separated force map with a `#` metadata header and a column header.
pub fn write_csv<W: Write>(out: &mut W, records: &[ForceRecord], job: &JobConfig) -> Result<()> {
    write_metadata(out, job)?;
    writeln!(out, "x,y,z,fx,fy,fz")?;
    write_rows(out, records, ",")
}

/// Force map as a pretty-printed JSON array.
pub fn write_json<W: Write>(out: &mut W, records: &[ForceRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, records)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    writeln!(out)?;
    Ok(())
}

/// Write the force map to `path` in the job's output format.
pub fn write_results(records: &[ForceRecord], path: &Path, job: &JobConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create '{}'", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = std::io::BufWriter::new(file);

    match job.output.format {
        OutputFormat::Tsv => write_tsv(&mut out, records, job)?,
        OutputFormat::Csv => write_csv(&mut out, records, job)?,
        OutputFormat::Json => write_json(&mut out, records)?,
    }
    out.flush()?;

    println!("Force map written to: {}", path.display());
    Ok(())
}

/// Single-ray efficiencies at `steps` incidence angles spanning [0°, 90°].
pub fn efficiency_table(
    relative_index: f64,
    steps: usize,
    p_fraction: f64,
) -> Result<Vec<RayEfficiency>> {
    if steps < 2 {
        anyhow::bail!("--steps must be at least 2, got {}", steps);
    }
    (0..steps)
        .map(|i| {
            let theta = std::f64::consts::FRAC_PI_2 * i as f64 / (steps - 1) as f64;
            ashkin_efficiencies(theta, relative_index, p_fraction)
                .with_context(|| format!("Cannot evaluate ray at {:.2} rad", theta))
        })
        .collect()
}

/// Print an efficiency table as aligned text columns.
pub fn write_efficiency_table<W: Write>(out: &mut W, table: &[RayEfficiency]) -> Result<()> {
    writeln!(out, "{:>8}  {:>12}  {:>12}  {:>12}", "theta", "Qs", "Qg", "|Q|")?;
    for q in table {
        writeln!(
            out,
            "{:>8.2}  {:>12.6}  {:>12.6}  {:>12.6}",
            q.incidence.to_degrees(),
            q.scattering,
            q.gradient,
            q.magnitude()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use approx::assert_abs_diff_eq;

    const JOB: &str = r#"
        [particle]
        radius = 5e-6
        relative_index = 1.2

        [lens]
        focal_distance = 1e-3
        numerical_aperture = 1.25
        medium_index = 1.33

        [integration]
        radial_steps = 30
        azimuthal_steps = 30

        [positions]
        z = { start = -5e-6, stop = 5e-6, steps = 3 }
    "#;

    fn records() -> Vec<ForceRecord> {
        vec![
            ForceRecord {
                position: [0.0, 0.0, -5e-6],
                force: [0.0, 0.0, 0.25],
            },
            ForceRecord {
                position: [0.0, 0.0, 5e-6],
                force: [1e-14, 0.0, -0.275],
            },
        ]
    }

    #[test]
    fn test_build_system_from_numerical_aperture() {
        let job = parse_config(JOB).unwrap();
        let system = build_system(&job).unwrap();
        let expected = 1e-3 * (1.25_f64 / 1.33).asin().tan();
        assert_abs_diff_eq!(system.lens().radius(), expected, epsilon = 1e-15);
        assert_eq!(system.beam().name(), "uniform");
    }

    #[test]
    fn test_lens_needs_exactly_one_size() {
        let both = JOB.replace("medium_index = 1.33", "medium_index = 1.33\nradius = 1e-3");
        assert!(build_system(&parse_config(&both).unwrap()).is_err());

        let neither = JOB.replace("numerical_aperture = 1.25", "");
        assert!(build_system(&parse_config(&neither).unwrap()).is_err());
    }

    #[test]
    fn test_invalid_particle_is_reported() {
        let job = parse_config(&JOB.replace("radius = 5e-6", "radius = -5e-6")).unwrap();
        let err = build_system(&job).unwrap_err();
        assert!(format!("{:#}", err).contains("[particle]"));
    }

    #[test]
    fn test_run_sweep_small_job() {
        let job = parse_config(JOB).unwrap();
        let records = run_sweep(&job).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].force[2] > 0.0);
        assert!(records[2].force[2] < 0.0);
    }

    #[test]
    fn test_tsv_rows() {
        let job = parse_config(JOB).unwrap();
        let mut buf = Vec::new();
        write_tsv(&mut buf, &records(), &job).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let rows: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            "0.000000e+00\t0.000000e+00\t5.000000e-06\t1.000000e-14\t0.000000e+00\t-2.750000e-01"
        );
        assert!(text.starts_with("# tweezer-cli"));
        assert!(text.contains("# beam: uniform, polarisation=linear-x"));
    }

    #[test]
    fn test_scientific_matches_printf() {
        assert_eq!(scientific(5e-6), "5.000000e-06");
        assert_eq!(scientific(0.0), "0.000000e+00");
        assert_eq!(scientific(-1.5e123), "-1.500000e+123");
        assert_eq!(scientific(12.0), "1.200000e+01");
    }

    #[test]
    fn test_csv_has_column_header() {
        let job = parse_config(JOB).unwrap();
        let mut buf = Vec::new();
        write_csv(&mut buf, &records(), &job).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut data = text.lines().filter(|l| !l.starts_with('#'));
        assert_eq!(data.next(), Some("x,y,z,fx,fy,fz"));
        assert_eq!(data.next().map(|l| l.split(',').count()), Some(6));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut buf = Vec::new();
        write_json(&mut buf, &records()).unwrap();
        let back: Vec<ForceRecord> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(back, records());
    }

    #[test]
    fn test_efficiency_table() {
        let table = efficiency_table(1.2, 91, 0.5).unwrap();
        assert_eq!(table.len(), 91);
        assert_abs_diff_eq!(table[0].gradient, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(table[90].incidence, std::f64::consts::FRAC_PI_2);
        assert!(efficiency_table(1.2, 1, 0.5).is_err());
        assert!(efficiency_table(1.2, 10, 1.5).is_err());

        let mut buf = Vec::new();
        write_efficiency_table(&mut buf, &table).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 92);
    }

    #[test]
    fn test_efficiency_table_for_bubble() {
        let table = efficiency_table(0.75, 91, 0.5).unwrap();
        assert!(table.iter().all(|q| q.scattering.is_finite() && q.gradient.is_finite()));
        // 60° is past the critical angle arcsin(0.75) ≈ 48.6°.
        assert_abs_diff_eq!(table[60].scattering, 0.5, epsilon = 1e-12);
    }
}
