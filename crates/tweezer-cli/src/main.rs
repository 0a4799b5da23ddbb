//! Tweezer command-line interface.
//!
//! Compute optical-trap force maps from TOML configuration files:
//! ```sh
//! tweezer-cli run job.toml
//! tweezer-cli validate job.toml
//! tweezer-cli efficiency --index 1.2
//! tweezer-cli profiles
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tweezer-cli")]
#[command(about = "Tweezer: ray-optics forces on dielectric spheres")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep particle positions and write the force map.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output file (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the sweep.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Tabulate single-ray scattering and gradient efficiencies.
    Efficiency {
        /// Relative refractive index of the particle.
        #[arg(short, long)]
        index: f64,
        /// Number of incidence angles between 0° and 90°.
        #[arg(short, long, default_value_t = 19)]
        steps: usize,
        /// Fraction of power polarised in the plane of incidence.
        #[arg(short, long, default_value_t = 0.5)]
        p_fraction: f64,
    },
    /// Display the available beam profiles and polarisation modes.
    Profiles,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Tweezer Force Map");
            println!("=================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let records = runner::run_sweep(&job)?;

            let path = output.unwrap_or_else(|| PathBuf::from(&job.output.file));
            runner::write_results(&records, &path, &job)?;

            println!("Sweep complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let system = runner::build_system(&job)?;
            let positions = runner::build_positions(&job)?;
            system.aperture_grid(job.integration.radial_steps, job.integration.azimuthal_steps)?;
            println!("Configuration is valid: {}", config.display());
            println!(
                "  lens radius {:e}, NA {:.4} in n = {}",
                system.lens().radius(),
                system.lens().numerical_aperture(job.lens.medium_index),
                job.lens.medium_index
            );
            println!("  {} positions", positions.len());
            Ok(())
        }
        Commands::Efficiency {
            index,
            steps,
            p_fraction,
        } => {
            let table = runner::efficiency_table(index, steps, p_fraction)?;
            println!("Single-ray efficiencies, n_r = {}, Pp = {}", index, p_fraction);
            runner::write_efficiency_table(&mut std::io::stdout().lock(), &table)?;
            Ok(())
        }
        Commands::Profiles => {
            println!("Beam profiles ([beam] profile):");
            println!();
            println!("  uniform   — Uniformly filled aperture, I = 1/(πR²)");
            println!("  gaussian  — Gaussian truncated by the aperture, 1/e² radius = width·R");
            println!();
            println!("Polarisation modes ([beam] polarisation):");
            println!();
            println!("  x, y                           — Linear");
            println!("  circular-left, circular-right  — (1, ±i)/√2");
            println!("  radial, azimuthal              — Cylindrical vector beams");
            println!("  {{ jones = [[re, im], [re, im]] }} — Arbitrary uniform state");
            Ok(())
        }
    }
}
