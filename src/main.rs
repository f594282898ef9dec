use gravbox::{bench_gravity, bench_step, Preset, Sandbox, ScenarioConfig};
use gravbox::simulation::forces::total_energy;

use anyhow::{bail, Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Headless driver for the gravbox sandbox engine")]
struct Args {
    /// YAML scenario file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Preset name (binary_star, solar_system, figure_eight,
    /// cluster_collision, lagrange_five, chaos_field)
    #[arg(short, long)]
    preset: Option<String>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    steps: usize,

    /// Print a summary line every this many ticks
    #[arg(long, default_value_t = 100)]
    report_every: usize,

    /// Run the gravity timing benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

fn load_scenario(path: &PathBuf) -> Result<ScenarioConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let cfg = serde_yaml::from_reader(reader).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.bench {
        bench_gravity();
        bench_step();
        return Ok(());
    }

    let mut sandbox = match (&args.file, &args.preset) {
        (Some(path), _) => {
            let cfg = load_scenario(path)?;
            Sandbox::from_config(&cfg).context("spawning scenario bodies")?
        }
        (None, Some(name)) => {
            let Some(preset) = Preset::from_name(name) else {
                bail!("unknown preset {name:?}");
            };
            let mut sandbox = Sandbox::new(Default::default());
            sandbox.apply_preset(preset);
            sandbox
        }
        (None, None) => {
            let mut sandbox = Sandbox::new(Default::default());
            sandbox.apply_preset(Preset::BinaryStar);
            sandbox
        }
    };

    let mut merges = 0usize;
    let mut breakups = 0usize;

    for tick in 1..=args.steps {
        sandbox.step();
        merges += sandbox.collisions().len();
        breakups += sandbox.disruptions().len();

        if tick % args.report_every == 0 {
            let p = sandbox.params();
            println!(
                "t = {:9.2}  bodies = {:5}  energy = {:13.4}  merges = {merges}  breakups = {breakups}",
                sandbox.time(),
                sandbox.count(),
                total_energy(sandbox.store(), p.G, p.eps2),
            );
        }
    }

    let p = sandbox.params();
    println!(
        "done: {} ticks, {} bodies, energy {:.4}, {merges} merges, {breakups} breakups",
        args.steps,
        sandbox.count(),
        total_energy(sandbox.store(), p.G, p.eps2),
    );
    Ok(())
}
