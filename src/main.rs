use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rfstrip::config::{DesignConfig, Quantity, SweepConfig};
use rfstrip::element::{ConductorLoss, Elem, Resonator};
use rfstrip::network::Response;
use rfstrip::scale::Scale;
use rfstrip::unit::Unit;
use rfstrip::{file, logger, report};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rfstrip")]
#[command(about = "Closed-form microstrip line, filter and resonator calculator")]
struct Cli {
    /// Path to a TOML design file; built-in FR4 defaults otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the response as a JSON table
    #[arg(long, global = true)]
    json: Option<PathBuf>,

    /// Write the response as a Touchstone .s2p file
    #[arg(long, global = true)]
    touchstone: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    substrate: SubstrateArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SubstrateArgs {
    /// Substrate relative permittivity
    #[arg(long, global = true)]
    er: Option<f64>,

    /// Substrate height, e.g. 1.6mm
    #[arg(long, global = true)]
    height: Option<String>,

    /// Substrate loss tangent
    #[arg(long, global = true)]
    tand: Option<f64>,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Sweep start, e.g. 1GHz
    #[arg(long)]
    start: Option<String>,

    /// Sweep stop, e.g. 10GHz
    #[arg(long)]
    stop: Option<String>,

    /// Number of sweep points
    #[arg(long)]
    points: Option<usize>,
}

impl SweepArgs {
    fn apply(&self, sweep: &mut SweepConfig) {
        if let Some(start) = &self.start {
            sweep.start = Quantity::from(start.as_str());
        }
        if let Some(stop) = &self.stop {
            sweep.stop = Quantity::from(stop.as_str());
        }
        if let Some(points) = self.points {
            sweep.points = points;
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a uniform line and its two-port response
    Line {
        /// Strip width, e.g. 2mm
        #[arg(long)]
        width: Option<String>,

        /// Line length, e.g. 10mm
        #[arg(long)]
        length: Option<String>,

        /// Synthesize the width for this impedance instead (Ω)
        #[arg(long, conflicts_with = "width")]
        z0: Option<f64>,

        /// Port reference impedance (Ω)
        #[arg(long)]
        z_ref: Option<f64>,

        /// Drop the empirical conductor loss term
        #[arg(long)]
        no_conductor_loss: bool,

        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Synthesize a stepped-impedance low-pass filter
    Lpf {
        /// Cutoff frequency, e.g. 3GHz
        #[arg(long)]
        cutoff: Option<String>,

        /// Filter order
        #[arg(long)]
        order: Option<usize>,

        /// System impedance (Ω)
        #[arg(long)]
        z0: Option<f64>,

        /// Export the maximally flat reference curve instead of the lumped model
        #[arg(long)]
        ideal: bool,

        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// Gap-coupled quarter-wave resonator response
    Resonator {
        /// Coupling gap, e.g. 0.05mm
        #[arg(long)]
        gap: Option<String>,

        /// Resonator length, e.g. 6mm
        #[arg(long)]
        length: Option<String>,

        /// Strip width, e.g. 1mm
        #[arg(long)]
        width: Option<String>,

        /// Also print the layout resonating at this frequency, e.g. 8GHz
        #[arg(long)]
        target: Option<String>,

        #[command(flatten)]
        sweep: SweepArgs,
    },
}

fn load_config(cli: &Cli) -> Result<DesignConfig> {
    let mut config = match &cli.config {
        Some(path) => DesignConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => DesignConfig::default(),
    };
    if let Some(er) = cli.substrate.er {
        config.substrate.er = er;
    }
    if let Some(height) = &cli.substrate.height {
        config.substrate.height = Quantity::from(height.as_str());
    }
    if let Some(tand) = cli.substrate.tand {
        config.substrate.tand = tand;
    }
    Ok(config)
}

fn export(cli: &Cli, resp: &Response) -> Result<()> {
    if let Some(path) = &cli.json {
        std::fs::write(path, resp.to_json()?)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!("JSON written to {}", path.display());
    }
    if let Some(path) = &cli.touchstone {
        file::write_touchstone(path, resp)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!("Touchstone written to {}", path.display());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    let sub = config.substrate.build().context("invalid substrate")?;

    match &cli.command {
        Command::Line {
            width,
            length,
            z0,
            z_ref,
            no_conductor_loss,
            sweep,
        } => {
            if let Some(width) = width {
                config.line.width = Quantity::from(width.as_str());
            }
            if let Some(z0) = z0 {
                config.line.width = Quantity::Value(sub.width(*z0)?);
            }
            if let Some(length) = length {
                config.line.length = Quantity::from(length.as_str());
            }
            if let Some(z_ref) = z_ref {
                config.line.z_ref = *z_ref;
            }
            if *no_conductor_loss {
                config.line.conductor_loss = ConductorLoss::None;
            }
            sweep.apply(&mut config.sweep);

            let tl = config.line.build(&sub).context("invalid line")?;
            let freq = config.sweep.build().context("invalid sweep")?;
            print!("{}", report::line_summary(&tl)?);
            let resp = tl.response(&freq)?;
            print!("{}", report::response_summary(&resp));
            export(cli, &resp)?;
        }
        Command::Lpf {
            cutoff,
            order,
            z0,
            ideal,
            sweep,
        } => {
            if let Some(cutoff) = cutoff {
                config.lpf.cutoff = Quantity::from(cutoff.as_str());
            }
            if let Some(order) = order {
                config.lpf.order = *order;
            }
            if let Some(z0) = z0 {
                config.lpf.z0 = *z0;
            }
            sweep.apply(&mut config.lpf.sweep);

            let lpf = config.lpf.build(&sub).context("filter synthesis failed")?;
            let freq = config.lpf.sweep.build().context("invalid sweep")?;
            print!("{}", report::lpf_summary(&lpf));
            let resp = match *ideal {
                true => lpf.ideal_response(&freq)?,
                false => lpf.response(&freq)?,
            };
            println!();
            print!("{}", report::response_summary(&resp));
            export(cli, &resp)?;
        }
        Command::Resonator {
            gap,
            length,
            width,
            target,
            sweep,
        } => {
            if let Some(gap) = gap {
                config.resonator.gap = Quantity::from(gap.as_str());
            }
            if let Some(length) = length {
                config.resonator.length = Quantity::from(length.as_str());
            }
            if let Some(width) = width {
                config.resonator.width = Quantity::from(width.as_str());
            }
            sweep.apply(&mut config.resonator.sweep);

            let res = config.resonator.build(&sub).context("invalid resonator")?;
            let freq = config.resonator.sweep.build().context("invalid sweep")?;
            let out = res.analyze(&freq)?;
            print!("{}", report::resonator_summary(&res, &out));
            print!("{}", report::response_summary(&out.response));
            if let Some(target) = target {
                let f = Quantity::from(target.as_str()).val(Unit::Hz)?;
                let (d, g, l) = Resonator::dimensions_for(&sub, res.width(), f)?;
                println!(
                    "\nDimensions for {:.3} GHz: d = {:.3} mm, g = {:.3} mm, length = {:.3} mm",
                    Scale::Giga.scale(f),
                    Scale::Milli.scale(d),
                    Scale::Milli.scale(g),
                    Scale::Milli.scale(l)
                );
            }
            export(cli, &out.response)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);
    tracing::debug!("CLI: {:?}", cli);
    run(&cli)
}
