//! CircuitLab CLI - evaluate DC circuit topologies from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use circuitlab::{
    evaluate, CircuitConfig, CircuitSimulation, CircuitTopology, ComponentId,
    DerivedElectricalState,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "circuitlab")]
#[command(about = "DC circuit physics evaluation tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the circuit at a single instant
    Eval {
        /// Circuit topology
        #[arg(short, long, value_enum, default_value = "series")]
        topology: Topology,

        /// Battery voltage in volts
        #[arg(short, long, default_value_t = 9.0)]
        voltage: f64,

        /// First resistance in ohms
        #[arg(long, default_value_t = 100.0)]
        r1: f64,

        /// Second resistance in ohms
        #[arg(long, default_value_t = 200.0)]
        r2: f64,

        /// Capacitance in microfarads (rc-delay only)
        #[arg(short, long, default_value_t = 100.0)]
        capacitance: f64,

        /// Elapsed seconds since the switch closed
        #[arg(long, default_value_t = 0.0)]
        time: f64,

        /// Evaluate with the switch open
        #[arg(long)]
        open: bool,

        /// Load the configuration from a JSON file instead of flags
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Print a time series of the circuit state
    Trace {
        /// Circuit topology
        #[arg(short, long, value_enum, default_value = "rc-delay")]
        topology: Topology,

        /// Battery voltage in volts
        #[arg(short, long, default_value_t = 10.0)]
        voltage: f64,

        /// First resistance in ohms
        #[arg(long, default_value_t = 1000.0)]
        r1: f64,

        /// Second resistance in ohms
        #[arg(long, default_value_t = 200.0)]
        r2: f64,

        /// Capacitance in microfarads (rc-delay only)
        #[arg(short, long, default_value_t = 100.0)]
        capacitance: f64,

        /// Total duration to trace, in seconds
        #[arg(short, long, default_value_t = 0.5)]
        duration: f64,

        /// Number of uniform steps
        #[arg(short, long, default_value_t = 10)]
        steps: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List supported circuit topologies
    Topologies {
        /// Show formula descriptions
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Topology {
    /// Two lamps in series
    Series,
    /// Two lamps in parallel branches
    Parallel,
    /// Resistor charging a capacitor
    RcDelay,
}

impl From<Topology> for CircuitTopology {
    fn from(t: Topology) -> Self {
        match t {
            Topology::Series => CircuitTopology::Series,
            Topology::Parallel => CircuitTopology::Parallel,
            Topology::RcDelay => CircuitTopology::RcDelay,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Eval {
            topology,
            voltage,
            r1,
            r2,
            capacitance,
            time,
            open,
            config,
            format,
        } => handle_eval(
            topology.into(),
            voltage,
            r1,
            r2,
            capacitance,
            time,
            open,
            config,
            format,
        ),
        Commands::Trace {
            topology,
            voltage,
            r1,
            r2,
            capacitance,
            duration,
            steps,
            format,
        } => handle_trace(
            topology.into(),
            voltage,
            r1,
            r2,
            capacitance,
            duration,
            steps,
            format,
        ),
        Commands::Topologies { verbose } => {
            handle_topologies(verbose);
            0
        }
    };

    process::exit(exit_code);
}

fn load_or_build_config(
    voltage: f64,
    r1: f64,
    r2: f64,
    capacitance: f64,
    open: bool,
    config_file: Option<&PathBuf>,
) -> Result<CircuitConfig, String> {
    if let Some(path) = config_file {
        circuitlab::load_config(path)
            .map_err(|e| format!("Failed to load {}: {}", path.display(), e))
    } else {
        Ok(CircuitConfig::new(voltage, r1, r2)
            .with_capacitance_uf(capacitance)
            .with_switch_closed(!open))
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_eval(
    topology: CircuitTopology,
    voltage: f64,
    r1: f64,
    r2: f64,
    capacitance: f64,
    time: f64,
    open: bool,
    config_file: Option<PathBuf>,
    format: OutputFormat,
) -> i32 {
    let config = match load_or_build_config(voltage, r1, r2, capacitance, open, config_file.as_ref())
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match evaluate(topology, &config, time) {
        Ok(state) => {
            output_state(topology, time, &state, &format);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_trace(
    topology: CircuitTopology,
    voltage: f64,
    r1: f64,
    r2: f64,
    capacitance: f64,
    duration: f64,
    steps: usize,
    format: OutputFormat,
) -> i32 {
    if steps == 0 || duration <= 0.0 {
        eprintln!("Error: duration must be > 0 and steps must be >= 1");
        return 1;
    }

    let config = CircuitConfig::new(voltage, r1, r2)
        .with_capacitance_uf(capacitance)
        .with_switch_closed(true);

    let sim = match CircuitSimulation::new(topology, config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut rows = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let t = duration * step as f64 / steps as f64;
        match sim.state_at(t) {
            Ok(state) => rows.push((t, state)),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }

    match format {
        OutputFormat::Human => {
            println!("Topology: {}", topology);
            println!(
                "{:>10} {:>14} {:>10} {:>10} {:>10}",
                "t (s)", "I (A)", "B1", "B2", "Vc (V)"
            );
            for (t, state) in &rows {
                println!(
                    "{:>10.4} {:>14.6} {:>10.4} {:>10.4} {:>10.4}",
                    t,
                    state.total_current,
                    state.brightness(ComponentId::Lamp1),
                    state.brightness(ComponentId::Lamp2),
                    state.capacitor_voltage.unwrap_or(0.0)
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topology": topology,
                "rows": rows.iter().map(|(t, state)| {
                    serde_json::json!({
                        "time": t,
                        "state": state,
                    })
                }).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }
    0
}

fn output_state(
    topology: CircuitTopology,
    time: f64,
    state: &DerivedElectricalState,
    format: &OutputFormat,
) {
    match format {
        OutputFormat::Human => {
            println!("Topology:      {}", topology);
            println!("Elapsed:       {} s", time);
            println!("Total current: {:.6} A", state.total_current);
            for (component, brightness) in &state.branch_brightness {
                println!("Brightness {}: {:.4}", component, brightness);
            }
            if let Some(vc) = state.capacitor_voltage {
                println!("Capacitor:     {:.4} V", vc);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "topology": topology,
                "time": time,
                "state": state,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }
}

fn handle_topologies(verbose: bool) {
    println!("Supported topologies:\n");
    for topology in CircuitTopology::ALL {
        println!("  {}", topology);
        if verbose {
            println!("    {}", topology.description());
        }
        println!();
    }
}
