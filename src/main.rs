use helmnet::{Command, NetConfig, Network};
use num_complex::Complex64;
use std::{env, error::Error, process::ExitCode};

const TICKS: usize = 20;

/// Built-in scene: 3 sensors into 2 hidden neurons into 1 output.
const DEMO_CONFIG: &str = r#"{
    "test": false,
    "test set count": 1,
    "learning rate": 0.05,
    "cycle limit": 50,
    "error limit mag": 0.01,
    "error limit ang": 0.5,
    "structure": {
        "layers": {
            "count": 3,
            "defs": [
                {
                    "type": "input",
                    "bias": {"re": 0.0, "im": 0.0},
                    "neurons": {
                        "count": 3,
                        "defs": [
                            {"inputs": {"count": 1, "weights": [{"re": 1.0, "im": 0.0}]},
                             "destinations": {"count": 0, "dests": []}},
                            {"inputs": {"count": 1, "weights": [{"re": 1.0, "im": 0.0}]},
                             "destinations": {"count": 0, "dests": []}},
                            {"inputs": {"count": 1, "weights": [{"re": 1.0, "im": 0.0}]},
                             "destinations": {"count": 0, "dests": []}}
                        ]
                    }
                },
                {
                    "type": "hidden",
                    "bias": {"re": 0.1, "im": 0.0},
                    "neurons": {
                        "count": 2,
                        "defs": [
                            {"inputs": {"count": 3, "weights": [
                                {"re": 0.8, "im": 0.0},
                                {"re": 0.3, "im": 0.1},
                                {"re": 0.3, "im": -0.1}]},
                             "destinations": {"count": 1, "dests": [0, 0]}},
                            {"inputs": {"count": 3, "weights": [
                                {"re": 0.5, "im": 0.0},
                                {"re": 0.4, "im": 0.0},
                                {"re": 0.4, "im": 0.0}]},
                             "destinations": {"count": 1, "dests": [0, 1]}}
                        ]
                    }
                },
                {
                    "type": "output",
                    "bias": {"re": 0.0, "im": 0.0},
                    "neurons": {
                        "count": 1,
                        "defs": [
                            {"inputs": {"count": 2, "weights": [
                                {"re": 1.0, "im": 0.0},
                                {"re": 1.0, "im": 0.0}]},
                             "destinations": {"count": 1, "dests": [0, 0]}}
                        ]
                    }
                }
            ]
        }
    }
}"#;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => NetConfig::from_file(path)?,
        None => NetConfig::from_str(DEMO_CONFIG)?,
    };
    let mut net = Network::new(&config)?;

    // exit signal dead ahead at full strength, two hills off to the sides.
    // Magnitudes pre-normalized so the strongest reading is 1.0.
    let sensors = [
        Complex64::from_polar(1., 0.),
        Complex64::from_polar(0.6, 0.8),
        Complex64::from_polar(0.4, -1.1),
    ];
    let target = Complex64::from_polar(1., 0.);

    let n_sensors = config.structure.layers.defs[0].neurons.count;
    if n_sensors > sensors.len() {
        return Err(format!(
            "demo scene provides {} sensors, config wants {n_sensors}",
            sensors.len()
        )
        .into());
    }

    for tick in 0..TICKS {
        match net.adapt(&sensors[..n_sensors], target) {
            Command::Converged => {
                let (mag, ang) = net.error_polar();
                println!("tick {tick}: converged, |error| {mag:.6} at {ang:.4} rad");
                break;
            }
            Command::Adjust(cmd) => {
                println!(
                    "tick {tick}: Δspeed {:.4} Δheading {:.4} rad (|error| {:.6})",
                    cmd.norm(),
                    cmd.arg(),
                    net.last_error().norm()
                );
            }
        }
    }
    Ok(())
}
