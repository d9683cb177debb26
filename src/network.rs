//! The trainable net. Owns its layers outright; one caller at a time, one
//! simulation tick per adapt call.

use crate::{complex::mag_deg, config::NetConfig, layer::Layer};
use core::error::Error;
use num_complex::Complex64;

/// Result of a single training step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Converged,
}

/// What the vehicle gets back from an adapt call: a complex steering
/// adjustment (magnitude = Δspeed, phase = Δheading) or word that the net
/// is already at its optimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Adjust(Complex64),
    Converged,
}

#[derive(Debug)]
pub struct Network {
    layers: Vec<Layer>,
    rate: f64,
    cycle_limit: usize,
    errlim_mag: f64,
    /// Carried but never compared; convergence gates on magnitude only.
    #[allow(dead_code)]
    errlim_ang: f64,
    verbose: bool,
    last_error: Complex64,
    sensor_inputs: Vec<Complex64>,
}

impl Network {
    /// Build the whole layer/neuron tree from a validated config. Any
    /// structural mismatch is fatal here; nothing is constructed partially.
    pub fn new(config: &NetConfig) -> Result<Self, Box<dyn Error>> {
        config.validate()?;
        let layers = config
            .structure
            .layers
            .defs
            .iter()
            .map(Layer::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            layers,
            rate: config.learning_rate,
            cycle_limit: config.cycle_limit,
            errlim_mag: config.errlim_mag,
            errlim_ang: config.errlim_ang,
            verbose: config.test,
            last_error: Complex64::new(0., 0.),
            sensor_inputs: vec![],
        })
    }

    /// One forward pass, an error check, and (unless converged) one
    /// backward pass. `sensor_inputs` must carry one reading per
    /// input-layer neuron; a short vector panics.
    pub fn step(&mut self, sensor_inputs: &[Complex64], target: Complex64) -> Outcome {
        self.sensor_inputs = sensor_inputs.to_vec();

        let mut previous = sensor_inputs.to_vec();
        for layer in self.layers.iter_mut() {
            previous = layer.forward(&previous);
        }
        if self.verbose {
            self.trace_state();
        }

        let error = self.total_error(target);
        self.last_error = error;
        if self.verbose {
            let (mag, deg) = mag_deg(error);
            println!("after feedforward, error is {mag} at {deg} degrees");
        }
        if error.norm() < self.errlim_mag {
            // optimum for this tick; leave the weights alone
            return Outcome::Converged;
        }

        // stage the error in the virtual error slot, then walk backward.
        // The output layer resolves destinations against its own mailboxes,
        // every other layer against the next one out. The input layer has
        // no weights and is never walked into.
        let last = self.layers.len() - 1;
        self.layers[last].inject_final_error(error);
        for idx in (1..=last).rev() {
            let source = if idx == last {
                self.layers[idx].staged()
            } else {
                self.layers[idx + 1].staged()
            };
            self.layers[idx].backward(&source, self.rate);
        }
        Outcome::Continue
    }

    /// Train against one tick's sensor data until the error magnitude drops
    /// under the configured limit or the cycle budget runs out. Running out
    /// is a normal outcome: the last computed command comes back.
    pub fn adapt(&mut self, sensor_inputs: &[Complex64], target: Complex64) -> Command {
        if self.verbose {
            self.trace_adapt(sensor_inputs, target);
        }
        let mut command = Command::Adjust(self.output());
        for cycle in 0..self.cycle_limit {
            match self.step(sensor_inputs, target) {
                Outcome::Converged => return Command::Converged,
                Outcome::Continue => command = Command::Adjust(self.output()),
            }
            if self.verbose {
                let (e_mag, e_ang) = mag_deg(self.last_error);
                println!("e_mag:{e_mag} e_ang:{e_ang} cycle:{cycle}");
            }
        }
        command
    }

    /// Exactly one training step for this tick, converged or not.
    pub fn adapt_once(&mut self, sensor_inputs: &[Complex64], target: Complex64) -> Command {
        if self.verbose {
            self.trace_adapt(sensor_inputs, target);
        }
        match self.step(sensor_inputs, target) {
            Outcome::Converged => Command::Converged,
            Outcome::Continue => Command::Adjust(self.output()),
        }
    }

    /// `0.5 * (target - output)^2` over the single trained output signal.
    fn total_error(&self, target: Complex64) -> Complex64 {
        let d = target - self.output();
        d * d * 0.5
    }

    /// Terminal activation: neuron 0 of the output layer. This is the
    /// vehicle-facing command value on a non-converged step.
    pub fn output(&self) -> Complex64 {
        self.layers[self.layers.len() - 1].neurons[0].output
    }

    /// Total error from the most recent step.
    pub fn last_error(&self) -> Complex64 {
        self.last_error
    }

    /// Magnitude and phase of the last total error.
    pub fn error_polar(&self) -> (f64, f64) {
        self.last_error.to_polar()
    }

    fn trace_adapt(&self, sensor_inputs: &[Complex64], target: Complex64) {
        println!("adapt to sensor inputs:");
        for (i, s) in sensor_inputs.iter().enumerate() {
            let (mag, deg) = mag_deg(*s);
            println!("{i} : mag = {mag} angle = {deg} deg");
        }
        let (mag, deg) = mag_deg(target);
        println!("target: mag = {mag} angle = {deg} deg");
    }

    fn trace_state(&self) {
        for (i, s) in self.sensor_inputs.iter().enumerate() {
            let (mag, deg) = mag_deg(*s);
            println!("sensor {i}: {mag} at {deg} deg");
        }
        for (l_idx, layer) in self.layers.iter().enumerate() {
            let (b_mag, b_deg) = mag_deg(layer.bias);
            println!(
                "LAYER {l_idx} {:?} bias {b_mag} at {b_deg} deg",
                layer.kind
            );
            for (n_idx, neuron) in layer.neurons.iter().enumerate() {
                for (w_idx, w) in neuron.weights.iter().enumerate() {
                    let (mag, deg) = mag_deg(*w);
                    println!("  neuron {n_idx} weight {w_idx}: {mag} at {deg} deg");
                }
                let (mag, deg) = mag_deg(neuron.output);
                println!("  neuron {n_idx} output: {mag} at {deg} deg");
            }
        }
    }
}
