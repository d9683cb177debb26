//! A single unit: weighted complex sum, bias, magnitude-only squash, plus
//! the per-input error mailboxes used by the backward pass.

use crate::{complex::Squash, config::NeuronConfig};
use core::error::Error;
use num_complex::Complex64;

#[derive(Debug, Clone)]
pub struct Neuron {
    pub weights: Vec<Complex64>,
    /// Copy of the owning layer's bias. Read-only from this side.
    bias: Complex64,
    /// Input-layer neurons forward their single input verbatim.
    pass_through: bool,
    pub output: Complex64,
    /// Backward error staged per input slot. Written by
    /// [Neuron::receive_error] and read by the previous layer.
    errors: Vec<Complex64>,
}

impl Neuron {
    pub fn new(
        config: &NeuronConfig,
        bias: Complex64,
        pass_through: bool,
    ) -> Result<Self, Box<dyn Error>> {
        if config.inputs.count != config.inputs.weights.len() {
            return Err(format!(
                "neuron declares {} inputs but carries {} weights",
                config.inputs.count,
                config.inputs.weights.len()
            )
            .into());
        }
        Ok(Self {
            weights: config.inputs.weights.clone(),
            bias,
            pass_through,
            output: Complex64::new(0., 0.),
            errors: vec![Complex64::new(0., 0.); config.inputs.count],
        })
    }

    /// Weighted sum of inputs plus bias, squashed; or the bare first input
    /// for pass-through neurons. The result is kept for the error
    /// computation and for the next layer's forward pass.
    pub fn forward(&mut self, inputs: &[Complex64]) -> Complex64 {
        self.output = if self.pass_through {
            inputs[0]
        } else {
            let mut net = self.bias;
            for (w, x) in self.weights.iter().zip(inputs) {
                net += w * x;
            }
            net.squash()
        };
        self.output
    }

    /// Stage (overwrite) a backward error at the given input slot.
    pub fn receive_error(&mut self, slot: usize, error: Complex64) {
        self.errors[slot] = error;
    }

    pub fn errors(&self) -> &[Complex64] {
        &self.errors
    }

    /// Stage the same error at every input slot, so any (neuron, slot)
    /// coordinate pointing here picks it up on the next layer back.
    pub fn stage_all(&mut self, error: Complex64) {
        for e in self.errors.iter_mut() {
            *e = error;
        }
    }

    /// `w -= error * rate` across all weights. Deliberately not scaled by a
    /// local derivative; behavioral fidelity to the reference update rule.
    pub fn update_weights(&mut self, error_sum: Complex64, rate: f64) {
        for w in self.weights.iter_mut() {
            *w -= error_sum * rate;
        }
    }
}
