//! An ordered column of neurons. Neuron index is semantically meaningful:
//! destination coordinates in the previous layer route by it.

use crate::{
    config::{Dest, LayerConfig, LayerKind},
    neuron::Neuron,
};
use core::error::Error;
use num_complex::Complex64;

#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub bias: Complex64,
    pub neurons: Vec<Neuron>,
    /// Per-neuron destination coordinates, parallel to `neurons`.
    dests: Vec<Vec<Dest>>,
}

impl Layer {
    pub fn new(config: &LayerConfig) -> Result<Self, Box<dyn Error>> {
        if config.neurons.count != config.neurons.defs.len() {
            return Err(format!(
                "layer declares {} neurons but defines {}",
                config.neurons.count,
                config.neurons.defs.len()
            )
            .into());
        }
        let pass_through = config.kind == LayerKind::Input;
        let neurons = config
            .neurons
            .defs
            .iter()
            .map(|n| Neuron::new(n, config.bias, pass_through))
            .collect::<Result<Vec<_>, _>>()?;
        let dests = config
            .neurons
            .defs
            .iter()
            .map(|n| n.destinations.pairs().collect())
            .collect();
        Ok(Self {
            kind: config.kind,
            bias: config.bias,
            neurons,
            dests,
        })
    }

    /// Forward the input vector through every neuron in index order.
    ///
    /// Input-layer neurons each pass through their own sensor; every other
    /// layer hands the previous layer's full output vector to each neuron.
    /// An input layer must get one sensor per neuron, and panics otherwise.
    pub fn forward(&mut self, inputs: &[Complex64]) -> Vec<Complex64> {
        if self.kind == LayerKind::Input {
            assert!(
                inputs.len() >= self.neurons.len(),
                "input layer expects {} sensors, got {}",
                self.neurons.len(),
                inputs.len()
            );
            self.neurons
                .iter_mut()
                .enumerate()
                .map(|(i, n)| n.forward(&inputs[i..i + 1]))
                .collect()
        } else {
            self.neurons.iter_mut().map(|n| n.forward(inputs)).collect()
        }
    }

    /// Stage the network's final error into the last neuron's slot-0
    /// mailbox: the virtual error layer convention, from which normal
    /// backward routing proceeds unchanged.
    pub fn inject_final_error(&mut self, error: Complex64) {
        let last = self.neurons.len() - 1;
        self.neurons[last].receive_error(0, error);
    }

    /// Snapshot of every neuron's staged error mailboxes, in index order.
    /// Taken by the network before a backward pass so the source and the
    /// updated layer may be the same layer.
    pub fn staged(&self) -> Vec<Vec<Complex64>> {
        self.neurons.iter().map(|n| n.errors().to_vec()).collect()
    }

    /// For each neuron: sum the errors staged at its destination
    /// coordinates in `source`, update its weights with the sum, and stage
    /// the sum in its own mailboxes for the layer behind it.
    pub fn backward(&mut self, source: &[Vec<Complex64>], rate: f64) {
        for (neuron, dests) in self.neurons.iter_mut().zip(&self.dests) {
            let mut error_sum = Complex64::new(0., 0.);
            for d in dests {
                error_sum += source[d.neuron][d.slot];
            }
            neuron.update_weights(error_sum, rate);
            neuron.stage_all(error_sum);
        }
    }

    /// Last computed output of each neuron, in index order.
    pub fn outputs(&self) -> Vec<Complex64> {
        self.neurons.iter().map(|n| n.output).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_cx_approx;
    use crate::complex::Squash;
    use crate::config::{Destinations, Inputs, NeuronConfig, Neurons};

    fn layer_config(
        kind: LayerKind,
        bias: Complex64,
        neurons: Vec<(Vec<Complex64>, Vec<usize>)>,
    ) -> LayerConfig {
        LayerConfig {
            kind,
            bias,
            neurons: Neurons {
                count: neurons.len(),
                defs: neurons
                    .into_iter()
                    .map(|(weights, dests)| NeuronConfig {
                        inputs: Inputs {
                            count: weights.len(),
                            weights,
                        },
                        destinations: Destinations {
                            count: dests.len() / 2,
                            dests,
                        },
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_input_layer_routes_per_neuron() {
        let one = vec![Complex64::new(1., 0.)];
        let config = layer_config(
            LayerKind::Input,
            Complex64::new(0., 0.),
            vec![(one.clone(), vec![]), (one.clone(), vec![]), (one, vec![])],
        );
        let mut layer = Layer::new(&config).unwrap();

        let sensors = [
            Complex64::new(0.1, 0.2),
            Complex64::new(-0.3, 0.4),
            Complex64::from_polar(1., -0.5),
        ];
        assert_eq!(layer.forward(&sensors), sensors.to_vec());
        assert_eq!(layer.outputs(), sensors.to_vec());
    }

    #[test]
    fn test_hidden_layer_shares_input_vector() {
        let bias = Complex64::new(0.05, 0.);
        let config = layer_config(
            LayerKind::Hidden,
            bias,
            vec![
                (vec![Complex64::new(1., 0.), Complex64::new(0.5, 0.)], vec![]),
                (vec![Complex64::new(0., 1.), Complex64::new(2., 0.)], vec![]),
            ],
        );
        let mut layer = Layer::new(&config).unwrap();

        let inputs = [Complex64::new(0.3, 0.), Complex64::new(0.1, 0.1)];
        let out = layer.forward(&inputs);

        let net0 = bias + inputs[0] + Complex64::new(0.5, 0.) * inputs[1];
        let net1 = bias + Complex64::new(0., 1.) * inputs[0] + Complex64::new(2., 0.) * inputs[1];
        assert_cx_approx!(out[0], net0.squash());
        assert_cx_approx!(out[1], net1.squash());
    }

    #[test]
    fn test_inject_final_error_hits_last_neuron_slot_0() {
        let one = vec![Complex64::new(1., 0.)];
        let config = layer_config(
            LayerKind::Output,
            Complex64::new(0., 0.),
            vec![(one.clone(), vec![]), (one, vec![0, 0])],
        );
        let mut layer = Layer::new(&config).unwrap();

        let e = Complex64::new(0.07, -0.01);
        layer.inject_final_error(e);
        assert_eq!(layer.neurons[0].errors()[0], Complex64::new(0., 0.));
        assert_eq!(layer.neurons[1].errors()[0], e);
    }

    #[test]
    fn test_backward_sums_destination_mailboxes() {
        // one hidden neuron fanning out to next-layer neurons 0 and 1,
        // both at slot 0; its error must be the sum, not either alone
        let w = Complex64::new(0.8, 0.);
        let hidden_config = layer_config(
            LayerKind::Hidden,
            Complex64::new(0., 0.),
            vec![(vec![w], vec![0, 0, 1, 0])],
        );
        let next_config = layer_config(
            LayerKind::Output,
            Complex64::new(0., 0.),
            vec![
                (vec![Complex64::new(1., 0.)], vec![]),
                (vec![Complex64::new(1., 0.)], vec![]),
            ],
        );
        let mut hidden = Layer::new(&hidden_config).unwrap();
        let mut next = Layer::new(&next_config).unwrap();

        let e0 = Complex64::new(0.02, 0.01);
        let e1 = Complex64::new(-0.01, 0.03);
        next.neurons[0].receive_error(0, e0);
        next.neurons[1].receive_error(0, e1);

        hidden.backward(&next.staged(), 0.1);

        let sum = e0 + e1;
        assert_cx_approx!(hidden.neurons[0].weights[0], w - sum * 0.1);
        // aggregate restaged for the layer behind this one
        assert_cx_approx!(hidden.neurons[0].errors()[0], sum);
    }
}
