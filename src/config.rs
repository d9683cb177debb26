//! Strongly-typed network configuration, deserialized from JSON once at
//! startup and validated before any [crate::Layer] or [crate::Neuron] is
//! built. Key names keep the spelling of the reference config files
//! (`"learning rate"`, `"error limit mag"`, ...); complex values are
//! `{"re": .., "im": ..}` objects.

use crate::serialize::{deserialize_cx, deserialize_cx_vec, serialize_cx, serialize_cx_vec};
use core::error::Error;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Role of a layer within the net. Index 0 must be the input layer and the
/// last index the output layer; anything between is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Input,
    Hidden,
    Output,
}

/// A (neuron, input slot) coordinate into a mailbox source layer, resolved
/// through the owning network during the backward pass. Kept as indices
/// rather than references so layers never point at each other directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dest {
    pub neuron: usize,
    pub slot: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetConfig {
    /// Verbose per-step tracing. A field here rather than the reference's
    /// process-wide flag.
    #[serde(default)]
    pub test: bool,
    /// Number of trained output signals. Only 1 is supported.
    #[serde(rename = "test set count")]
    pub test_set_count: usize,
    #[serde(rename = "learning rate")]
    pub learning_rate: f64,
    /// Cap on training steps per adapt call.
    #[serde(rename = "cycle limit")]
    pub cycle_limit: usize,
    /// Converged once |error| drops below this.
    #[serde(rename = "error limit mag")]
    pub errlim_mag: f64,
    /// Parsed and carried, but the convergence check never consults it.
    /// Known discrepancy inherited from the reference design.
    #[serde(rename = "error limit ang")]
    pub errlim_ang: f64,
    pub structure: Structure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Structure {
    pub layers: Layers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layers {
    pub count: usize,
    pub defs: Vec<LayerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// One bias per layer, shared by every neuron in it.
    #[serde(
        serialize_with = "serialize_cx",
        deserialize_with = "deserialize_cx"
    )]
    pub bias: Complex64,
    pub neurons: Neurons,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neurons {
    pub count: usize,
    pub defs: Vec<NeuronConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronConfig {
    pub inputs: Inputs,
    pub destinations: Destinations,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inputs {
    pub count: usize,
    /// One initial weight per input.
    #[serde(
        serialize_with = "serialize_cx_vec",
        deserialize_with = "deserialize_cx_vec"
    )]
    pub weights: Vec<Complex64>,
}

/// Where this neuron's backward error comes from: a flat list of
/// (neuron, input slot) index pairs into the mailbox source layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destinations {
    /// Number of pairs; `dests` holds `2 * count` entries.
    pub count: usize,
    pub dests: Vec<usize>,
}

impl Destinations {
    pub fn pairs(&self) -> impl Iterator<Item = Dest> + '_ {
        self.dests.chunks(2).map(|p| Dest {
            neuron: p[0],
            slot: p[1],
        })
    }
}

impl NetConfig {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        Self::from_str(&fs::read_to_string(path)?)
    }

    /// Reject malformed structure before any neuron is constructed.
    /// Everything caught here is fatal; there is no partial recovery.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.test_set_count != 1 {
            return Err(format!(
                "only one test set is supported, config asks for {}",
                self.test_set_count
            )
            .into());
        }
        if self.cycle_limit == 0 {
            return Err("cycle limit must be at least 1".into());
        }

        let layers = &self.structure.layers;
        if layers.count < 2 {
            return Err("number of layers is less than 2".into());
        }
        if layers.count != layers.defs.len() {
            return Err(format!(
                "layer count {} does not match {} layer definitions",
                layers.count,
                layers.defs.len()
            )
            .into());
        }

        let last = layers.defs.len() - 1;
        for (l_idx, layer) in layers.defs.iter().enumerate() {
            if layer.neurons.count != layer.neurons.defs.len() {
                return Err(format!(
                    "layer {l_idx}: neuron count {} does not match {} definitions",
                    layer.neurons.count,
                    layer.neurons.defs.len()
                )
                .into());
            }
            if layer.neurons.count == 0 {
                return Err(format!("layer {l_idx} has no neurons").into());
            }
            // the final error is staged in the output layer's last
            // neuron, slot 0; that slot has to exist
            if l_idx == last
                && layer
                    .neurons
                    .defs
                    .last()
                    .is_some_and(|n| n.inputs.count == 0)
            {
                return Err(format!(
                    "layer {l_idx}: the output layer's last neuron needs at least one input slot"
                )
                .into());
            }

            // The output layer's destinations resolve against its own
            // mailboxes (virtual error layer); every other layer's against
            // the next layer.
            let source = if l_idx == last {
                layer
            } else {
                &layers.defs[l_idx + 1]
            };

            for (n_idx, neuron) in layer.neurons.defs.iter().enumerate() {
                if neuron.inputs.count != neuron.inputs.weights.len() {
                    return Err(format!(
                        "layer {l_idx} neuron {n_idx}: {} inputs but {} weights",
                        neuron.inputs.count,
                        neuron.inputs.weights.len()
                    )
                    .into());
                }
                if layer.kind == LayerKind::Input && neuron.inputs.count != 1 {
                    return Err(format!(
                        "layer {l_idx} neuron {n_idx}: input-layer neurons take exactly 1 input"
                    )
                    .into());
                }
                if neuron.destinations.count * 2 != neuron.destinations.dests.len() {
                    return Err(format!(
                        "layer {l_idx} neuron {n_idx}: {} destination pairs but {} indices",
                        neuron.destinations.count,
                        neuron.destinations.dests.len()
                    )
                    .into());
                }
                // Input layers are never walked backward, so their
                // destinations go unchecked beyond shape.
                if layer.kind == LayerKind::Input {
                    continue;
                }
                for d in neuron.destinations.pairs() {
                    let slots = source
                        .neurons
                        .defs
                        .get(d.neuron)
                        .map(|n| n.inputs.count)
                        .ok_or_else(|| {
                            format!(
                                "layer {l_idx} neuron {n_idx}: destination neuron {} out of range",
                                d.neuron
                            )
                        })?;
                    if d.slot >= slots {
                        return Err(format!(
                            "layer {l_idx} neuron {n_idx}: destination slot {} out of range \
                             for neuron {} with {} inputs",
                            d.slot, d.neuron, slots
                        )
                        .into());
                    }
                }
            }
        }
        Ok(())
    }
}
