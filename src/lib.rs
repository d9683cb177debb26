#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

mod macros;
mod serialize;

pub mod complex;
pub mod config;
pub mod layer;
pub mod network;
pub mod neuron;

pub use complex::Squash;
pub use config::{Dest, LayerKind, NetConfig};
pub use layer::Layer;
pub use network::{Command, Network, Outcome};
pub use neuron::Neuron;
