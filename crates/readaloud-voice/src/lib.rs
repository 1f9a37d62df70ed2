#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod command;
mod factory;
#[cfg(feature = "native")]
pub mod native;
pub mod voices;

pub use command::CommandSpeechEngine;
pub use factory::{build_speech_engine, list_voices};
#[cfg(feature = "native")]
pub use native::NativeSpeechEngine;
