//! Offline decoder for oscilloscope captures of 10BASE-T Ethernet signals.
//!
//! A capture is loaded into a [`capture::Waveform`], the first preamble
//! excursion is located, Manchester bits are recovered with a configurable
//! resynchronization strategy, and the bits after the preamble/SFD are
//! regrouped into bytes.

pub mod capture;
pub mod config;
pub mod error;
pub mod phy;
pub mod pipeline;
pub mod ui;
pub mod utils;

pub use config::{DecoderConfig, ResyncConfig};
pub use error::{DecodeError, Result};
pub use pipeline::{DecodeReport, run};
