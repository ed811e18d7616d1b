// Physical layer: 10BASE-T Manchester bit recovery from sampled voltages

pub mod decoder;
pub mod frame;
pub mod line_coding;
pub mod preamble;
pub mod resync;

pub use decoder::{BitDecoder, DecodeResult};
pub use frame::{Frame, Octet, assemble};
pub use line_coding::{ManchesterEncoder, SynthOptions, synthesize};
pub use preamble::{ETHERNET_PREAMBLE, LocatedStart, locate};
pub use resync::{ResyncStrategy, Termination};
