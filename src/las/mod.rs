//! Point formats, header and io of LAS files.

pub mod builder;
pub mod classification;
pub mod convert;
pub mod gps;
pub mod header;
pub mod nir;
pub mod point0;
pub mod point6;
pub mod pointtypes;
pub mod reader;
pub mod rgb;
pub mod stream;
pub mod utils;
pub mod vlr;
pub mod wavepacket;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_io;
