//! Reader and writer for the LAS point cloud format, versions 1.0 to 1.5.
//!
//! A LAS file is a header, variable length records, an array of points
//! of one of the 11 point formats and, since 1.4, extended variable
//! length records.
//!
//! - [`HeaderBuilder`] accumulates the header of a file being written,
//!   [`HeaderBlock`] is the header of a file.
//! - [`LasWriter`] and [`LasReader`] write and read files.
//! - [`PointRecord`] holds a point of any format, [`convert`] converts
//!   points between formats.
//!
//! # Examples
//!
//! ```
//! use las_codec::{HeaderBuilder, LasReader, LasWriter, PointFormat, PointRecord, Version};
//! use las_codec::las::point6::Point6;
//! use las_codec::las::header::Vector3;
//! use std::io::Cursor;
//!
//! # fn main() -> las_codec::Result<()> {
//! let mut points = Vec::new();
//! for i in 0..10 {
//!     let mut point = Point6::default();
//!     point.x = i;
//!     point.set_return_number(1);
//!     points.push(PointRecord::from(point));
//! }
//!
//! let mut builder = HeaderBuilder::new(Version::V1_4, PointFormat::Point6);
//! builder.set_scale(Vector3::new(0.01, 0.01, 0.01));
//! for point in &points {
//!     builder.add(point);
//! }
//! let header = builder.build()?;
//!
//! let mut writer = LasWriter::new(Cursor::new(Vec::new()))?;
//! writer.write_header_and_records(&header, &[])?;
//! for point in &points {
//!     writer.write_point(point, &[])?;
//! }
//! let mut output = writer.into_inner().into_inner();
//! output.set_position(0);
//!
//! let mut reader = LasReader::new(output)?;
//! assert_eq!(reader.header().number_of_points(), 10);
//! let read = reader.points().collect::<las_codec::Result<Vec<_>>>()?;
//! assert_eq!(read, points);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - 'parallel': exposes [`par_convert_buffer`](las::convert::par_convert_buffer).
//! - 'async': exposes [`AsyncLasReader`](las::async_io::AsyncLasReader) and
//!   [`AsyncLasWriter`](las::async_io::AsyncLasWriter) over tokio's io traits.
//!
//! [`convert`]: las::convert::convert

pub mod errors;
pub mod formats;
pub mod las;
pub mod packers;
pub mod record;

pub use errors::LasError;
pub use formats::{PointFormat, Version};
pub use las::builder::HeaderBuilder;
pub use las::convert::convert_buffer;
#[cfg(feature = "parallel")]
pub use las::convert::par_convert_buffer;
pub use las::header::HeaderBlock;
pub use las::reader::LasReader;
pub use las::vlr::{Evlr, Vlr};
pub use las::writer::{EvlrState, LasWriter};
pub use record::PointRecord;

pub type Result<T> = std::result::Result<T, LasError>;
