//! Accumulates the header of a file while its points are written.

use crate::formats::{PointFormat, Version};
use crate::las::header::{
    header_size_for, HeaderBlock, Vector3, EXTENDED_NUM_RETURNS, LEGACY_NUM_RETURNS,
};
use crate::record::PointRecord;
use crate::LasError;

const DEFAULT_SCALE: f64 = 0.001;

fn copy_str(dst: &mut [u8], s: &str) {
    for b in dst.iter_mut() {
        *b = 0;
    }
    let len = s.len().min(dst.len());
    dst[..len].copy_from_slice(&s.as_bytes()[..len]);
}

fn min_sentinel() -> Vector3 {
    Vector3::new(std::f64::INFINITY, std::f64::INFINITY, std::f64::INFINITY)
}

fn max_sentinel() -> Vector3 {
    Vector3::new(
        std::f64::NEG_INFINITY,
        std::f64::NEG_INFINITY,
        std::f64::NEG_INFINITY,
    )
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn finite_vector_or_zero(v: Vector3) -> Vector3 {
    Vector3::new(finite_or_zero(v.x), finite_or_zero(v.y), finite_or_zero(v.z))
}

/// Builds a [`HeaderBlock`].
///
/// The extents, point counts and GPS time range are accumulated with
/// [`add`](Self::add) or [`add_xyz`](Self::add_xyz), or set directly.
///
/// ```
/// use las_codec::formats::{PointFormat, Version};
/// use las_codec::las::builder::HeaderBuilder;
/// use las_codec::las::header::Vector3;
///
/// let mut builder = HeaderBuilder::new(Version::V1_2, PointFormat::Point0);
/// builder.set_scale(Vector3::new(0.01, 0.01, 0.01));
/// builder.add_xyz(Vector3::new(1.0, 2.0, 3.0), 1);
/// let header = builder.build().unwrap();
/// assert_eq!(header.number_of_points(), 1);
/// assert_eq!(header.max(), Vector3::new(1.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone)]
pub struct HeaderBuilder {
    pub file_source_id: u16,
    pub global_encoding: u16,
    pub guid: [u8; 16],
    pub system_identifier: [u8; 32],
    pub generating_software: [u8; 32],
    pub file_creation_day: u16,
    pub file_creation_year: u16,
    /// Written for 1.3+
    pub waveform_data_start: u64,
    /// Written for 1.5+
    pub time_offset: u16,

    version: Version,
    point_format: PointFormat,
    extra_bytes: u16,
    scale: Vector3,
    offset: Vector3,

    min: Vector3,
    max: Vector3,
    number_of_points: u64,
    legacy_number_of_points_by_return: [u32; LEGACY_NUM_RETURNS],
    number_of_points_by_return: [u64; EXTENDED_NUM_RETURNS],
    min_gps_time: f64,
    max_gps_time: f64,
}

impl HeaderBuilder {
    pub fn new(version: Version, point_format: PointFormat) -> Self {
        let mut generating_software = [0u8; 32];
        copy_str(
            &mut generating_software,
            concat!("las-codec ", env!("CARGO_PKG_VERSION")),
        );
        Self {
            file_source_id: 0,
            global_encoding: 0,
            guid: [0u8; 16],
            system_identifier: [0u8; 32],
            generating_software,
            file_creation_day: 0,
            file_creation_year: 0,
            waveform_data_start: 0,
            time_offset: 0,
            version,
            point_format,
            extra_bytes: 0,
            scale: Vector3::new(DEFAULT_SCALE, DEFAULT_SCALE, DEFAULT_SCALE),
            offset: Vector3::default(),
            min: min_sentinel(),
            max: max_sentinel(),
            number_of_points: 0,
            legacy_number_of_points_by_return: [0u32; LEGACY_NUM_RETURNS],
            number_of_points_by_return: [0u64; EXTENDED_NUM_RETURNS],
            min_gps_time: std::f64::INFINITY,
            max_gps_time: std::f64::NEG_INFINITY,
        }
    }

    /// Starts from an existing header, its counts and extents included.
    pub fn from_header(header: &HeaderBlock) -> Self {
        let mut builder = Self::new(header.version, header.point_format);
        builder.file_source_id = header.file_source_id;
        builder.global_encoding = header.global_encoding;
        builder.guid = header.guid;
        builder.system_identifier = header.system_identifier;
        builder.generating_software = header.generating_software;
        builder.file_creation_day = header.file_creation_day;
        builder.file_creation_year = header.file_creation_year;
        builder.waveform_data_start = header.waveform_data_start;
        builder.time_offset = header.time_offset;
        builder.extra_bytes = header.extra_bytes();
        builder.scale = header.scale;
        builder.offset = header.offset;

        let number_of_points = header.number_of_points();
        if number_of_points > 0 {
            builder.number_of_points = number_of_points;
            builder.min = header.min;
            builder.max = header.max;
            builder.legacy_number_of_points_by_return = header.legacy_number_of_points_by_return;
            builder.number_of_points_by_return = header.number_of_points_by_return;
            if header.version.has_gps_time_range() {
                builder.min_gps_time = header.min_gps_time;
                builder.max_gps_time = header.max_gps_time;
            }
        }
        builder
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn point_format(&self) -> PointFormat {
        self.point_format
    }

    pub fn scale(&self) -> Vector3 {
        self.scale
    }

    pub fn offset(&self) -> Vector3 {
        self.offset
    }

    pub fn extra_bytes(&self) -> u16 {
        self.extra_bytes
    }

    pub fn number_of_points(&self) -> u64 {
        self.number_of_points
    }

    pub fn set_scale(&mut self, scale: Vector3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_offset(&mut self, offset: Vector3) -> &mut Self {
        self.offset = offset;
        self
    }

    /// Number of bytes stored after each point record
    pub fn set_extra_bytes(&mut self, extra_bytes: u16) -> &mut Self {
        self.extra_bytes = extra_bytes;
        self
    }

    pub fn set_system_identifier(&mut self, system_identifier: &str) -> &mut Self {
        copy_str(&mut self.system_identifier, system_identifier);
        self
    }

    pub fn set_generating_software(&mut self, generating_software: &str) -> &mut Self {
        copy_str(&mut self.generating_software, generating_software);
        self
    }

    pub fn set_bounds(&mut self, min: Vector3, max: Vector3) -> &mut Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn set_gps_time_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.min_gps_time = min;
        self.max_gps_time = max;
        self
    }

    pub fn set_number_of_points(&mut self, number_of_points: u64) -> &mut Self {
        self.number_of_points = number_of_points;
        self
    }

    /// Sets the 32-bit by-return counts, `counts` must have 5 elements.
    ///
    /// For legacy formats they are also the first 5 of the 64-bit counts.
    pub fn set_legacy_number_of_points_by_return(&mut self, counts: &[u32]) -> crate::Result<()> {
        if counts.len() != LEGACY_NUM_RETURNS {
            return Err(LasError::InvalidByReturnLength {
                expected: LEGACY_NUM_RETURNS,
                actual: counts.len(),
            });
        }
        self.legacy_number_of_points_by_return
            .copy_from_slice(counts);
        if !self.point_format.is_extended() {
            for (dst, src) in self.number_of_points_by_return.iter_mut().zip(counts) {
                *dst = u64::from(*src);
            }
        }
        Ok(())
    }

    /// Sets the 64-bit by-return counts, `counts` must have 15 elements
    pub fn set_number_of_points_by_return(&mut self, counts: &[u64]) -> crate::Result<()> {
        if counts.len() != EXTENDED_NUM_RETURNS {
            return Err(LasError::InvalidByReturnLength {
                expected: EXTENDED_NUM_RETURNS,
                actual: counts.len(),
            });
        }
        self.number_of_points_by_return.copy_from_slice(counts);
        Ok(())
    }

    fn quantize(value: f64, scale: f64) -> f64 {
        (value / scale).floor() * scale
    }

    /// Adds a point given by its real world coordinates.
    ///
    /// Coordinates are quantized to the scale by truncation.
    pub fn add_xyz(&mut self, position: Vector3, return_number: u8) {
        let quantized = Vector3::new(
            Self::quantize(position.x, self.scale.x),
            Self::quantize(position.y, self.scale.y),
            Self::quantize(position.z, self.scale.z),
        );
        self.fold(quantized, return_number, None);
    }

    /// Adds a point record.
    ///
    /// Its coordinates already are multiples of the scale, they are
    /// only transformed with the scale and offset.
    pub fn add(&mut self, point: &PointRecord) {
        let (x, y, z) = point.xyz();
        let position = Vector3::new(
            f64::from(x) * self.scale.x + self.offset.x,
            f64::from(y) * self.scale.y + self.offset.y,
            f64::from(z) * self.scale.z + self.offset.z,
        );
        self.fold(position, point.return_number(), point.gps_time());
    }

    fn fold(&mut self, position: Vector3, return_number: u8, gps_time: Option<f64>) {
        self.min.x = self.min.x.min(position.x);
        self.min.y = self.min.y.min(position.y);
        self.min.z = self.min.z.min(position.z);
        self.max.x = self.max.x.max(position.x);
        self.max.y = self.max.y.max(position.y);
        self.max.z = self.max.z.max(position.z);

        self.number_of_points += 1;
        if return_number > 0 {
            let index = usize::from(return_number - 1);
            if let Some(count) = self.number_of_points_by_return.get_mut(index) {
                *count += 1;
            }
            if !self.point_format.is_extended() {
                if let Some(count) = self.legacy_number_of_points_by_return.get_mut(index) {
                    *count += 1;
                }
            }
        }

        if let Some(time) = gps_time {
            self.min_gps_time = self.min_gps_time.min(time);
            self.max_gps_time = self.max_gps_time.max(time);
        }
    }

    /// Restores the accumulated extents, counts and GPS time range
    /// to their initial state.
    pub fn reset(&mut self) {
        self.min = min_sentinel();
        self.max = max_sentinel();
        self.number_of_points = 0;
        self.legacy_number_of_points_by_return = [0u32; LEGACY_NUM_RETURNS];
        self.number_of_points_by_return = [0u64; EXTENDED_NUM_RETURNS];
        self.min_gps_time = std::f64::INFINITY;
        self.max_gps_time = std::f64::NEG_INFINITY;
    }

    /// Creates the header.
    ///
    /// Fails if the point format cannot be used with the version.
    pub fn build(&self) -> crate::Result<HeaderBlock> {
        let point_format = PointFormat::for_version(self.point_format.id(), self.version)?;
        let max_extra_bytes = usize::from(std::u16::MAX) - point_format.size();
        if usize::from(self.extra_bytes) > max_extra_bytes {
            return Err(LasError::ExtraBytesMismatch {
                expected: max_extra_bytes,
                actual: usize::from(self.extra_bytes),
            });
        }
        let point_record_length = point_format.size() as u16 + self.extra_bytes;
        let header_size = header_size_for(self.version);

        let (legacy_number_of_points, legacy_number_of_points_by_return) =
            if point_format.is_extended() {
                (0, [0u32; LEGACY_NUM_RETURNS])
            } else {
                let legacy_count = if self.number_of_points > u64::from(std::u32::MAX) {
                    0
                } else {
                    self.number_of_points as u32
                };
                (legacy_count, self.legacy_number_of_points_by_return)
            };
        // the 64-bit fields only exist from 1.4
        let (number_of_points, number_of_points_by_return) = if self.version.has_extended_counts() {
            (self.number_of_points, self.number_of_points_by_return)
        } else {
            (0, [0u64; EXTENDED_NUM_RETURNS])
        };

        let (min_gps_time, max_gps_time) = if !self.version.has_gps_time_range() {
            (0.0, 0.0)
        } else if self.min_gps_time.is_finite() {
            (self.min_gps_time, finite_or_zero(self.max_gps_time))
        } else {
            (0.0, 0.0)
        };

        Ok(HeaderBlock {
            file_source_id: self.file_source_id,
            global_encoding: self.global_encoding,
            guid: self.guid,
            version: self.version,
            system_identifier: self.system_identifier,
            generating_software: self.generating_software,
            file_creation_day: self.file_creation_day,
            file_creation_year: self.file_creation_year,
            header_size,
            offset_to_point_data: u32::from(header_size),
            number_of_vlrs: 0,
            point_format,
            point_record_length,
            legacy_number_of_points,
            legacy_number_of_points_by_return,
            scale: self.scale,
            offset: self.offset,
            max: finite_vector_or_zero(self.max),
            min: finite_vector_or_zero(self.min),
            waveform_data_start: if self.version.has_waveform_data_start() {
                self.waveform_data_start
            } else {
                0
            },
            evlr_start: 0,
            evlr_count: 0,
            number_of_points,
            number_of_points_by_return,
            max_gps_time,
            min_gps_time,
            time_offset: if self.version.has_gps_time_range() {
                self.time_offset
            } else {
                0
            },
        })
    }
}
