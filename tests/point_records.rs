use las_codec::las::point0::Point0;
use las_codec::las::point6::Point6;
use las_codec::las::pointtypes::{Point10, Point5};
use las_codec::las::rgb::RGB;
use las_codec::las::nir::Nir;
use las_codec::las::wavepacket::LasWavepacket;
use las_codec::{PointFormat, PointRecord};

fn wavepacket() -> LasWavepacket {
    LasWavepacket {
        descriptor_index: 1,
        offset: 1 << 40,
        size: 512,
        return_point: 1.5,
        dx: 0.25,
        dy: -0.5,
        dz: 0.125,
    }
}

fn legacy_sample() -> PointRecord {
    let base = Point0 {
        x: -123_456,
        y: 654_321,
        z: 42,
        intensity: 1000,
        return_number: 3,
        number_of_returns_of_given_pulse: 5,
        scan_direction_flag: true,
        edge_of_flight_line: false,
        classification: 17,
        synthetic: true,
        key_point: false,
        withheld: true,
        scan_angle_rank: -12,
        user_data: 200,
        point_source_id: 4242,
    };
    PointRecord::from(Point5 {
        base,
        gps_time: 123_456.789,
        rgb: RGB::new(100, 200, 300),
        wavepacket: wavepacket(),
    })
}

fn extended_sample() -> PointRecord {
    let mut base = Point6 {
        x: 7,
        y: -8,
        z: 9_000_000,
        intensity: 65535,
        classification: 200,
        user_data: 3,
        scan_angle: -2000,
        point_source_id: 12,
        gps_time: 987.5,
        ..Default::default()
    };
    base.set_return_number(11);
    base.set_number_of_returns(13);
    base.set_overlap(true);
    base.set_scanner_channel(2);
    base.set_key_point(true);
    base.set_edge_of_flight_line(true);
    PointRecord::from(Point10 {
        base,
        rgb: RGB::new(1, 2, 3),
        nir: Nir(777),
        wavepacket: wavepacket(),
    })
}

fn sample(format: PointFormat) -> PointRecord {
    if format.is_extended() {
        extended_sample().convert_to(format)
    } else {
        legacy_sample().convert_to(format)
    }
}

#[test]
fn test_every_format_decodes_what_it_encodes() {
    for format in PointFormat::ALL.iter().copied() {
        let record = sample(format);
        assert_eq!(record.format(), format);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), format.size(), "format {}", format);
        assert_eq!(PointRecord::decode(format, &bytes), record, "format {}", format);
    }
}

#[test]
fn test_encode_writes_exactly_the_record_size() {
    for format in PointFormat::ALL.iter().copied() {
        let record = sample(format);
        let mut buffer = vec![0xEEu8; format.size() + 3];
        record.encode(&mut buffer);
        assert_eq!(&buffer[format.size()..], &[0xEE, 0xEE, 0xEE]);
    }
}

#[test]
fn test_format_ids_and_sizes() {
    let expected = [20, 28, 26, 34, 57, 63, 30, 36, 38, 59, 67];
    for (format, size) in PointFormat::ALL.iter().zip(expected.iter()) {
        let record = PointRecord::default_for(*format);
        assert_eq!(record.size(), *size);
        assert_eq!(usize::from(record.format_id()), format.id() as usize);
    }
}

#[test]
fn test_legacy_packed_bytes() {
    let bytes = sample(PointFormat::Point0).to_bytes();
    // return 3, 5 returns, scan direction
    assert_eq!(bytes[14], 0b0110_1011);
    // class 17, synthetic, withheld
    assert_eq!(bytes[15], 0b1011_0001);
    assert_eq!(bytes[16] as i8, -12);
    assert_eq!(bytes[17], 200);
    assert_eq!(&bytes[18..20], &4242u16.to_le_bytes());
}

#[test]
fn test_extended_packed_bytes() {
    let bytes = sample(PointFormat::Point6).to_bytes();
    // return 11, 13 returns
    assert_eq!(bytes[14], 0b1101_1011);
    // key point, overlap, channel 2, edge
    assert_eq!(bytes[15], 0b1010_1010);
    assert_eq!(bytes[16], 200);
    assert_eq!(&bytes[18..20], &(-2000i16).to_le_bytes());
    assert_eq!(&bytes[22..30], &987.5f64.to_le_bytes());
}

#[test]
fn test_field_groups_are_little_endian() {
    let bytes = sample(PointFormat::Point10).to_bytes();
    assert_eq!(&bytes[30..36], &[1, 0, 2, 0, 3, 0]);
    assert_eq!(&bytes[36..38], &777u16.to_le_bytes());
    assert_eq!(bytes[38], 1);
    assert_eq!(&bytes[39..47], &(1u64 << 40).to_le_bytes());
    assert_eq!(&bytes[47..51], &512u32.to_le_bytes());
    assert_eq!(&bytes[63..67], &0.125f32.to_le_bytes());
}

#[test]
#[should_panic]
fn test_decoding_a_short_slice_panics() {
    PointRecord::decode(PointFormat::Point3, &[0u8; 20]);
}

fn legacy_bounds() -> Vec<PointRecord> {
    let wavepacket_max = LasWavepacket {
        descriptor_index: u8::MAX,
        offset: u64::MAX,
        size: u32::MAX,
        return_point: f32::MAX,
        dx: f32::MIN,
        dy: f32::MIN_POSITIVE,
        dz: -0.0,
    };
    let all_set = Point0 {
        x: i32::MAX,
        y: i32::MIN,
        z: i32::MAX,
        intensity: u16::MAX,
        return_number: 7,
        number_of_returns_of_given_pulse: 7,
        scan_direction_flag: true,
        edge_of_flight_line: true,
        classification: 31,
        synthetic: true,
        key_point: true,
        withheld: true,
        scan_angle_rank: i8::MAX,
        user_data: u8::MAX,
        point_source_id: u16::MAX,
    };
    let lowest = Point0 {
        x: i32::MIN,
        y: i32::MAX,
        z: i32::MIN,
        scan_angle_rank: i8::MIN,
        ..Default::default()
    };
    vec![
        PointRecord::from(Point5 {
            base: all_set,
            gps_time: f64::MAX,
            rgb: RGB::new(u16::MAX, u16::MAX, u16::MAX),
            wavepacket: wavepacket_max,
        }),
        PointRecord::from(Point5 {
            base: lowest,
            gps_time: f64::MIN,
            rgb: RGB::new(0, 0, 0),
            wavepacket: LasWavepacket::default(),
        }),
    ]
}

fn extended_bounds() -> Vec<PointRecord> {
    let mut all_set = Point6 {
        x: i32::MIN,
        y: i32::MAX,
        z: i32::MIN,
        intensity: u16::MAX,
        classification: u8::MAX,
        user_data: u8::MAX,
        scan_angle: i16::MAX,
        point_source_id: u16::MAX,
        gps_time: f64::MIN_POSITIVE,
        ..Default::default()
    };
    all_set.set_return_number(15);
    all_set.set_number_of_returns(15);
    all_set.set_synthetic(true);
    all_set.set_key_point(true);
    all_set.set_withheld(true);
    all_set.set_overlap(true);
    all_set.set_scanner_channel(3);
    all_set.set_scan_direction_flag(true);
    all_set.set_edge_of_flight_line(true);
    let lowest = Point6 {
        x: i32::MAX,
        y: i32::MIN,
        z: i32::MAX,
        scan_angle: i16::MIN,
        gps_time: f64::MAX,
        ..Default::default()
    };
    vec![
        PointRecord::from(Point10 {
            base: all_set,
            rgb: RGB::new(u16::MAX, 0, u16::MAX),
            nir: Nir(u16::MAX),
            wavepacket: LasWavepacket {
                descriptor_index: u8::MAX,
                offset: u64::MAX,
                size: u32::MAX,
                return_point: f32::MIN,
                dx: f32::MAX,
                dy: f32::EPSILON,
                dz: f32::MIN_POSITIVE,
            },
        }),
        PointRecord::from(Point10 {
            base: lowest,
            rgb: RGB::default(),
            nir: Nir(0),
            wavepacket: LasWavepacket::default(),
        }),
    ]
}

#[test]
fn test_boundary_values_survive_every_format() {
    for format in PointFormat::ALL.iter().copied() {
        let samples = if format.is_extended() {
            extended_bounds()
        } else {
            legacy_bounds()
        };
        for sample in samples {
            let record = sample.convert_to(format);
            let bytes = record.to_bytes();
            let decoded = PointRecord::decode(format, &bytes);
            assert_eq!(decoded, record, "format {}", format);
            assert_eq!(decoded.to_bytes(), bytes, "format {}", format);
            assert_eq!(decoded.xyz(), sample.xyz(), "format {}", format);
        }
    }
}

#[test]
fn test_all_ones_flag_bytes() {
    let legacy = legacy_bounds()[0].convert_to(PointFormat::Point0).to_bytes();
    assert_eq!(&legacy[14..16], &[0xFF, 0xFF]);
    assert_eq!(legacy[16] as i8, i8::MAX);

    let extended = extended_bounds()[0].convert_to(PointFormat::Point6).to_bytes();
    assert_eq!(&extended[14..17], &[0xFF, 0xFF, 0xFF]);
    assert_eq!(&extended[18..20], &i16::MAX.to_le_bytes());
}
