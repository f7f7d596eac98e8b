use std::io::{Cursor, Seek, SeekFrom, Write};

use las_codec::las::point0::Point0;
use las_codec::las::pointtypes::{Point1, Point7};
use las_codec::las::rgb::RGB;
use las_codec::{
    Evlr, EvlrState, HeaderBuilder, LasError, LasReader, LasWriter, PointFormat, PointRecord,
    Version, Vlr,
};

fn points(format: PointFormat, count: i32) -> Vec<PointRecord> {
    (0..count)
        .map(|i| {
            let mut record = PointRecord::default_for(format);
            match &mut record {
                PointRecord::Point0(p) => {
                    p.x = i;
                    p.return_number = 1;
                }
                PointRecord::Point1(p) => {
                    p.base.x = i;
                    p.gps_time = f64::from(i);
                }
                PointRecord::Point6(p) => {
                    p.x = i;
                    p.gps_time = f64::from(i) * 0.5;
                }
                PointRecord::Point7(p) => {
                    p.base.y = -i;
                    p.rgb = RGB::new(i as u16, 0, 0);
                }
                _ => {}
            }
            record
        })
        .collect()
}

fn write_file(
    version: Version,
    format: PointFormat,
    points: &[PointRecord],
    vlrs: &[Vlr],
    extra_bytes: u16,
) -> Vec<u8> {
    let mut builder = HeaderBuilder::new(version, format);
    builder.set_extra_bytes(extra_bytes);
    for point in points {
        builder.add(point);
    }
    let header = builder.build().unwrap();

    let mut writer = LasWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_header_and_records(&header, vlrs).unwrap();
    let extra = vec![0xABu8; usize::from(extra_bytes)];
    for point in points {
        writer.write_point(point, &extra).unwrap();
    }
    assert_eq!(writer.points_written(), points.len() as u64);
    writer.into_inner().into_inner().into_inner()
}

#[test]
fn test_write_then_read_every_format() {
    for format in PointFormat::ALL.iter().copied() {
        let version = format.min_version().max(Version::V1_2);
        let expected = points(format, 10);
        let vlrs = vec![Vlr::new("test", 1, "first", vec![1, 2, 3])];
        let bytes = write_file(version, format, &expected, &vlrs, 2);

        let mut reader = LasReader::new(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(reader.header().point_format(), format);
        assert_eq!(reader.header().number_of_points(), 10);
        assert_eq!(reader.vlrs(), &vlrs[..]);
        let read = reader.points().collect::<las_codec::Result<Vec<_>>>().unwrap();
        assert_eq!(read, expected);
        assert_eq!(reader.extra_bytes(), &[0xAB, 0xAB]);

        let mut reader = LasReader::sequential(bytes.as_slice()).unwrap();
        let read = reader.points().collect::<las_codec::Result<Vec<_>>>().unwrap();
        assert_eq!(read, expected);
    }
}

#[test]
fn test_read_at() {
    let expected = points(PointFormat::Point1, 6);
    let bytes = write_file(Version::V1_2, PointFormat::Point1, &expected, &[], 0);
    let mut reader = LasReader::new(Cursor::new(bytes.clone())).unwrap();

    assert_eq!(reader.read_at(4).unwrap(), expected[4]);
    assert_eq!(reader.position(), 5);
    assert_eq!(reader.read_next().unwrap().unwrap(), expected[5]);
    assert!(reader.read_next().is_none());
    assert_eq!(reader.read_at(0).unwrap(), expected[0]);

    assert!(matches!(
        reader.read_at(6),
        Err(LasError::IndexNotFound { index: 6, count: 6 })
    ));

    let mut sequential = LasReader::sequential(bytes.as_slice()).unwrap();
    assert!(matches!(sequential.read_at(0), Err(LasError::NoSeek)));
}

fn truncated_file() -> Vec<u8> {
    let mut builder = HeaderBuilder::new(Version::V1_2, PointFormat::Point0);
    builder.set_number_of_points(5);
    let header = builder.build().unwrap();
    let mut writer = LasWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_header_and_records(&header, &[]).unwrap();
    for point in points(PointFormat::Point0, 3) {
        writer.write_point(&point, &[]).unwrap();
    }
    writer.into_inner().into_inner().into_inner()
}

#[test]
fn test_reading_stops_at_the_end_of_data() {
    let bytes = truncated_file();
    assert_eq!(bytes.len(), 227 + 3 * 20);

    let mut reader = LasReader::new(Cursor::new(bytes.clone())).unwrap();
    assert_eq!(reader.header().number_of_points(), 5);
    for _ in 0..3 {
        assert!(reader.read_next().unwrap().is_ok());
    }
    assert!(reader.read_next().is_none());
    assert!(reader.read_next().is_none());

    let mut reader = LasReader::sequential(bytes.as_slice()).unwrap();
    assert_eq!(reader.points().count(), 3);
}

#[test]
fn test_read_at_missing_data() {
    let mut reader = LasReader::new(Cursor::new(truncated_file())).unwrap();
    assert!(reader.read_at(2).is_ok());
    assert!(matches!(
        reader.read_at(3),
        Err(LasError::PointDataTruncated { index: 3 })
    ));
    assert!(matches!(
        reader.read_at(5),
        Err(LasError::IndexNotFound { index: 5, count: 5 })
    ));
}

#[test]
fn test_extended_records_are_back_patched() {
    let expected = points(PointFormat::Point6, 2);
    let mut builder = HeaderBuilder::new(Version::V1_4, PointFormat::Point6);
    for point in &expected {
        builder.add(point);
    }
    let header = builder.build().unwrap();

    let mut writer = LasWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_header_and_records(&header, &[]).unwrap();
    for point in &expected {
        writer.write_point(point, &[]).unwrap();
    }
    let first = Evlr::new("first", 1, "", vec![1u8; 100]);
    let second = Evlr::new("second", 2, "", vec![2u8; 7]);
    writer.write_extended_record(&first).unwrap();
    assert_eq!(
        writer.evlr_state(),
        EvlrState::ExtendedRecordsWritten {
            count: 1,
            start: 435
        }
    );
    writer.write_extended_record(&second).unwrap();
    assert_eq!(
        writer.evlr_state(),
        EvlrState::ExtendedRecordsWritten {
            count: 2,
            start: 435
        }
    );
    assert_eq!(writer.header().unwrap().evlr_count(), Some(2));

    let bytes = writer.into_inner().into_inner().into_inner();
    let first_offset = 375u64 + 2 * 30;
    assert_eq!(bytes.len() as u64, first_offset + first.size() + second.size());
    assert_eq!(&bytes[235..243], &first_offset.to_le_bytes());
    assert_eq!(&bytes[243..247], &2u32.to_le_bytes());
    assert_eq!(
        &bytes[first_offset as usize..first_offset as usize + 2],
        &[0, 0]
    );

    let mut reader = LasReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.header().evlr_start(), Some(first_offset));
    assert_eq!(reader.evlrs(), &[first, second][..]);
    let read = reader.points().collect::<las_codec::Result<Vec<_>>>().unwrap();
    assert_eq!(read, expected);
}

#[test]
fn test_writing_continues_after_the_patch() {
    let header = HeaderBuilder::new(Version::V1_4, PointFormat::Point0)
        .build()
        .unwrap();
    let mut writer = LasWriter::new(Cursor::new(Vec::new())).unwrap();
    writer.write_header_and_records(&header, &[]).unwrap();
    writer
        .write_extended_record(&Evlr::new("a", 1, "", vec![]))
        .unwrap();
    let mut cursor = writer.into_inner().into_inner();
    assert_eq!(cursor.position(), 375 + 60);
    cursor.write_all(&[0xFF]).unwrap();
    assert_eq!(cursor.into_inner().len(), 375 + 60 + 1);
}

#[test]
fn test_header_not_at_the_start_of_the_stream() {
    let mut cursor = Cursor::new(Vec::new());
    cursor.write_all(&[0u8; 10]).unwrap();

    let expected = points(PointFormat::Point7, 3);
    let mut builder = HeaderBuilder::new(Version::V1_4, PointFormat::Point7);
    for point in &expected {
        builder.add(point);
    }
    let header = builder.build().unwrap();
    let mut writer = LasWriter::new(cursor).unwrap();
    writer.write_header_and_records(&header, &[]).unwrap();
    for point in &expected {
        writer.write_point(point, &[]).unwrap();
    }
    writer
        .write_extended_record(&Evlr::new("a", 1, "", vec![5]))
        .unwrap();

    let mut cursor = writer.into_inner().into_inner();
    cursor.seek(SeekFrom::Start(10)).unwrap();
    let mut reader = LasReader::new(cursor).unwrap();
    assert_eq!(reader.evlrs().len(), 1);
    assert_eq!(reader.evlrs()[0].data, vec![5]);
    assert_eq!(reader.read_at(2).unwrap(), expected[2]);
    assert_eq!(reader.read_at(0).unwrap(), expected[0]);
}

#[test]
fn test_sequential_writer_refuses_extended_records() {
    let header = HeaderBuilder::new(Version::V1_4, PointFormat::Point6)
        .build()
        .unwrap();
    let mut writer = LasWriter::sequential(Vec::new());
    writer.write_header_and_records(&header, &[]).unwrap();
    assert!(matches!(
        writer.write_extended_record(&Evlr::new("a", 1, "", vec![1])),
        Err(LasError::CannotBackPatch)
    ));
    assert_eq!(writer.evlr_state(), EvlrState::NoExtendedRecordWritten);
}

#[test]
fn test_header_byte_offsets_after_write() {
    let mut builder = HeaderBuilder::new(Version::V1_2, PointFormat::Point1);
    builder.set_extra_bytes(3);
    let point = Point1 {
        base: Point0 {
            x: 1,
            return_number: 1,
            ..Default::default()
        },
        gps_time: 2.0,
    };
    builder.add(&point.into());
    let header = builder.build().unwrap();
    let vlrs = [Vlr::new("a", 1, "", vec![0u8; 6])];

    let mut writer = LasWriter::sequential(Vec::new());
    writer.write_header_and_records(&header, &vlrs).unwrap();
    writer.write_point(&point.into(), &[7, 8, 9]).unwrap();
    let bytes = writer.into_inner().into_inner();

    let offset = 227u32 + 54 + 6;
    assert_eq!(&bytes[96..100], &offset.to_le_bytes());
    assert_eq!(&bytes[100..104], &1u32.to_le_bytes());
    assert_eq!(bytes[104], 1);
    assert_eq!(&bytes[105..107], &31u16.to_le_bytes());
    assert_eq!(&bytes[107..111], &1u32.to_le_bytes());
    assert_eq!(&bytes[111..115], &1u32.to_le_bytes());
    assert_eq!(bytes.len(), offset as usize + 31);
    assert_eq!(&bytes[bytes.len() - 3..], &[7, 8, 9]);
}

#[test]
fn test_mismatched_point_is_refused() {
    let header = HeaderBuilder::new(Version::V1_4, PointFormat::Point7)
        .build()
        .unwrap();
    let mut writer = LasWriter::sequential(Vec::new());
    writer.write_header_and_records(&header, &[]).unwrap();
    let other = PointRecord::from(Point1::default());
    assert!(matches!(
        writer.write_point(&other, &[]),
        Err(LasError::PointFormatMismatch {
            expected: 7,
            actual: 1
        })
    ));
    let converted = other.convert_to(PointFormat::Point7);
    assert!(matches!(converted, PointRecord::Point7(Point7 { .. })));
    writer.write_point(&converted, &[]).unwrap();
}

#[test]
fn test_absurd_vlr_count_is_an_error() {
    let mut bytes = write_file(Version::V1_2, PointFormat::Point0, &[], &[], 0);
    bytes[100..104].copy_from_slice(&u32::MAX.to_le_bytes());

    assert!(matches!(
        LasReader::new(Cursor::new(bytes.clone())),
        Err(LasError::IoError(_))
    ));
    assert!(matches!(
        LasReader::sequential(bytes.as_slice()),
        Err(LasError::IoError(_))
    ));
}

#[test]
fn test_point_count_overflowing_offsets_is_an_error() {
    let mut bytes = write_file(Version::V1_4, PointFormat::Point6, &[], &[], 0);
    bytes[247..255].copy_from_slice(&u64::MAX.to_le_bytes());

    assert!(matches!(
        LasReader::new(Cursor::new(bytes.clone())),
        Err(LasError::PointCountTooLarge {
            count: std::u64::MAX,
            record_length: 30
        })
    ));
    assert!(matches!(
        LasReader::sequential(bytes.as_slice()),
        Err(LasError::PointCountTooLarge { .. })
    ));
}

#[test]
fn test_writer_refuses_point_count_overflowing_offsets() {
    let mut builder = HeaderBuilder::new(Version::V1_4, PointFormat::Point6);
    builder.set_number_of_points(u64::MAX);
    let header = builder.build().unwrap();

    let mut writer = LasWriter::new(Cursor::new(Vec::new())).unwrap();
    assert!(matches!(
        writer.write_header_and_records(&header, &[]),
        Err(LasError::PointCountTooLarge { .. })
    ));
    assert!(writer.into_inner().into_inner().into_inner().is_empty());
}
