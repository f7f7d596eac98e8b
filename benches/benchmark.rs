#[macro_use]
extern crate criterion;

use std::hint::black_box;
use std::io::Cursor;

use criterion::Criterion;

use las_codec::las::point6::Point6;
use las_codec::las::pointtypes::Point3;
use las_codec::{convert_buffer, HeaderBuilder, LasReader, LasWriter, PointFormat, PointRecord};
use las_codec::Version;

const NUM_POINTS: i32 = 10_000;

fn point3_records() -> Vec<PointRecord> {
    (0..NUM_POINTS)
        .map(|i| {
            let mut point = Point3::default();
            point.base.x = i;
            point.base.y = -i;
            point.base.return_number = 1;
            point.gps_time = f64::from(i) * 0.01;
            PointRecord::from(point)
        })
        .collect()
}

fn raw_points(records: &[PointRecord]) -> Vec<u8> {
    records.iter().flat_map(|r| r.to_bytes()).collect()
}

fn point3_decode_benchmark(c: &mut Criterion) {
    let points_data = raw_points(&point3_records());
    c.bench_function("point_3_decode", move |b| {
        let mut raw_pts_iter = points_data
            .chunks_exact(PointFormat::Point3.size())
            .cycle();
        b.iter(|| {
            black_box(PointRecord::decode(
                PointFormat::Point3,
                raw_pts_iter.next().unwrap(),
            ))
        });
    });
}

fn point6_encode_benchmark(c: &mut Criterion) {
    let mut point = Point6::default();
    point.set_return_number(2);
    point.set_number_of_returns(3);
    point.gps_time = 1234.5;
    let record = PointRecord::from(point);
    c.bench_function("point_6_encode", move |b| {
        let mut buffer = [0u8; Point6::SIZE];
        b.iter(|| record.encode(black_box(&mut buffer)));
    });
}

fn convert_buffer_benchmark(c: &mut Criterion) {
    let points_data = raw_points(&point3_records());
    c.bench_function("convert_buffer_3_to_7", move |b| {
        b.iter(|| convert_buffer(&points_data, PointFormat::Point3, PointFormat::Point7).unwrap());
    });
}

#[cfg(feature = "parallel")]
fn par_convert_buffer_benchmark(c: &mut Criterion) {
    let points_data = raw_points(&point3_records());
    c.bench_function("par_convert_buffer_3_to_7", move |b| {
        b.iter(|| {
            las_codec::par_convert_buffer(&points_data, PointFormat::Point3, PointFormat::Point7)
                .unwrap()
        });
    });
}

fn write_read_benchmark(c: &mut Criterion) {
    let records = point3_records();
    let mut builder = HeaderBuilder::new(Version::V1_2, PointFormat::Point3);
    for record in &records {
        builder.add(record);
    }
    let header = builder.build().unwrap();

    c.bench_function("write_read_point_3", move |b| {
        b.iter(|| {
            let mut writer = LasWriter::new(Cursor::new(Vec::new())).unwrap();
            writer.write_header_and_records(&header, &[]).unwrap();
            for record in &records {
                writer.write_point(record, &[]).unwrap();
            }
            let mut cursor = writer.into_inner().into_inner();
            cursor.set_position(0);
            let mut reader = LasReader::new(cursor).unwrap();
            reader.points().count()
        });
    });
}

#[cfg(not(feature = "parallel"))]
criterion_group!(
    benches,
    point3_decode_benchmark,
    point6_encode_benchmark,
    convert_buffer_benchmark,
    write_read_benchmark
);
#[cfg(feature = "parallel")]
criterion_group!(
    benches,
    point3_decode_benchmark,
    point6_encode_benchmark,
    convert_buffer_benchmark,
    par_convert_buffer_benchmark,
    write_read_benchmark
);
criterion_main!(benches);
