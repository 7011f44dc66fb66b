//! Encoding packed buffers back to ASCII and binary files

use glam::DVec3;
use ply_cloud::{
    ElementDef, Ply, PlyError, PlyFormat, PlyHeader, PlyProperty, PointCloud, PointProperty,
    ScalarType, CREATOR_COMMENT,
};

#[test]
fn test_points_to_ascii_file() {
    let ply = Ply::from_points(&[
        DVec3::ZERO,
        DVec3::ONE,
        DVec3::new(-1.0, -1.0, -1.0),
    ]);
    let bytes = ply.to_bytes(PlyFormat::Ascii).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "ply\nformat ascii 1.0\ncomment Created by DotNet3d\nelement vertex 3\nproperty float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n1 1 1\n-1 -1 -1\n"
    );
}

#[test]
fn test_binary_file_layout() {
    let ply = Ply::from_points(&[DVec3::new(1.0, 2.0, 3.0)]);
    let bytes = ply.to_bytes(PlyFormat::BinaryLittleEndian).unwrap();
    let header = "ply\nformat binary_little_endian 1.0\ncomment Created by DotNet3d\nelement vertex 1\nproperty float x\nproperty float y\nproperty float z\nend_header\n";
    assert_eq!(&bytes[..header.len()], header.as_bytes());
    assert_eq!(&bytes[header.len()..], ply.data());
    assert_eq!(&bytes[header.len()..header.len() + 4], &1.0f32.to_le_bytes());
}

#[test]
fn test_big_endian_output_rejected() {
    let ply = Ply::from_points(&[DVec3::ONE]);
    assert!(matches!(
        ply.to_bytes(PlyFormat::BinaryBigEndian),
        Err(PlyError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_comments_are_preserved() {
    let text = "ply
format ascii 1.0
comment Created by DotNet3d
comment scanned on tuesday
obj_info scanner 7
element vertex 1
property double x
end_header
0.125
";
    let ply = Ply::from_bytes(text.as_bytes()).unwrap();
    let written = ply.to_string();
    assert_eq!(written.matches(CREATOR_COMMENT).count(), 1);
    assert_eq!(written, text);
}

#[test]
fn test_ascii_round_trip() {
    let cloud = PointCloud::from_points(&[
        DVec3::new(0.1, -2.5, 1e-3),
        DVec3::new(123456.0, 0.0, -7.75),
    ]);
    let ply = Ply::from(cloud.clone());
    let decoded = Ply::from_bytes(&ply.to_bytes(PlyFormat::Ascii).unwrap()).unwrap();
    assert_eq!(decoded.to_point_cloud().unwrap(), cloud);
}

#[test]
fn test_binary_round_trip() {
    let properties = vec![
        PointProperty::new("x", ScalarType::F64),
        PointProperty::new("intensity", ScalarType::U16),
        PointProperty::new("label", ScalarType::I8),
    ];
    let mut data = Vec::new();
    for (x, intensity, label) in [(0.5f64, 900u16, -3i8), (-1e10, 7, 100)] {
        data.extend_from_slice(&x.to_le_bytes());
        data.extend_from_slice(&intensity.to_le_bytes());
        data.extend_from_slice(&label.to_le_bytes());
    }
    let cloud = PointCloud::new(2, properties, data).unwrap();

    let bytes = Ply::from(cloud.clone())
        .to_bytes(PlyFormat::BinaryLittleEndian)
        .unwrap();
    let decoded = Ply::from_bytes(&bytes).unwrap().to_point_cloud().unwrap();
    assert_eq!(decoded, cloud);
    assert_eq!(decoded.to_string(), "0.5 900 -3\n-10000000000 7 100\n");
}

#[test]
fn test_list_elements_round_trip() {
    let mut vertex = ElementDef::new("vertex", 3);
    for name in ["x", "y"] {
        vertex
            .properties
            .push(PlyProperty::scalar(name, ScalarType::F32));
    }
    let mut face = ElementDef::new("face", 1);
    face.properties
        .push(PlyProperty::list("vertex_indices", ScalarType::U8, ScalarType::U32));

    let mut data = Vec::new();
    for v in [0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    data.push(3);
    for i in 0..3u32 {
        data.extend_from_slice(&i.to_le_bytes());
    }

    let ply = Ply::new(PlyHeader::new(PlyFormat::Ascii, vec![vertex, face]), data).unwrap();
    let text = ply.to_string();
    assert!(text.ends_with("end_header\n0 0\n1 0\n0 1\n3 0 1 2\n"));
    assert!(text.contains("property list uchar uint vertex_indices\n"));

    let from_ascii = Ply::from_bytes(text.as_bytes()).unwrap();
    let binary = ply.to_bytes(PlyFormat::BinaryLittleEndian).unwrap();
    let from_binary = Ply::from_bytes(&binary).unwrap();
    assert_eq!(from_ascii.data(), ply.data());
    assert_eq!(from_binary.data(), ply.data());
}

#[test]
fn test_non_finite_values() {
    let cloud = PointCloud::from_points(&[DVec3::new(f64::NAN, f64::INFINITY, f64::NEG_INFINITY)]);
    let text = Ply::from(cloud).to_string();
    assert!(text.ends_with("end_header\nNaN Inf -Inf\n"));

    let decoded = Ply::from_bytes(text.as_bytes()).unwrap();
    assert_eq!(decoded.to_point_cloud().unwrap().to_string(), "NaN Inf -Inf\n");
}
