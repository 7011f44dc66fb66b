//! Header and body decoding against in-source PLY fixtures

use ply_cloud::{Ply, PlyError, PlyFormat, PlyHeader, PropertyType, ScalarType, ScalarValue};

const CUBE_CORNERS: &str = "ply
format ascii 1.0
comment corners of a unit cube
obj_info generated for tests
element vertex 4
property float x
property float y
property float z
property uchar red
element face 2
property list uchar int vertex_indices
end_header
0 0 0 10
1 0 0 20
1 1 0 30
0 1 1 40
3 0 1 2
4 0 1 2 3
";

fn binary_fixture(format: &str, points: &[[f32; 3]]) -> Vec<u8> {
    let mut bytes = format!(
        "ply\nformat {format} 1.0\nelement vertex {}\nproperty float x\nproperty float y\nproperty float z\nend_header\n",
        points.len()
    )
    .into_bytes();
    for point in points {
        for v in point {
            if format == "binary_big_endian" {
                bytes.extend_from_slice(&v.to_be_bytes());
            } else {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
    }
    bytes
}

#[test]
fn test_header_schema() {
    let (header, offset) = PlyHeader::parse(CUBE_CORNERS.as_bytes()).unwrap();
    assert_eq!(header.format, PlyFormat::Ascii);
    assert_eq!(header.version, "1.0");
    assert_eq!(header.comments, vec!["corners of a unit cube"]);
    assert_eq!(header.obj_info, vec!["generated for tests"]);
    assert_eq!(&CUBE_CORNERS[offset..offset + 9], "0 0 0 10\n");

    let vertex = header.get_element("vertex").unwrap();
    assert_eq!(vertex.count, 4);
    assert_eq!(vertex.record_width(), Some(13));

    let face = header.get_element("face").unwrap();
    assert!(face.has_list());
    assert_eq!(
        face.properties[0].property_type,
        PropertyType::List {
            count_type: ScalarType::U8,
            data_type: ScalarType::I32,
        }
    );
    assert!(!header.has_element("edge"));
}

#[test]
fn test_ascii_with_lists() {
    let ply = Ply::from_bytes(CUBE_CORNERS.as_bytes()).unwrap();
    let spans = ply.element_spans().unwrap();
    // 4 * 13 vertex bytes, then (1 + 3 * 4) + (1 + 4 * 4) face bytes.
    assert_eq!(spans, vec![0..52, 52..82]);

    let face = &ply.data()[52..];
    assert_eq!(face[0], 3);
    assert_eq!(face[13], 4);
    assert_eq!(&face[26..30], &3i32.to_le_bytes());

    let cloud = ply.to_point_cloud();
    assert!(cloud.is_ok());
    assert_eq!(cloud.unwrap().get("red", 3).unwrap(), ScalarValue::U8(40));
}

#[test]
fn test_crlf_matches_lf() {
    let crlf = CUBE_CORNERS.replace('\n', "\r\n");
    let lf = Ply::from_bytes(CUBE_CORNERS.as_bytes()).unwrap();
    let windows = Ply::from_bytes(crlf.as_bytes()).unwrap();
    assert_eq!(lf.data(), windows.data());
    assert_eq!(lf.header().elements, windows.header().elements);
}

#[test]
fn test_all_scalar_types() {
    let text = "ply
format ascii 1.0
element sample 1
property char a
property uchar b
property short c
property ushort d
property int e
property uint f
property float g
property double h
end_header
-128 255 -32768 65535 -2147483648 4294967295 1.5 -0.25
";
    let ply = Ply::from_bytes(text.as_bytes()).unwrap();
    assert_eq!(ply.data().len(), 1 + 1 + 2 + 2 + 4 + 4 + 4 + 8);
    let rendered = ply.to_string();
    assert!(rendered.ends_with("-128 255 -32768 65535 -2147483648 4294967295 1.5 -0.25\n"));
}

#[test]
fn test_sized_type_names() {
    let text = "ply
format ascii 1.0
element vertex 1
property float32 x
property uint8 red
end_header
2.5 7
";
    let ply = Ply::from_bytes(text.as_bytes()).unwrap();
    let cloud = ply.to_point_cloud().unwrap();
    assert_eq!(cloud.get("x", 0).unwrap(), ScalarValue::F32(2.5));
    assert_eq!(cloud.get("red", 0).unwrap(), ScalarValue::U8(7));
    // Writers fall back to the classic spelling.
    assert!(ply.to_string().contains("property float x\nproperty uchar red\n"));
}

#[test]
fn test_binary_little_endian() {
    let bytes = binary_fixture("binary_little_endian", &[[1.0, 2.0, 3.0], [-4.0, 0.5, 6.0]]);
    let ply = Ply::from_bytes(&bytes).unwrap();
    assert_eq!(ply.header().format, PlyFormat::BinaryLittleEndian);
    assert_eq!(ply.data().len(), 24);
    let cloud = ply.to_point_cloud().unwrap();
    assert_eq!(cloud.to_string(), "1 2 3\n-4 0.5 6\n");
}

#[test]
fn test_big_endian_is_rejected() {
    let bytes = binary_fixture("binary_big_endian", &[[1.0, 2.0, 3.0]]);
    assert!(matches!(
        Ply::from_bytes(&bytes),
        Err(PlyError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_truncated_binary_body() {
    let mut bytes = binary_fixture("binary_little_endian", &[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    bytes.truncate(bytes.len() - 1);
    assert!(matches!(
        Ply::from_bytes(&bytes),
        Err(PlyError::Truncated { index: 1, .. })
    ));
}

#[test]
fn test_malformed_headers() {
    let cases: &[&str] = &[
        "plx\nformat ascii 1.0\nend_header\n",
        "ply\nformat ascii 1.0\nproperty float x\nend_header\n",
        "ply\nformat ascii 1.0\nelement vertex 1\nfrobnicate\nend_header\n",
        "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\n",
    ];
    for case in cases {
        assert!(
            matches!(
                PlyHeader::parse(case.as_bytes()),
                Err(PlyError::InvalidHeader(_))
            ),
            "expected header error for {case:?}"
        );
    }
}

#[test]
fn test_unknown_scalar_type() {
    let text = "ply\nformat ascii 1.0\nelement vertex 1\nproperty quad x\nend_header\n";
    assert!(matches!(
        PlyHeader::parse(text.as_bytes()),
        Err(PlyError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_ascii_token_count_mismatch() {
    let too_few = "ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nproperty float y\nend_header\n1 2\n3\n";
    match Ply::from_bytes(too_few.as_bytes()) {
        Err(PlyError::Parse { element, index, .. }) => {
            assert_eq!(element, "vertex");
            assert_eq!(index, 1);
        }
        other => panic!("expected parse error, got {other:?}"),
    }

    let too_many = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nend_header\n1 2\n";
    assert!(matches!(
        Ply::from_bytes(too_many.as_bytes()),
        Err(PlyError::Parse { index: 0, .. })
    ));
}
