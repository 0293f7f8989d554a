//! Decoding hand-built wire bytes through `FrameCodec`.

use std::io;

use bytes::Bytes;
use h2wire::{
    CodecConfig,
    Frame,
    FrameCodec,
    FrameError,
    InvalidData,
    MalformedFrame,
    frame::{Data, Ping, SettingId, Settings},
};
use h2wire_testing::{
    codec,
    decode_all,
    decode_with,
    declared_length_wire,
    encode_all,
    oversized_data_wire,
    padded_data_wire,
    raw_frame,
    truncated_body_wire,
};
use rstest::rstest;

fn frame_error(err: &io::Error) -> &FrameError {
    err.get_ref()
        .and_then(|inner| inner.downcast_ref::<FrameError>())
        .expect("io error should wrap a FrameError")
}

#[test]
fn connection_preface_settings_decode_in_order() {
    let mut body = Vec::new();
    for (id, value) in [(0x3u16, 100u32), (0x4, 65_535), (0x3, 250)] {
        body.extend_from_slice(&id.to_be_bytes());
        body.extend_from_slice(&value.to_be_bytes());
    }
    let mut wire = raw_frame(0x4, 0, 0, &body);
    wire.extend(raw_frame(0x4, 0x1, 0, &[]));

    let frames = decode_all(wire).expect("settings should decode");
    let [Frame::Settings(settings), Frame::Settings(ack)] = frames.as_slice() else {
        panic!("expected two settings frames, got {frames:?}");
    };
    assert_eq!(settings.settings.len(), 3);
    assert_eq!(settings.get(SettingId::MAX_CONCURRENT_STREAMS), Some(250));
    assert_eq!(settings.get(SettingId::INITIAL_WINDOW_SIZE), Some(65_535));
    assert!(ack.is_ack());
}

#[rstest]
#[case::no_padding(b"hello".as_slice(), 0)]
#[case::some_padding(b"hello".as_slice(), 7)]
#[case::empty_data(b"".as_slice(), 3)]
fn padded_data_is_stripped(#[case] data: &[u8], #[case] pad_length: u8) {
    let frames = decode_all(padded_data_wire(5, data, pad_length)).expect("padded data");
    let [Frame::Data(frame)] = frames.as_slice() else {
        panic!("expected one data frame, got {frames:?}");
    };
    assert_eq!(&frame.data[..], data);
    assert_eq!(frame.padding.pad_length, pad_length);
    assert_eq!(
        frame.flow_controlled_length(),
        data.len() + 1 + usize::from(pad_length)
    );
}

#[test]
fn padding_longer_than_body_is_rejected() {
    let wire = raw_frame(0x0, 0x8, 1, &[10, b'a', b'b']);
    let err = decode_all(wire).expect_err("pad length exceeds body");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(frame_error(&err).error_type(), "padding");
}

#[rstest]
#[case::zero(0)]
#[case::reserved_bit_only(0x8000_0000)]
fn zero_window_increment_is_rejected(#[case] increment: u32) {
    let wire = raw_frame(0x8, 0, 1, &increment.to_be_bytes());
    let err = decode_all(wire).expect_err("zero increment");
    assert_eq!(
        frame_error(&err),
        &FrameError::InvalidData(InvalidData::WindowIncrement { increment: 0 })
    );
}

#[rstest]
#[case::data_on_connection(0x0, 0)]
#[case::headers_on_connection(0x1, 0)]
#[case::settings_on_stream(0x4, 1)]
#[case::goaway_on_stream(0x7, 9)]
fn stream_association_violations_fail(#[case] frame_type: u8, #[case] stream_id: u32) {
    let wire = declared_length_wire(frame_type, stream_id, 0);
    let err = decode_all(wire).expect_err("association violation");
    assert_eq!(frame_error(&err).error_type(), "invalid_data");
}

#[rstest]
fn oversized_frames_are_rejected_before_buffering(codec: FrameCodec) {
    let err = decode_with(codec, declared_length_wire(0x0, 1, 16_385))
        .expect_err("declared length above limit");
    assert_eq!(
        frame_error(&err),
        &FrameError::Malformed(MalformedFrame::OversizedFrame {
            size: 16_385,
            max: 16_384
        })
    );
}

#[test]
fn raised_limit_accepts_larger_frames() {
    let codec = FrameCodec::new(CodecConfig::default().max_frame_size(32_768));
    let frames = decode_with(codec, oversized_data_wire(16_384)).expect("within raised limit");
    assert_eq!(frames[0].body_len(), 16_385);
}

#[rstest]
#[case::ping(0x6, 0, vec![1; 8])]
#[case::goaway(0x7, 0, vec![0; 12])]
fn truncated_trailing_frame_is_reported(
    #[case] frame_type: u8,
    #[case] stream_id: u32,
    #[case] body: Vec<u8>,
) {
    let mut wire = raw_frame(0x6, 0x1, 0, &[0; 8]);
    wire.extend(truncated_body_wire(frame_type, stream_id, &body));

    let err = decode_all(wire).expect_err("trailing frame is incomplete");
    assert!(matches!(
        frame_error(&err),
        FrameError::Malformed(MalformedFrame::Truncated { .. })
    ));
}

#[test]
fn unknown_frames_survive_a_decode_encode_cycle() {
    let wire = raw_frame(0xF0, 0xAB, 0x8000_0011, b"opaque");
    let frames = decode_all(wire.clone()).expect("lenient decode");
    assert_eq!(frames.len(), 1);

    let reencoded = encode_all(codec(), frames).expect("re-encode");
    let mut expected = wire;
    expected[5] &= 0x7F;
    assert_eq!(reencoded, expected);
}

#[test]
fn encoded_frames_match_hand_built_bytes() {
    let mut data = Data::new(1)
        .and_then(|frame| frame.with_flag("END_STREAM"))
        .expect("valid data frame");
    data.data = Bytes::from_static(b"hi");
    let ping = Ping::new(0).expect("valid ping frame");

    let frames = [Frame::from(data), Frame::from(ping), Frame::from(Settings::ack())];
    let wire = encode_all(codec(), frames).expect("encode");

    let mut expected = raw_frame(0x0, 0x1, 1, b"hi");
    expected.extend(raw_frame(0x6, 0, 0, &[0; 8]));
    expected.extend(raw_frame(0x4, 0x1, 0, &[]));
    assert_eq!(wire, expected);
}
