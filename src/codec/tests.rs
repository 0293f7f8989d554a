//! Unit tests for header parsing, the frame entry points and `FrameCodec`.

use std::io;

use bytes::{Bytes, BytesMut};
use rstest::{fixture, rstest};
use tokio_util::codec::{Decoder, Encoder};
use tracing_test::traced_test;

use super::*;
use crate::{
    error::InvalidData,
    frame::{Data, Ping, Settings},
};

#[fixture]
fn codec() -> FrameCodec { FrameCodec::new(CodecConfig::default()) }

#[rstest]
#[case::connection(0)]
#[case::first_stream(1)]
#[case::max_stream(0x7FFF_FFFF)]
fn header_round_trips_stream_ids(#[case] stream_id: u32) {
    let header = FrameHeader {
        length: 0x01_0203,
        frame_type: 0x8,
        flags: 0xA5,
        stream_id,
    };
    assert_eq!(FrameHeader::decode(header.encode()), header);
}

#[test]
fn reserved_bit_is_never_observed() {
    let header = FrameHeader {
        length: 0,
        frame_type: 0x9,
        flags: 0,
        stream_id: 0xFFFF_FFFF,
    };
    let bytes = header.encode();
    assert_eq!(bytes[5] & 0x80, 0, "reserved bit must be written as zero");

    let mut raw = bytes;
    raw[5] |= 0x80;
    assert_eq!(FrameHeader::decode(raw).stream_id, 0x7FFF_FFFF);
}

#[test]
fn header_length_uses_all_24_bits() {
    let bytes = [0xFF, 0xFF, 0xFF, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1];
    assert_eq!(FrameHeader::decode(bytes).length, 0x00FF_FFFF);
}

#[rstest]
#[case(&[][..])]
#[case(&[0; 8][..])]
#[case(&[0; 10][..])]
fn parse_header_requires_nine_bytes(#[case] header: &[u8]) {
    assert_eq!(
        parse_header(header, true),
        Err(FrameError::Malformed(MalformedFrame::HeaderLength {
            have: header.len()
        }))
    );
}

#[test]
fn parse_header_drops_undefined_flag_bits() {
    let (frame, length) =
        parse_header(&[0, 0, 0, 0x0, 0xFF, 0, 0, 0, 1], true).expect("data header");
    assert_eq!(length, 0);
    let flags = frame.flags().expect("data frames carry a flag set");
    assert_eq!(flags.bits(), 0x09);
    assert_eq!(frame.flag_byte(), 0x09);
}

#[test]
fn parse_header_enforces_stream_association() {
    assert_eq!(
        parse_header(&[0, 0, 0, 0x0, 0, 0, 0, 0, 0], true).map(|(_, len)| len),
        Err(FrameError::InvalidData(InvalidData::StreamIdRequired {
            kind: "DATA"
        }))
    );
    assert_eq!(
        parse_header(&[0, 0, 8, 0x6, 0, 0, 0, 0, 3], true).map(|(_, len)| len),
        Err(FrameError::InvalidData(InvalidData::StreamIdForbidden {
            kind: "PING",
            stream_id: 3
        }))
    );
}

#[test]
fn unknown_type_in_strict_mode_is_rejected() {
    let result = parse_header(&[0, 0, 3, 0xEE, 0x1, 0, 0, 0, 1], true);
    assert_eq!(
        result.map(|(_, len)| len),
        Err(FrameError::UnknownFrame {
            frame_type: 0xEE,
            length: 3
        })
    );
}

#[traced_test]
#[test]
fn unknown_type_falls_back_to_extension_and_round_trips() {
    let wire = b"\x00\x00\x03\xEE\xF3\x80\x00\x00\x07abc";
    let (mut frame, length) = parse_header(&wire[..9], false).expect("lenient header");
    assert_eq!(length, 3);
    parse_body(&mut frame, &wire[9..]).expect("opaque body");

    let Frame::Extension(ref extension) = frame else {
        panic!("expected extension frame, got {frame:?}");
    };
    assert_eq!(extension.frame_type(), 0xEE);
    assert_eq!(extension.flag_byte, 0xF3);
    assert_eq!(extension.stream_id(), 7);

    let mut expected = wire.to_vec();
    expected[5] &= 0x7F;
    assert_eq!(&encode(&mut frame).expect("re-encode")[..], &expected[..]);
    assert!(logs_contain("unregistered frame type"));
}

#[test]
fn data_frame_encodes_to_known_bytes() {
    let mut data = Data::new(1)
        .and_then(|frame| frame.with_flag("END_STREAM"))
        .expect("valid data frame");
    data.data = Bytes::from_static(b"hi");
    let mut frame = Frame::from(data);

    let wire = encode(&mut frame).expect("encode");
    assert_eq!(&wire[..9], &[0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(&wire[9..], b"hi");
    assert_eq!(frame.body_len(), 2);
}

#[test]
fn ping_with_four_byte_body_is_malformed() {
    let (mut frame, length) =
        parse_header(&[0x00, 0x00, 0x04, 0x06, 0x00, 0x00, 0x00, 0x00, 0x00], true)
            .expect("ping header");
    assert_eq!(length, 4);
    let err = parse_body(&mut frame, &[1, 2, 3, 4]).expect_err("ping needs 8 bytes");
    assert_eq!(err.error_type(), "malformed");
}

#[test]
fn parse_body_copies_out_of_the_callers_buffer() {
    let (mut frame, length) =
        parse_header(&[0, 0, 4, 0x9, 0x4, 0, 0, 0, 1], true).expect("continuation header");
    let mut body = vec![1, 2, 3, 4];
    parse_body(&mut frame, &body[..length]).expect("continuation body");
    body.fill(0);

    let Frame::Continuation(continuation) = frame else {
        panic!("expected continuation frame");
    };
    assert_eq!(&continuation.data[..], &[1, 2, 3, 4]);
}

#[traced_test]
#[test]
fn explain_reports_consumed_bytes_and_logs_frame() {
    let mut ping = Ping::new(0)
        .and_then(|frame| frame.with_flag("ACK"))
        .expect("valid ping frame");
    ping.set_opaque_data(b"12345678").expect("eight bytes fit");
    let mut wire = encode(&mut Frame::from(ping)).expect("encode").to_vec();
    wire.extend_from_slice(b"next frame");

    let (frame, consumed) = explain(&wire).expect("explain");
    assert_eq!(consumed, 17);
    assert_eq!(frame.frame_type(), 0x6);
    assert!(logs_contain("explained frame"));
    assert!(logs_contain("PingFrame(stream_id=0, flags=[ACK])"));
}

#[rstest]
#[case::short_header(&[0, 0, 1][..], 9)]
#[case::short_body(&[0, 0, 4, 0x3, 0, 0, 0, 0, 1, 0][..], 13)]
fn explain_rejects_truncated_buffers(#[case] buffer: &[u8], #[case] expected: usize) {
    assert_eq!(
        explain(buffer).map(|(_, consumed)| consumed),
        Err(FrameError::Malformed(MalformedFrame::Truncated {
            expected,
            have: buffer.len()
        }))
    );
}

#[rstest]
fn codec_decodes_frames_across_partial_reads(mut codec: FrameCodec) {
    let mut first = Frame::from(Settings::ack());
    let mut second = Frame::from(Ping::new(0).expect("valid ping frame"));
    let mut wire = BytesMut::new();
    wire.extend_from_slice(&encode(&mut first).expect("encode settings"));
    wire.extend_from_slice(&encode(&mut second).expect("encode ping"));

    let mut buf = BytesMut::new();
    let mut decoded = Vec::new();
    for byte in wire {
        buf.extend_from_slice(&[byte]);
        if let Some(frame) = codec.decode(&mut buf).expect("decode") {
            decoded.push(frame);
        }
    }

    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].frame_type(), 0x4);
    assert_eq!(decoded[1].frame_type(), 0x6);
    assert!(buf.is_empty());
}

#[rstest]
fn codec_rejects_declared_length_above_limit(mut codec: FrameCodec) {
    let mut buf = BytesMut::from(&[0x00, 0x40, 0x01, 0x0, 0x0, 0, 0, 0, 1][..]);
    let err = codec.decode(&mut buf).expect_err("oversized frame");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);

    let inner = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<FrameError>())
        .expect("frame error");
    assert_eq!(
        inner,
        &FrameError::Malformed(MalformedFrame::OversizedFrame {
            size: 16_385,
            max: 16_384
        })
    );
}

#[test]
fn codec_honours_strict_mode() {
    let wire = [0, 0, 0, 0xEE, 0, 0, 0, 0, 0];

    let mut strict = FrameCodec::new(CodecConfig::default().strict(true));
    let err = strict
        .decode(&mut BytesMut::from(&wire[..]))
        .expect_err("strict codec rejects unknown types");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);

    let mut lenient = FrameCodec::new(CodecConfig::default());
    let frame = lenient
        .decode(&mut BytesMut::from(&wire[..]))
        .expect("lenient decode")
        .expect("complete frame");
    assert!(matches!(frame, Frame::Extension(_)));
}

#[rstest]
fn codec_decode_eof_reports_truncation(mut codec: FrameCodec) {
    let mut empty = BytesMut::new();
    assert!(codec.decode_eof(&mut empty).expect("clean end").is_none());

    let mut partial = BytesMut::from(&[0, 0, 8, 0x6, 0, 0, 0, 0, 0, 1, 2][..]);
    let err = codec.decode_eof(&mut partial).expect_err("truncated frame");
    let inner = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<FrameError>())
        .expect("frame error");
    assert_eq!(
        inner,
        &FrameError::Malformed(MalformedFrame::Truncated {
            expected: 17,
            have: 11
        })
    );
}

#[rstest]
fn codec_encodes_frames(mut codec: FrameCodec) {
    let mut dst = BytesMut::new();
    codec
        .encode(Frame::from(Settings::ack()), &mut dst)
        .expect("encode settings ack");
    assert_eq!(&dst[..], &[0, 0, 0, 0x4, 0x1, 0, 0, 0, 0]);
}

#[rstest]
fn codec_encode_rejects_body_above_limit(mut codec: FrameCodec) {
    let mut data = Data::new(1).expect("valid data frame");
    data.data = Bytes::from(vec![0; 16_385]);
    let mut dst = BytesMut::new();
    let err = codec
        .encode(Frame::from(data), &mut dst)
        .expect_err("oversized body");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(dst.is_empty());
}

#[rstest]
#[case(0, 16_384)]
#[case(20_000, 20_000)]
#[case(u32::MAX, 16_777_215)]
fn codec_clamps_max_frame_size(#[case] requested: u32, #[case] expected: u32) {
    let config = CodecConfig {
        strict: false,
        max_frame_size: requested,
    };
    assert_eq!(FrameCodec::new(config).config().max_frame_size, expected);
}
