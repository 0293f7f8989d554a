//! Unit tests for frame error types.

use std::io;

use rstest::rstest;

use super::{FrameError, InvalidData, MalformedFrame};

#[rstest]
#[case::unknown(FrameError::UnknownFrame { frame_type: 0xEE, length: 3 }, "unknown_frame")]
#[case::malformed(
    FrameError::Malformed(MalformedFrame::SettingsAlignment { len: 7 }),
    "malformed"
)]
#[case::padding(FrameError::InvalidPadding { pad_length: 9, body_len: 9 }, "padding")]
#[case::invalid_data(
    FrameError::InvalidData(InvalidData::PromisedStreamId { stream_id: 3 }),
    "invalid_data"
)]
fn error_type_returns_correct_category(#[case] err: FrameError, #[case] expected: &str) {
    assert_eq!(err.error_type(), expected);
}

#[test]
fn frame_error_converts_to_invalid_data_io_error() {
    let err = FrameError::from(MalformedFrame::HeaderLength { have: 4 });
    let io_err: io::Error = err.clone().into();
    assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

    let inner = io_err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<FrameError>())
        .expect("io error should wrap the frame error");
    assert_eq!(inner, &err);
}

#[test]
fn unknown_frame_display_includes_type_and_length() {
    let display = FrameError::UnknownFrame {
        frame_type: 0xAB,
        length: 17,
    }
    .to_string();
    assert!(display.contains("0xab"));
    assert!(display.contains("17"));
}

#[test]
fn unknown_flag_display_names_flag_and_legal_set() {
    let err = InvalidData::UnknownFlag {
        flag: "PRIORITY".to_owned(),
        legal: "END_STREAM, PADDED".to_owned(),
    };
    let display = err.to_string();
    assert!(display.contains("PRIORITY"));
    assert!(display.contains("END_STREAM, PADDED"));
}

#[test]
fn padding_display_mentions_padding() {
    let err = FrameError::InvalidPadding {
        pad_length: 10,
        body_len: 4,
    };
    assert!(err.to_string().starts_with("padding is too long"));
}

#[test]
fn detail_errors_convert_into_frame_error() {
    let err: FrameError = MalformedFrame::PingDataTooLong { len: 9 }.into();
    assert!(matches!(
        err,
        FrameError::Malformed(MalformedFrame::PingDataTooLong { len: 9 })
    ));

    let err: FrameError = InvalidData::WindowIncrement { increment: 0 }.into();
    assert!(matches!(
        err,
        FrameError::InvalidData(InvalidData::WindowIncrement { increment: 0 })
    ));
}
