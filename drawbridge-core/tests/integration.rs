//! Integration tests: whole sessions driven over in-memory streams, and
//! the async codec against the same byte layout.

use bytes::Bytes;
use drawbridge_core::{
    Body, Cursor, DrawError, FrameReader, HeadlessBackend, LoopbackDrawChannel, Message, Mouse,
    MouseEvent, Point, Rect, ServeStats, Server, Tag, WsysCodec,
};
use drawbridge_core::protocol::CURSOR_PLANE_LEN;
use futures::{SinkExt, StreamExt};
use tokio_util::codec::{FramedRead, FramedWrite};

// ── Helpers ──────────────────────────────────────────────────────

fn encode_all(messages: &[Message]) -> Vec<u8> {
    let mut out = Vec::new();
    for m in messages {
        out.extend_from_slice(&m.to_bytes());
    }
    out
}

/// Split the server's output back into reply messages.
fn decode_all(bytes: &[u8]) -> Vec<Message> {
    let mut reader = FrameReader::new(bytes);
    let mut replies = Vec::new();
    while let Some(frame) = reader.next_frame().unwrap() {
        replies.push(Message::decode(frame).unwrap());
    }
    replies
}

fn serve(
    requests: &[Message],
    backend: HeadlessBackend,
) -> (Result<ServeStats, DrawError>, Vec<Message>, HeadlessBackend) {
    let input = encode_all(requests);
    let mut server = Server::new(
        input.as_slice(),
        Vec::new(),
        backend,
        LoopbackDrawChannel::new(),
    );
    let result = server.run();
    let replies = decode_all(server.output());
    let backend = std::mem::take(server.backend_mut());
    (result, replies, backend)
}

// ── Sessions ─────────────────────────────────────────────────────

#[test]
fn full_session() {
    let mut backend = HeadlessBackend::new();
    backend.push_mouse(MouseEvent {
        mouse: Mouse::new(Point::new(10, 20), 1, 1000),
        resized: false,
    });
    backend.push_key(0x61);

    let requests = vec![
        Message::new(1, Body::Tinit {
            winsize: "800x600@10,10".into(),
            label: "acme".into(),
        }),
        Message::new(2, Body::Tlabel {
            label: "acme /usr/glenda".into(),
        }),
        Message::new(3, Body::Twrdraw {
            data: Bytes::from_static(b"\x01\x02\x03\x04"),
        }),
        Message::new(4, Body::Trddraw { count: 1_000_000 }),
        Message::new(5, Body::Trdmouse),
        Message::new(6, Body::Trdkbd),
        Message::new(7, Body::Twrsnarf {
            snarf: "hello".into(),
        }),
        Message::new(8, Body::Trdsnarf),
        Message::new(9, Body::Tcursor { cursor: None }),
        Message::new(10, Body::Tmoveto {
            xy: Point::new(50, 60),
        }),
        Message::new(11, Body::Tresize {
            rect: Rect::new(0, 0, 1024, 768),
        }),
        Message::new(12, Body::Ttop),
    ];
    let (result, replies, backend) = serve(&requests, backend);

    let stats = result.unwrap();
    assert_eq!(stats, ServeStats { requests: 12, errors: 0 });
    assert_eq!(replies.len(), requests.len());

    for (req, reply) in requests.iter().zip(&replies) {
        assert_eq!(reply.serial, req.serial);
        assert_eq!(reply.tag(), req.tag().reply());
    }

    assert_eq!(replies[2].body, Body::Rwrdraw { count: 4 });
    assert_eq!(
        replies[3].body,
        Body::Rrddraw {
            data: Bytes::from_static(b"\x01\x02\x03\x04")
        }
    );
    assert_eq!(replies[5].body, Body::Rrdkbd { rune: 0x61 });
    assert_eq!(
        replies[7].body,
        Body::Rrdsnarf {
            snarf: "hello".into()
        }
    );

    let w = backend.window().unwrap();
    assert_eq!(w.title, "acme /usr/glenda");
    assert_eq!(w.origin, Some(Point::new(10, 10)));
    assert_eq!((w.width, w.height), (1024, 768));
    assert_eq!(w.raised, 1);
    assert_eq!(backend.pointer(), Point::new(50, 60));
    assert!(backend.cursor().is_none());
}

#[test]
fn error_reply_does_not_end_the_session() {
    let requests = vec![
        Message::new(1, Body::Trdsnarf),
        Message::new(2, Body::Tinit {
            winsize: "not a size".into(),
            label: String::new(),
        }),
        Message::new(3, Body::Tinit {
            winsize: String::new(),
            label: String::new(),
        }),
    ];
    let (result, replies, backend) = serve(&requests, HeadlessBackend::new());

    assert_eq!(result.unwrap(), ServeStats { requests: 3, errors: 2 });
    assert_eq!(replies[0], Message::error(1, "clipboard is empty"));
    assert_eq!(
        replies[1],
        Message::error(2, "bad syntax in window size 'not a size'")
    );
    assert_eq!(replies[2], Message::new(3, Body::Rinit));
    let w = backend.window().unwrap();
    assert_eq!((w.width, w.height), (640, 480));
}

#[test]
fn short_declared_length_ends_the_session() {
    let mut input = encode_all(&[Message::new(1, Body::Trdsnarf)]);
    // Length 4 with a Tinit tag: too short to hold the header.
    input.extend_from_slice(&[4, 0, 0, 0, 9, Tag::Tinit as u8]);
    input.extend_from_slice(&encode_all(&[Message::new(2, Body::Ttop)]));

    let mut server = Server::new(
        input.as_slice(),
        Vec::new(),
        HeadlessBackend::new(),
        LoopbackDrawChannel::new(),
    );
    let err = server.run().unwrap_err();
    assert!(matches!(err, DrawError::InvalidMessage(_)), "{err:?}");

    // The request before the bad frame was answered; nothing after it.
    let replies = decode_all(server.output());
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].serial, 1);
}

#[test]
fn field_bearing_tag_with_empty_body_ends_the_session() {
    let input = [6, 0, 0, 0, 1, Tag::Tinit as u8];
    let mut server = Server::new(
        &input[..],
        Vec::new(),
        HeadlessBackend::new(),
        LoopbackDrawChannel::new(),
    );
    let err = server.run().unwrap_err();
    assert!(err.is_fatal());
    assert!(server.output().is_empty());
}

#[test]
fn truncated_frame_ends_the_session() {
    let mut input = encode_all(&[Message::new(1, Body::Tlabel {
        label: "abcdef".into(),
    })]);
    input.truncate(input.len() - 2);

    let mut server = Server::new(
        input.as_slice(),
        Vec::new(),
        HeadlessBackend::new(),
        LoopbackDrawChannel::new(),
    );
    let err = server.run().unwrap_err();
    assert!(matches!(err, DrawError::MessageTooShort { .. }), "{err:?}");
}

#[test]
fn reply_to_a_reply_tag_is_fatal() {
    let input = encode_all(&[Message::new(1, Body::Rtop)]);
    let mut server = Server::new(
        input.as_slice(),
        Vec::new(),
        HeadlessBackend::new(),
        LoopbackDrawChannel::new(),
    );
    assert!(server.run().unwrap_err().is_fatal());
}

// ── Extreme wire values ──────────────────────────────────────────

/// Serve `[Tinit, request, Ttop]` and check that `request` is answered
/// with an error while the session carries on.
fn assert_error_then_served(request: Body) -> String {
    let requests = vec![
        Message::new(1, Body::Tinit {
            winsize: String::new(),
            label: String::new(),
        }),
        Message::new(2, request),
        Message::new(3, Body::Ttop),
    ];
    let (result, replies, backend) = serve(&requests, HeadlessBackend::new());

    assert_eq!(result.unwrap(), ServeStats { requests: 3, errors: 1 });
    assert_eq!(replies[2], Message::new(3, Body::Rtop));
    assert_eq!(backend.window().unwrap().raised, 1);
    match &replies[1].body {
        Body::Rerror { error } if replies[1].serial == 2 => error.clone(),
        other => panic!("expected Rerror for serial 2, got {other:?}"),
    }
}

#[test]
fn resize_with_overflowing_extent_is_an_error_reply() {
    let text = assert_error_then_served(Body::Tresize {
        rect: Rect::new(-10, 0, i32::MAX, 10),
    });
    assert!(text.ends_with("out of range"), "{text}");
}

#[test]
fn init_geometry_overflowing_on_origin_is_an_error_reply() {
    let text = assert_error_then_served(Body::Tinit {
        winsize: "2147483647x10@1,0".into(),
        label: String::new(),
    });
    assert_eq!(text, "bad syntax in window size '2147483647x10@1,0'");
}

#[test]
fn cursor_with_extreme_offset_is_an_error_reply() {
    let text = assert_error_then_served(Body::Tcursor {
        cursor: Some(Cursor::new(
            Point::new(i32::MIN, 0),
            [0; CURSOR_PLANE_LEN],
            [0; CURSOR_PLANE_LEN],
        )),
    });
    assert!(text.contains("hot spot"), "{text}");
}

// ── Async codec ──────────────────────────────────────────────────

#[test]
fn framed_read_sees_server_replies() {
    let requests = vec![
        Message::new(7, Body::Tinit {
            winsize: String::new(),
            label: "x".into(),
        }),
        Message::new(8, Body::Trdkbd),
    ];
    let input = encode_all(&requests);
    let mut server = Server::new(
        input.as_slice(),
        Vec::new(),
        HeadlessBackend::new(),
        LoopbackDrawChannel::new(),
    );
    server.run().unwrap();
    let output = server.into_output();

    tokio_test::block_on(async {
        let mut frames = FramedRead::new(output.as_slice(), WsysCodec);
        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(first, Message::new(7, Body::Rinit));
        let second = frames.next().await.unwrap().unwrap();
        assert_eq!(second, Message::error(8, "no pending keyboard event"));
        assert!(frames.next().await.is_none());
    });
}

#[test]
fn framed_write_matches_blocking_encoding() {
    let messages = vec![
        Message::new(1, Body::Tmoveto {
            xy: Point::new(-1, 2),
        }),
        Message::new(2, Body::Twrdraw {
            data: Bytes::from_static(b"abc"),
        }),
    ];

    let written = tokio_test::block_on(async {
        let mut sink = FramedWrite::new(Vec::new(), WsysCodec);
        for m in &messages {
            sink.send(m.clone()).await.unwrap();
        }
        sink.into_inner()
    });
    assert_eq!(written, encode_all(&messages));
}

#[tokio::test]
async fn codec_over_duplex_stream() {
    let (client, server) = tokio::io::duplex(64);
    let messages = vec![
        Message::new(1, Body::Tinit {
            winsize: "800x600@10,10".into(),
            label: "acme".into(),
        }),
        Message::new(2, Body::Twrdraw {
            data: Bytes::from(vec![0xAB; 300]),
        }),
        Message::new(3, Body::Ttop),
    ];

    let writer = tokio::spawn({
        let messages = messages.clone();
        async move {
            let mut sink = FramedWrite::new(client, WsysCodec);
            for m in messages {
                sink.send(m).await.unwrap();
            }
        }
    });

    let mut frames = FramedRead::new(server, WsysCodec);
    let mut received = Vec::new();
    while let Some(msg) = frames.next().await {
        received.push(msg.unwrap());
    }
    writer.await.unwrap();
    assert_eq!(received, messages);
}
