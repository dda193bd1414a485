use serde::de::DeserializeOwned;

use crate::error::FeedError;
use crate::feed::types::{CoordinatedTradeEvent, FeedEvent, StreamKind, TransferEvent};

/// One wire frame: optional event name plus the joined data payload.
#[derive(Clone, Debug, PartialEq)]
pub struct SseFrame {
    pub event: Option<String>,
    pub data: String,
}

/// Incremental SSE framing over raw byte chunks. Chunk boundaries carry no
/// meaning; lines are assembled across pushes and a blank line closes a frame.
#[derive(Default)]
pub struct FrameDecoder {
    pending: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.pending.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            self.process_line(line, &mut frames);
        }
        frames
    }

    fn process_line(&mut self, line: &str, frames: &mut Vec<SseFrame>) {
        if line.is_empty() {
            if self.event.is_some() || !self.data.is_empty() {
                frames.push(SseFrame {
                    event: self.event.take(),
                    data: self.data.join("\n"),
                });
                self.data.clear();
            }
            return;
        }
        // Comment / keep-alive line.
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // "id" and "retry" carry nothing we use.
            _ => {}
        }
    }
}

/// A frame after payload decoding, unified across both wire conventions.
#[derive(Debug)]
pub enum DecodedFrame {
    Events(Vec<FeedEvent>),
    Heartbeat,
}

/// Decode one frame's payload into feed events.
///
/// Named frames follow the combined-stream convention: "transfers" carries an
/// array of transfers, "coordinated" a single object, "heartbeat" nothing.
/// Unnamed frames (per-kind endpoint variants) carry a bare object or array of
/// the stream's own kind; on the combined stream the transfer shape is tried
/// first. Either shape — array or single object — is accepted everywhere.
pub fn decode_frame(frame: &SseFrame, stream: StreamKind) -> Result<DecodedFrame, FeedError> {
    match frame.event.as_deref() {
        Some("heartbeat") => Ok(DecodedFrame::Heartbeat),
        Some("transfers") => Ok(DecodedFrame::Events(decode_transfers(&frame.data)?)),
        Some("coordinated") => Ok(DecodedFrame::Events(decode_coordinated(&frame.data)?)),
        Some(other) => Err(FeedError::Parse(format!("unknown event name: {}", other))),
        None => {
            if frame.data.trim().is_empty() {
                return Ok(DecodedFrame::Heartbeat);
            }
            match stream {
                StreamKind::Transfers => Ok(DecodedFrame::Events(decode_transfers(&frame.data)?)),
                StreamKind::Coordinated => {
                    Ok(DecodedFrame::Events(decode_coordinated(&frame.data)?))
                }
                StreamKind::Combined => decode_transfers(&frame.data)
                    .or_else(|_| decode_coordinated(&frame.data))
                    .map(DecodedFrame::Events),
            }
        }
    }
}

fn decode_transfers(data: &str) -> Result<Vec<FeedEvent>, FeedError> {
    let events: Vec<TransferEvent> = one_or_many(data)?;
    Ok(events.into_iter().map(FeedEvent::Transfer).collect())
}

fn decode_coordinated(data: &str) -> Result<Vec<FeedEvent>, FeedError> {
    let events: Vec<CoordinatedTradeEvent> = one_or_many(data)?;
    Ok(events.into_iter().map(FeedEvent::Coordinated).collect())
}

/// Accept either a JSON array of T (kept in array order) or a single T.
fn one_or_many<T: DeserializeOwned>(data: &str) -> Result<Vec<T>, FeedError> {
    if data.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<T>>(data).map_err(|e| FeedError::Parse(e.to_string()))
    } else {
        serde_json::from_str::<T>(data)
            .map(|event| vec![event])
            .map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSFER_JSON: &str = r#"{"walletAddress":"w1","tokenAddress":"t1","amount":"5","signature":"Sig1","timestamp":"2026-08-27T12:00:00Z","side":"buy"}"#;
    const COORDINATED_JSON: &str = r#"{"tokenAddress":"Tok1","windowStart":"2026-08-27T12:00:00Z","windowEnd":"2026-08-27T12:05:00Z","triggeredAt":"2026-08-27T12:04:00Z","uniqueWallets":2,"walletAddresses":["w1","w2"]}"#;

    #[test]
    fn frames_assemble_across_chunk_boundaries() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"event: transf").is_empty());
        assert!(decoder.push(b"ers\ndata: [1,2]\n").is_empty());
        let frames = decoder.push(b"\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                event: Some("transfers".into()),
                data: "[1,2]".into()
            }]
        );
    }

    #[test]
    fn crlf_and_comment_lines_are_handled() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b": ping\r\ndata: {}\r\n\r\n");
        assert_eq!(
            frames,
            vec![SseFrame {
                event: None,
                data: "{}".into()
            }]
        );
    }

    #[test]
    fn multiline_data_joins_with_newline() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(b"data: {\ndata: }\n\n");
        assert_eq!(frames[0].data, "{\n}");
    }

    #[test]
    fn named_transfers_frame_decodes_array_in_order() {
        let frame = SseFrame {
            event: Some("transfers".into()),
            data: format!(
                "[{},{}]",
                TRANSFER_JSON,
                TRANSFER_JSON.replace("Sig1", "Sig2")
            ),
        };
        let decoded = decode_frame(&frame, StreamKind::Combined).unwrap();
        match decoded {
            DecodedFrame::Events(events) => {
                assert_eq!(events.len(), 2);
                match (&events[0], &events[1]) {
                    (FeedEvent::Transfer(a), FeedEvent::Transfer(b)) => {
                        assert_eq!(a.signature.as_deref(), Some("Sig1"));
                        assert_eq!(b.signature.as_deref(), Some("Sig2"));
                    }
                    _ => panic!("expected transfers"),
                }
            }
            _ => panic!("expected events"),
        }
    }

    #[test]
    fn named_coordinated_frame_decodes_single_object() {
        let frame = SseFrame {
            event: Some("coordinated".into()),
            data: COORDINATED_JSON.into(),
        };
        match decode_frame(&frame, StreamKind::Combined).unwrap() {
            DecodedFrame::Events(events) => {
                assert_eq!(events.len(), 1);
                assert!(matches!(events[0], FeedEvent::Coordinated(_)));
            }
            _ => panic!("expected events"),
        }
    }

    #[test]
    fn heartbeat_frames_decode_as_heartbeat() {
        let named = SseFrame {
            event: Some("heartbeat".into()),
            data: String::new(),
        };
        assert!(matches!(
            decode_frame(&named, StreamKind::Combined).unwrap(),
            DecodedFrame::Heartbeat
        ));
        let empty = SseFrame {
            event: None,
            data: "  ".into(),
        };
        assert!(matches!(
            decode_frame(&empty, StreamKind::Transfers).unwrap(),
            DecodedFrame::Heartbeat
        ));
    }

    #[test]
    fn unnamed_frame_uses_the_stream_kind() {
        let frame = SseFrame {
            event: None,
            data: TRANSFER_JSON.into(),
        };
        match decode_frame(&frame, StreamKind::Transfers).unwrap() {
            DecodedFrame::Events(events) => assert!(matches!(events[0], FeedEvent::Transfer(_))),
            _ => panic!("expected events"),
        }

        let frame = SseFrame {
            event: None,
            data: COORDINATED_JSON.into(),
        };
        match decode_frame(&frame, StreamKind::Coordinated).unwrap() {
            DecodedFrame::Events(events) => assert!(matches!(events[0], FeedEvent::Coordinated(_))),
            _ => panic!("expected events"),
        }
    }

    #[test]
    fn unnamed_frame_on_combined_falls_back_to_coordinated() {
        let frame = SseFrame {
            event: None,
            data: COORDINATED_JSON.into(),
        };
        match decode_frame(&frame, StreamKind::Combined).unwrap() {
            DecodedFrame::Events(events) => assert!(matches!(events[0], FeedEvent::Coordinated(_))),
            _ => panic!("expected events"),
        }
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let frame = SseFrame {
            event: None,
            data: "not json".into(),
        };
        assert!(decode_frame(&frame, StreamKind::Transfers).is_err());

        let frame = SseFrame {
            event: Some("transfers".into()),
            data: "[{\"broken\":".into(),
        };
        assert!(decode_frame(&frame, StreamKind::Combined).is_err());
    }
}
