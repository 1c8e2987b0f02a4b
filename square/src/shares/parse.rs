use super::{Config, Error, Message, NamespacedShare};
use bytes::{Buf, BytesMut};
use prost::{decode_length_delimiter, length_delimiter_len};

/// Read the messages laid out in `shares` (as produced by
/// [super::MessageShareSplitter::export]).
///
/// Each message starts at the beginning of a share. A share whose payload begins with a zero
/// length is padding and is skipped (so an empty message is indistinguishable from padding).
pub fn parse_messages(cfg: &Config, shares: &[NamespacedShare]) -> Result<Vec<Message>, Error> {
    let capacity = cfg.payload_capacity();
    let mut messages = Vec::new();
    let mut cursor = 0;
    while cursor < shares.len() {
        let first = &shares[cursor];
        if first.data.len() != cfg.share_size {
            return Err(Error::InvalidShareSize(cfg.share_size, first.data.len()));
        }

        // Peek at the length prefix to learn how many shares the message spans
        let mut payload = first.payload();
        let len = decode_length_delimiter(&mut payload).map_err(|_| Error::InvalidVarint)?;
        if len == 0 {
            cursor += 1;
            continue;
        }
        let Some(total) = length_delimiter_len(len).checked_add(len) else {
            return Err(Error::InvalidVarint);
        };
        let needed = total.div_ceil(capacity);
        let available = shares.len() - cursor;
        if needed > available {
            return Err(Error::Truncated(total, available * capacity));
        }

        // Gather the payloads of every share the message spans
        let mut raw = BytesMut::with_capacity(needed * capacity);
        for share in &shares[cursor..cursor + needed] {
            if share.data.len() != cfg.share_size {
                return Err(Error::InvalidShareSize(cfg.share_size, share.data.len()));
            }
            if share.id != first.id {
                return Err(Error::NamespaceMismatch(first.id, share.id));
            }
            raw.extend_from_slice(share.payload());
        }
        let mut raw = raw.freeze();
        messages.push(Message::decode_delimited(first.id, &mut raw)?);
        debug_assert!(raw.remaining() < capacity);
        cursor += needed;
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crate::{
        namespace::NamespaceId,
        shares::{tail_padding_shares, MessageShareSplitter},
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    const NS_1: NamespaceId = NamespaceId::new([0, 0, 0, 0, 0, 0, 1, 1]);
    const NS_2: NamespaceId = NamespaceId::new([0, 0, 0, 0, 0, 0, 1, 2]);

    #[test]
    fn test_parse_roundtrip_with_padding() {
        let cfg = Config { share_size: 64 };
        let mut rng = StdRng::seed_from_u64(42);
        let mut splitter = MessageShareSplitter::new(cfg);
        let mut written = Vec::new();
        for i in 0..20 {
            let id = if i % 3 == 0 { NS_2 } else { NS_1 };
            let len = rng.gen_range(1..400);
            let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let msg = Message::new(id, data);
            splitter.write(&msg);
            splitter.write_namespaced_padded_shares(rng.gen_range(0..3));
            written.push(msg);
        }
        let mut shares = splitter.export();
        shares.extend(tail_padding_shares(&cfg, 5));

        // Export keeps write order within a namespace
        let (mut expected, rest): (Vec<_>, Vec<_>) =
            written.into_iter().partition(|m| m.namespace == NS_1);
        expected.extend(rest);

        let parsed = parse_messages(&cfg, &shares).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_empty() {
        let cfg = Config::default();
        assert!(parse_messages(&cfg, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_truncated() {
        let cfg = Config { share_size: 64 };
        let mut splitter = MessageShareSplitter::new(cfg);
        splitter.write(&Message::new(NS_1, vec![1u8; 200]));
        let shares = splitter.export();
        assert_eq!(shares.len(), 4);
        assert!(matches!(
            parse_messages(&cfg, &shares[..2]),
            Err(Error::Truncated(202, 112))
        ));
    }

    #[test]
    fn test_parse_oversized_length() {
        let cfg = Config { share_size: 64 };
        let mut data = NS_1.as_ref().to_vec();
        data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        data.resize(cfg.share_size, 0);
        let share = NamespacedShare {
            data: Bytes::from(data),
            id: NS_1,
        };
        assert_eq!(parse_messages(&cfg, &[share]), Err(Error::InvalidVarint));
    }

    #[test]
    fn test_parse_length_beyond_shares() {
        let cfg = Config { share_size: 64 };
        let mut data = NS_1.as_ref().to_vec();
        data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        data.resize(cfg.share_size, 0);
        let share = NamespacedShare {
            data: Bytes::from(data),
            id: NS_1,
        };
        assert!(matches!(
            parse_messages(&cfg, &[share]),
            Err(Error::Truncated(_, 56))
        ));
    }

    #[test]
    fn test_parse_namespace_mismatch() {
        let cfg = Config { share_size: 64 };
        let mut splitter = MessageShareSplitter::new(cfg);
        splitter.write(&Message::new(NS_1, vec![1u8; 100]));
        let mut shares = splitter.export();
        shares[1].id = NS_2;
        assert_eq!(
            parse_messages(&cfg, &shares),
            Err(Error::NamespaceMismatch(NS_1, NS_2))
        );
    }

    #[test]
    fn test_parse_invalid_share_size() {
        let cfg = Config { share_size: 64 };
        let mut splitter = MessageShareSplitter::new(cfg);
        splitter.write(&Message::new(NS_1, vec![1u8; 10]));
        let shares = splitter.export();
        let other = Config { share_size: 128 };
        assert_eq!(
            parse_messages(&other, &shares),
            Err(Error::InvalidShareSize(128, 64))
        );
    }
}
