//! Namespaced messages and their length-delimited encoding.

use crate::namespace::NamespaceId;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::{decode_length_delimiter, encode_length_delimiter, length_delimiter_len};

use super::Error;

/// Arbitrary data submitted under a namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Namespace the message is submitted under.
    pub namespace: NamespaceId,
    /// Raw message bytes (without the length prefix).
    pub data: Bytes,
}

impl Message {
    /// Create a new [Message].
    pub fn new(namespace: NamespaceId, data: impl Into<Bytes>) -> Self {
        Self {
            namespace,
            data: data.into(),
        }
    }

    /// Returns the length of the delimited encoding of the message.
    pub fn encoded_len(&self) -> usize {
        length_delimiter_len(self.data.len()) + self.data.len()
    }

    /// Encode the message data prefixed by a varint of its length.
    ///
    /// The namespace is not part of the encoding (it is carried by every share instead).
    pub fn encode_delimited(&self) -> Result<Bytes, prost::EncodeError> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        encode_length_delimiter(self.data.len(), &mut buf)?;
        buf.put_slice(&self.data);
        Ok(buf.freeze())
    }

    /// Decode a message from its delimited encoding, consuming exactly the bytes that
    /// belong to it.
    pub fn decode_delimited(namespace: NamespaceId, buf: &mut impl Buf) -> Result<Self, Error> {
        let len = decode_length_delimiter(&mut *buf).map_err(|_| Error::InvalidVarint)?;
        if buf.remaining() < len {
            return Err(Error::Truncated(len, buf.remaining()));
        }
        Ok(Self {
            namespace,
            data: buf.copy_to_bytes(len),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMESPACE: NamespaceId = NamespaceId::new([1, 1, 1, 1, 1, 1, 1, 1]);

    #[test]
    fn test_message_encode_delimited() {
        let msg = Message::new(NAMESPACE, vec![9u8; 200]);
        let encoded = msg.encode_delimited().unwrap();
        assert_eq!(encoded.len(), msg.encoded_len());
        assert_eq!(encoded.len(), 202);
        // 200 = 0b1_1001000 as a little-endian base-128 varint
        assert_eq!(&encoded[..2], &[0xC8, 0x01]);
        assert_eq!(&encoded[2..], &msg.data[..]);
    }

    #[test]
    fn test_message_empty() {
        let msg = Message::new(NAMESPACE, Bytes::new());
        let encoded = msg.encode_delimited().unwrap();
        assert_eq!(&encoded[..], &[0]);
    }

    #[test]
    fn test_message_decode_delimited() {
        let msg = Message::new(NAMESPACE, b"hello world".to_vec());
        let mut encoded = msg.encode_delimited().unwrap().to_vec();
        encoded.extend_from_slice(&[0, 0, 0]);
        let mut buf = Bytes::from(encoded);
        let decoded = Message::decode_delimited(NAMESPACE, &mut buf).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(buf.remaining(), 3);
    }

    #[test]
    fn test_message_decode_truncated() {
        let msg = Message::new(NAMESPACE, vec![1u8; 10]);
        let encoded = msg.encode_delimited().unwrap();
        let mut buf = encoded.slice(..5);
        assert!(matches!(
            Message::decode_delimited(NAMESPACE, &mut buf),
            Err(Error::Truncated(10, 4))
        ));
    }

    #[test]
    fn test_message_decode_invalid_varint() {
        let mut buf = Bytes::from_static(&[0xFF; 11]);
        assert!(matches!(
            Message::decode_delimited(NAMESPACE, &mut buf),
            Err(Error::InvalidVarint)
        ));
    }
}
