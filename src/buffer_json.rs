use std::fmt;
use std::ops::Deref;

use base64::prelude::*;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A binary buffer that survives a JSON round trip byte-for-byte.
///
/// Plain JSON has no binary type, so stored values carry buffers as a tagged
/// object:
///
/// ```json
/// { "type": "Buffer", "data": "<base64>" }
/// ```
///
/// The decoder also accepts `data` as an array of byte values, which older
/// encoders of the same record format produced.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

#[derive(Serialize)]
struct TaggedBuffer<'a> {
    r#type: &'static str,
    data: &'a str,
}

#[derive(Deserialize)]
struct TaggedBufferOwned {
    r#type: String,
    data: BufferData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BufferData {
    Base64(String),
    Raw(Vec<u8>),
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedBuffer {
            r#type: "Buffer",
            data: &BASE64_STANDARD.encode(&self.0),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tagged = TaggedBufferOwned::deserialize(deserializer)?;
        if tagged.r#type != "Buffer" {
            return Err(D::Error::custom(format!(
                "expected buffer tag `Buffer`, found `{}`",
                tagged.r#type
            )));
        }
        match tagged.data {
            BufferData::Base64(encoded) => BASE64_STANDARD
                .decode(encoded)
                .map(Bytes)
                .map_err(D::Error::custom),
            BufferData::Raw(bytes) => Ok(Bytes(bytes)),
        }
    }
}

// Key material routinely ends up in Debug output of the records holding it, so
// print only the length.
impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes({} bytes)", self.0.len())
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        label: String,
        payload: Bytes,
    }

    #[test]
    fn round_trips_byte_for_byte() {
        let record = Record {
            label: "identity".into(),
            payload: Bytes(vec![0, 1, 2, 254, 255]),
        };
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: Record = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn encodes_as_tagged_base64_object() {
        let value = serde_json::to_value(Bytes(vec![104, 105])).unwrap();
        assert_eq!(value, json!({ "type": "Buffer", "data": "aGk=" }));
    }

    #[test]
    fn accepts_legacy_byte_array_data() {
        let decoded: Bytes =
            serde_json::from_value(json!({ "type": "Buffer", "data": [104, 105] })).unwrap();
        assert_eq!(&*decoded, b"hi");
    }

    #[test]
    fn rejects_unknown_tag() {
        let result: Result<Bytes, _> =
            serde_json::from_value(json!({ "type": "Blob", "data": "aGk=" }));
        assert!(result.is_err());
    }
}
