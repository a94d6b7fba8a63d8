//! Internal (non-wire-observable) serialization for `Source` and `Posting`
//! values, plus the textual-JSON serialization the `collections` bucket
//! requires for cross-version portability (docs/ARCHITECTURE.md §6.2).

use bincode::config::standard;
use storage::StorageError;

use crate::model::{Metadata, Posting, Source};

pub fn encode_source(source: &Source) -> Result<Vec<u8>, StorageError> {
    bincode::serde::encode_to_vec(source, standard()).map_err(|e| StorageError::Encode(e.to_string()))
}

pub fn decode_source(bytes: &[u8]) -> Result<Source, StorageError> {
    bincode::serde::decode_from_slice(bytes, standard())
        .map(|(value, _)| value)
        .map_err(|e| StorageError::Decode(e.to_string()))
}

pub fn encode_posting(posting: &Posting) -> Result<Vec<u8>, StorageError> {
    bincode::serde::encode_to_vec(posting, standard()).map_err(|e| StorageError::Encode(e.to_string()))
}

pub fn decode_posting(bytes: &[u8]) -> Result<Posting, StorageError> {
    bincode::serde::decode_from_slice(bytes, standard())
        .map(|(value, _)| value)
        .map_err(|e| StorageError::Decode(e.to_string()))
}

pub fn encode_metadata(metadata: &Metadata) -> Result<Vec<u8>, StorageError> {
    serde_json::to_vec(metadata).map_err(|e| StorageError::Encode(e.to_string()))
}

pub fn decode_metadata(bytes: &[u8]) -> Result<Metadata, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Url;
    use chrono::DateTime;

    #[test]
    fn source_round_trips() {
        let source = Source {
            date: DateTime::parse_from_rfc3339("2026-07-28T10:00:00.123456789+05:30").unwrap(),
            title: "hello".to_string(),
        };
        let encoded = encode_source(&source).unwrap();
        let decoded = decode_source(&encoded).unwrap();
        assert_eq!(decoded, source);
    }

    #[test]
    fn posting_round_trips() {
        let posting = Posting {
            url: Url::from("u1"),
            pos: vec![0, 3, 7],
        };
        let encoded = encode_posting(&posting).unwrap();
        let decoded = decode_posting(&encoded).unwrap();
        assert_eq!(decoded, posting);
    }

    #[test]
    fn metadata_is_textual_json() {
        let metadata = Metadata {
            tokenizer: "text".to_string(),
            col_filters: vec!["stopwords".to_string(), "stemm_lower".to_string()],
        };
        let encoded = encode_metadata(&metadata).unwrap();
        assert_eq!(
            String::from_utf8(encoded.clone()).unwrap(),
            r#"{"tokenizer":"text","col_filters":["stopwords","stemm_lower"]}"#
        );
        assert_eq!(decode_metadata(&encoded).unwrap(), metadata);
    }
}
