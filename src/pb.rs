//! Wire Messages Module
//!
//! Protobuf envelope exchanged between peers. The messages are small enough
//! that hand-derived `prost` structs beat a build-script round trip.

/// Asks a peer for the value of `key` in `group`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Request {
    #[prost(string, tag = "1")]
    pub group: String,
    #[prost(string, tag = "2")]
    pub key: String,
}

/// Carries the value bytes back to the requester.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Response {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn test_request_round_trip() {
        let request = Request {
            group: String::from("scores"),
            key: String::from("alice"),
        };
        let decoded = Request::decode(request.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_response_round_trip() {
        let response = Response {
            value: vec![0, 1, 2, 255],
        };
        let decoded = Response::decode(response.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_empty_value_encodes_to_nothing() {
        // Default fields are omitted on the wire.
        let response = Response { value: Vec::new() };
        assert!(response.encode_to_vec().is_empty());
    }
}
