use crate::endpoint::Endpoint;
use crate::error::DirectoryError;

/// Map a raw HTTP response for `endpoint` to the listed names.
pub fn decode_response(
    endpoint: &Endpoint,
    status: u16,
    body: &str,
) -> Result<Vec<String>, DirectoryError> {
    match status {
        200..=299 => serde_json::from_str(body).map_err(|e| DirectoryError::Decode(e.to_string())),
        404 => Err(DirectoryError::NotFound {
            path: endpoint.path(),
        }),
        500.. => Err(DirectoryError::Server { status }),
        _ => Err(DirectoryError::UnexpectedStatus { status }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::decode_response;
    use crate::endpoint::Endpoint;
    use crate::error::DirectoryError;

    #[test]
    fn ok_body_is_a_list_of_names() {
        let names = decode_response(&Endpoint::States, 200, r#"["Goa", "Kerala"]"#).unwrap();
        assert_eq!(names, vec!["Goa".to_string(), "Kerala".to_string()]);
    }

    #[test]
    fn statuses_map_to_distinct_errors() {
        let ep = Endpoint::Districts {
            state: "Atlantis".into(),
        };
        assert_eq!(
            decode_response(&ep, 404, "{}"),
            Err(DirectoryError::NotFound {
                path: "/api/districts/Atlantis".into()
            })
        );
        assert_eq!(
            decode_response(&ep, 503, ""),
            Err(DirectoryError::Server { status: 503 })
        );
        assert_eq!(
            decode_response(&ep, 401, ""),
            Err(DirectoryError::UnexpectedStatus { status: 401 })
        );
    }

    #[test]
    fn non_list_body_is_a_decode_error() {
        let err = decode_response(&Endpoint::States, 200, r#"{"error": "x"}"#).unwrap_err();
        assert!(matches!(err, DirectoryError::Decode(_)));
    }
}
