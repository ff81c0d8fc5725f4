//! Envelope interpretation against realistic backend bodies.

use tcm_api::{ApiError, Printing, SearchPage, interpret};

#[test]
fn autocomplete_body_decodes_into_printings() {
    let body = br#"{
        "success": true,
        "cached": false,
        "data": [
            {"id": "a1", "oracle_id": "o-bolt", "name": "Lightning Bolt", "set_code": "M10",
             "collector_number": "146", "rarity": "common"},
            {"id": "a2", "oracle_id": "o-bolt", "name": "Lightning Bolt", "set_code": "2XM"}
        ]
    }"#;

    let payload = interpret::<Vec<Printing>>(200, body).unwrap();
    assert!(!payload.cached);
    assert_eq!(payload.data.len(), 2);
    assert_eq!(payload.data[0].collector_number.as_deref(), Some("146"));
    assert_eq!(payload.data[1].set_code, "2XM");
}

#[test]
fn search_results_body_decodes_nested_pagination() {
    let body = br#"{
        "success": true,
        "cached": true,
        "data": {
            "pagination": {"current_page": 2, "per_page": 1, "total": 3, "total_pages": 3},
            "data": [{"oracle_id": "o1", "name": "Opt", "type_line": "Instant"}]
        }
    }"#;

    let payload = interpret::<SearchPage>(200, body).unwrap();
    assert!(payload.cached);
    assert_eq!(payload.data.pagination.current_page, 2);
    assert!(payload.data.pagination.has_next());
    assert_eq!(payload.data.data[0].type_line.as_deref(), Some("Instant"));
}

#[test]
fn search_results_with_list_instead_of_page_is_malformed() {
    let body = br#"{"success": true, "data": []}"#;
    let err = interpret::<SearchPage>(200, body).unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse(_)));
    assert!(!err.is_retryable());
}

#[test]
fn server_error_with_json_reason_keeps_reason() {
    let body = br#"{"success": false, "error": "Search index is rebuilding"}"#;
    let err = interpret::<Vec<Printing>>(503, body).unwrap_err();
    assert_eq!(err.user_message(), "Search index is rebuilding");
    assert!(err.is_retryable());
}

#[test]
fn nested_error_object_message_is_used() {
    let body = br#"{"success": false, "error": {"code": 42, "message": "Term too short"}}"#;
    let err = interpret::<Vec<Printing>>(200, body).unwrap_err();
    assert_eq!(err, ApiError::Application("Term too short".to_string()));
}
