//! Verify header parsing and the dispatch pipeline against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Dispatch vectors describe a default config, a call, the request that must
//! reach the transport, a simulated raw response and the expected outcome.
//! They are driven through `Client::prepare` and `complete`, so no network is
//! involved.

use courier_core::{parse_header_blob, CallOptions, Client, DefaultConfig, Error, HttpMethod, RawResponse, UreqTransport};

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Header blobs
// ---------------------------------------------------------------------------

#[test]
fn header_test_vectors() {
    let raw = include_str!("../../test-vectors/headers.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let parsed = parse_header_blob(case["raw"].as_str().unwrap());
        let expected = case["expected"].as_object().unwrap();

        assert_eq!(parsed.len(), expected.len(), "{name}: header count");
        for (header, value) in expected {
            let got = parsed.get(header).unwrap_or_else(|| panic!("{name}: missing {header}"));
            assert_eq!(got.as_deref(), value.as_str(), "{name}: value of {header}");
            if let Some(got) = got {
                assert!(!got.contains('\r'), "{name}: carriage return in {header}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn dispatch_test_vectors() {
    let raw = include_str!("../../test-vectors/dispatch.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let config = DefaultConfig::from_json(&case["config"]).unwrap();
        let client = Client::new(UreqTransport::new(), config);

        let call = &case["call"];
        let mut options = CallOptions::new(call["url"].as_str().unwrap());
        if let Some(header) = call.get("header").and_then(|h| h.as_object()) {
            for (k, v) in header {
                options = options.header(k.as_str(), v.as_str().unwrap());
            }
        }
        if let Some(body) = call.get("body").and_then(|b| b.as_str()) {
            options = options.body(body);
        }

        // Verify prepare
        let method = parse_method(case["method"].as_str().unwrap());
        let (request, snapshot) = client.prepare(method, options).unwrap();
        let expected_req = &case["expected_request"];
        assert_eq!(request.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(request.url, expected_req["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(request.headers, string_pairs(&expected_req["headers"]), "{name}: headers");
        assert_eq!(request.body.as_deref(), expected_req["body"].as_str(), "{name}: body");

        // Verify complete
        let sim = &case["simulated_response"];
        let raw = RawResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: sim["headers"].as_str().unwrap().to_string(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = courier_core::complete(raw, &snapshot);
        let expected_data = case.get("expected_data");

        match case["expected_outcome"].as_str().unwrap() {
            "resolved" => {
                let response = result.unwrap_or_else(|e| panic!("{name}: expected resolved, got {e}"));
                match expected_data {
                    Some(data) => assert_eq!(&response.unwrap().data, data, "{name}: data"),
                    None => assert!(response.is_none(), "{name}: expected no response"),
                }
            }
            "rejected" => match result {
                Err(Error::Rejected { response, .. }) => match expected_data {
                    Some(data) => assert_eq!(&response.unwrap().data, data, "{name}: data"),
                    None => assert!(response.is_none(), "{name}: expected no response"),
                },
                other => panic!("{name}: expected rejection, got {other:?}"),
            },
            "parse_error" => {
                assert!(matches!(result, Err(Error::Parse { .. })), "{name}: expected parse error");
            }
            other => panic!("{name}: unknown expected_outcome: {other}"),
        }
    }
}
