use super::*;

#[test]
fn request_defaults_and_query() {
    let req = AnimationRequest::default();
    assert_eq!(req.animation_type, "pendulum");
    assert_eq!(req.frame_count, 20);
    assert!(req.is_known_type());

    let req = AnimationRequest::new("wave", 12, 2.5);
    assert_eq!(
        req.query_pairs(),
        [
            ("animation_type", "wave".to_string()),
            ("num_frames", "12".to_string()),
            ("speed", "2.5".to_string()),
        ]
    );
}

#[test]
fn request_validation() {
    assert!(AnimationRequest::new("orbit", 10, 1.0).validate().is_ok());
    assert!(AnimationRequest::new("", 10, 1.0).validate().is_err());
    assert!(AnimationRequest::new("orbit", 0, 1.0).validate().is_err());
    assert!(AnimationRequest::new("orbit", 10, f64::NAN).validate().is_err());
    assert!(!AnimationRequest::new("fractal", 10, 1.0).is_known_type());
    assert!(AnimationRequest::new("Spiral", 10, 1.0).is_known_type());
}

#[test]
fn success_response_parses() {
    let body = br#"{
        "frames": ["QUJD", "REVG"],
        "thumbnail": "QUJD",
        "title": "Pendulum",
        "description": "Simple pendulum"
    }"#;
    let resp = AnimationResponse::from_json(body).unwrap();
    assert!(resp.has_frames());
    assert!(!resp.is_error());
    assert_eq!(resp.display_title(), "Pendulum");
    assert_eq!(resp.frame_set().len(), 2);
}

#[test]
fn error_response_has_no_frames() {
    let body = br#"{"status": "error", "message": "No animation frames received"}"#;
    let resp = AnimationResponse::from_json(body).unwrap();
    assert!(resp.is_error());
    assert!(!resp.has_frames());
    assert!(resp.frame_set().is_empty());
    assert_eq!(resp.display_title(), "Animation");

    let resp = AnimationResponse::from_json(br#"{"frames": []}"#).unwrap();
    assert!(!resp.has_frames());
}

#[test]
fn malformed_response_is_serde_error() {
    let err = AnimationResponse::from_json(b"<html>").unwrap_err();
    assert!(matches!(err, FlipbookError::Serde(_)));
}

#[test]
fn static_source_answers_or_fails() {
    let ok = StaticSource::new(AnimationResponse::with_frames("T", vec!["QUJD".into()]));
    assert!(ok.fetch(&AnimationRequest::default()).unwrap().has_frames());

    let bad = StaticSource::failing("connection refused");
    let err = bad.fetch(&AnimationRequest::default()).unwrap_err();
    assert!(matches!(err, FlipbookError::Fetch(ref m) if m == "connection refused"));
}

#[test]
fn json_file_source_reads_saved_response() {
    let dir = std::path::PathBuf::from("target").join("unit_source");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("resp.json");
    let resp = AnimationResponse::with_frames("Wave", vec!["QUJD".into(), "REVG".into()]);
    std::fs::write(&path, serde_json::to_vec(&resp).unwrap()).unwrap();

    let src = JsonFileSource::new(&path);
    assert_eq!(src.fetch(&AnimationRequest::default()).unwrap(), resp);

    let missing = JsonFileSource::new(dir.join("missing.json"));
    assert!(matches!(
        missing.fetch(&AnimationRequest::default()),
        Err(FlipbookError::Other(_))
    ));
}
