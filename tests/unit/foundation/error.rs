use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KandinskyError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        KandinskyError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        KandinskyError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KandinskyError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde_variant() {
    let err: KandinskyError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, KandinskyError::Serde(_)));
}
