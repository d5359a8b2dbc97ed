use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ReelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(ReelError::asset("x").to_string().contains("asset error:"));
    assert!(ReelError::render("x").to_string().contains("render error:"));
    assert!(
        ReelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk on fire");
    let err = ReelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk on fire"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: ReelError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, ReelError::Serde(_)));
}
