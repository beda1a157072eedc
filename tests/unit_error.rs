use taskflow::error::{exit_codes, Error};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::TodoNotFound(3);
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let storage = Error::StorageWrite {
        key: "TaskFlow_todos".to_string(),
        reason: "quota exceeded".to_string(),
    };
    assert_eq!(storage.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn storage_kinds_are_distinguishable() {
    let read = Error::StorageRead {
        key: "k".to_string(),
        reason: "bad json".to_string(),
    };
    let write = Error::StorageWrite {
        key: "k".to_string(),
        reason: "denied".to_string(),
    };

    assert_eq!(read.exit_code(), exit_codes::OPERATION_FAILED);
    assert_eq!(Error::DuplicateId(1).exit_code(), exit_codes::USER_ERROR);
    assert!(read.to_string().starts_with("Unable to fetch todos"));
    assert!(write.to_string().starts_with("Unable to save todos"));
}
