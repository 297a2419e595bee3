//! Fuzz target for user body validation.
//!
//! Feeds arbitrary JSON to both validators. Neither may panic, and anything
//! they accept must already be trimmed and non-empty.

#![no_main]

use libfuzzer_sys::fuzz_target;
use roster_users::{validate_create, validate_update, UserField};

fn assert_normalized(value: &str) {
    assert!(!value.is_empty());
    assert_eq!(value, value.trim());
}

fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    if let Ok(user) = validate_create(&body) {
        assert_normalized(&user.first_name);
        assert_normalized(&user.last_name);
        assert_normalized(&user.hobby);

        // Validating the normalized output must give the same output.
        let again = serde_json::to_value(&user).expect("serialize NewUser");
        assert_eq!(validate_create(&again).ok(), Some(user));
    }

    match validate_update(&body) {
        Ok(patch) => {
            assert!(!patch.is_empty());
            for value in [&patch.first_name, &patch.last_name, &patch.hobby]
                .into_iter()
                .flatten()
            {
                assert_normalized(value);
            }
        }
        Err(failure) => {
            let fields = failure.fields();
            assert!(fields.iter().all(|f| UserField::ALL.contains(f)));
        }
    }
});
