//! Shared fixtures for the integration suites.

use studyhall::Store;
use studyhall::auth::NewUser;

/// Registration input for a student in secondary/year-2.
#[allow(dead_code)]
pub fn new_student(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "password1".to_string(),
        confirm: "password1".to_string(),
        stage: Some("secondary".to_string()),
        grade: Some("year-2".to_string()),
        school: None,
    }
}

/// In-memory store with three registered students; returns their ids.
#[allow(dead_code)]
pub fn seeded_store() -> (Store, String, String, String) {
    let store = Store::in_memory();
    let a = store
        .register(new_student("Alice", "a@x.com"))
        .expect("register a")
        .id;
    let b = store
        .register(new_student("Bilal", "b@x.com"))
        .expect("register b")
        .id;
    let c = store
        .register(new_student("Chen", "c@x.com"))
        .expect("register c")
        .id;
    (store, a, b, c)
}
