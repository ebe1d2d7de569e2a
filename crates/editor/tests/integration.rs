#![allow(unused_crate_dependencies)]

#[path = "integration/common.rs"]
mod common;
#[path = "integration/find.rs"]
mod find;
#[path = "integration/history.rs"]
mod history;
#[path = "integration/syllabification.rs"]
mod syllabification;
