//! Integration tests for yamirror-disk
//!
//! Uses wiremock to simulate the Yandex Disk API and verifies end-to-end
//! behavior of the listing call, the two-step upload flow, and deletes.

mod common;

mod test_listing;
mod test_transfer;
