//! End-to-end API tests over in-memory session and user back ends.
//!
//! Entity endpoints run against a lazy pool that never connects, so these
//! tests cover everything the API decides before touching the database.

mod helpers;

mod auth_test;
mod permission_test;
mod session_test;
