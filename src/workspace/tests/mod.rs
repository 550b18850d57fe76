//! Unit tests for the workspace context.

mod blocker_tests;
mod json_store_tests;
mod template_tests;
