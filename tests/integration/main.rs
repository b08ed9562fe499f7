//! Integration tests driving the StudyHub controller end to end.

mod helpers;

mod cascade_test;
mod file_test;
mod hierarchy_test;
mod navigation_test;
mod schema_test;
