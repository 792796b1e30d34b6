//! Alphabetical student listing.

use super::store::Student;

/// Order students by last name. The sort is stable, so students sharing a
/// last name keep the order they were given in.
pub fn sort_by_last_name(students: &mut [&Student]) {
    students.sort_by(|a, b| a.last_name.cmp(&b.last_name));
}
