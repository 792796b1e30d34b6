//! Registry - students, clubs, and the membership relation between them.

pub mod listing;
pub mod membership;
pub mod store;

pub use membership::MembershipIndex;
pub use store::{Club, ClubId, EntityStore, Student, StudentId};

use crate::config::Settings;
use crate::error::{Error, Result};

/// Owned registry state. All operations go through this facade, which checks
/// references before touching the membership index.
#[derive(Clone, Debug)]
pub struct Registry {
    store: EntityStore,
    memberships: MembershipIndex,
}

impl Registry {
    /// Create an empty registry.
    pub fn new(max_clubs: usize) -> Self {
        Self {
            store: EntityStore::new(max_clubs),
            memberships: MembershipIndex::new(),
        }
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self::new(settings.max_clubs)
    }

    /// Add a student, overwriting any student with the same id. Existing
    /// memberships of that id are kept.
    pub fn add_student(&mut self, id: StudentId, first_name: &str, last_name: &str) {
        let previous = self
            .store
            .upsert_student(Student::new(id, first_name, last_name));
        self.memberships.register_student(id);

        match previous {
            Some(old) => tracing::debug!("Overwrote student {} ({} -> {} {})", id, old, first_name, last_name),
            None => tracing::debug!("Added student {}: {} {}", id, first_name, last_name),
        }
    }

    /// Create a club and return its id.
    pub fn create_club(&mut self, name: &str) -> Result<ClubId> {
        let id = self.store.create_club(name)?;
        tracing::debug!("Created club {}: {}", id, name);
        Ok(id)
    }

    /// Add a student to a club. Both references are checked before either
    /// view is touched.
    pub fn add_membership(&mut self, club_name: &str, student_id: StudentId) -> Result<()> {
        let club_id = self
            .store
            .club_id(club_name)
            .ok_or_else(|| Error::ClubNotFound(club_name.to_string()))?;

        if !self.store.contains_student(student_id) {
            return Err(Error::StudentNotFound(student_id));
        }

        self.memberships.link(club_id, student_id);
        tracing::debug!("Added student {} to club {} ({})", student_id, club_id, club_name);
        Ok(())
    }

    /// Members of a club, most recently added first.
    pub fn members_of(&self, club_name: &str) -> Result<Vec<&Student>> {
        let club_id = self
            .store
            .club_id(club_name)
            .ok_or_else(|| Error::ClubNotFound(club_name.to_string()))?;

        Ok(self.members_by_id(club_id).collect())
    }

    /// Members of a club by id. Used by the codec, which walks clubs by id.
    pub fn members_by_id(&self, club_id: ClubId) -> impl Iterator<Item = &Student> + '_ {
        self.memberships
            .members(club_id)
            .filter_map(|id| self.store.student(id))
    }

    /// Clubs a student belongs to, in the order they were joined. A student
    /// with no clubs yields an empty list, not an error.
    pub fn clubs_of(&self, student_id: StudentId) -> Result<Vec<&Club>> {
        if !self.store.contains_student(student_id) {
            return Err(Error::StudentNotFound(student_id));
        }

        let clubs = self
            .memberships
            .clubs_of(student_id)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.store.club(*id))
            .collect();
        Ok(clubs)
    }

    /// Every student, sorted by last name.
    pub fn students_by_last_name(&self) -> Vec<&Student> {
        let mut students: Vec<&Student> = self.store.students().collect();
        listing::sort_by_last_name(&mut students);
        students
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn memberships(&self) -> &MembershipIndex {
        &self.memberships
    }

    /// Swap in a freshly loaded registry wholesale.
    pub fn replace(&mut self, other: Registry) {
        *self = other;
    }

    // Load path. These trust ids that the codec has already resolved.

    pub(crate) fn restore_student(&mut self, student: Student) {
        let id = student.id;
        self.store.upsert_student(student);
        self.memberships.register_student(id);
    }

    pub(crate) fn restore_club(&mut self, club: Club) -> Result<()> {
        self.store.restore_club(club)
    }

    pub(crate) fn restore_membership(&mut self, club_id: ClubId, student_id: StudentId) {
        self.memberships.restore(club_id, student_id);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_CLUBS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(students: &[&Student]) -> Vec<StudentId> {
        students.iter().map(|s| s.id).collect()
    }

    fn sample() -> Registry {
        let mut registry = Registry::default();
        registry.add_student(1, "Ann", "Lee");
        registry.add_student(2, "Bo", "Kim");
        registry.add_student(3, "Cy", "Ito");
        registry.create_club("Chess").unwrap();
        registry.create_club("Art").unwrap();
        registry
    }

    #[test]
    fn test_members_most_recent_first() {
        let mut registry = sample();
        registry.add_membership("Chess", 1).unwrap();
        registry.add_membership("Chess", 2).unwrap();
        registry.add_membership("Chess", 3).unwrap();

        assert_eq!(ids(&registry.members_of("Chess").unwrap()), vec![3, 2, 1]);
    }

    #[test]
    fn test_clubs_in_join_order() {
        let mut registry = sample();
        registry.add_membership("Art", 1).unwrap();
        registry.add_membership("Chess", 1).unwrap();

        let names: Vec<_> = registry
            .clubs_of(1)
            .unwrap()
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Art", "Chess"]);
    }

    #[test]
    fn test_clubs_of_empty_vs_unknown() {
        let registry = sample();
        assert!(registry.clubs_of(2).unwrap().is_empty());
        assert!(matches!(registry.clubs_of(99), Err(Error::StudentNotFound(99))));
    }

    #[test]
    fn test_add_membership_rejects_unknown_refs() {
        let mut registry = sample();

        let err = registry.add_membership("Drama", 1).unwrap_err();
        assert!(matches!(err, Error::ClubNotFound(ref name) if name == "Drama"));

        let err = registry.add_membership("Chess", 42).unwrap_err();
        assert!(matches!(err, Error::StudentNotFound(42)));

        assert!(registry.memberships().is_empty());
    }

    #[test]
    fn test_club_not_found_checked_first() {
        let mut registry = sample();
        let err = registry.add_membership("Drama", 42).unwrap_err();
        assert!(matches!(err, Error::ClubNotFound(_)));
    }

    #[test]
    fn test_members_of_unknown_club() {
        let registry = sample();
        assert!(matches!(registry.members_of("Drama"), Err(Error::ClubNotFound(_))));
    }

    #[test]
    fn test_views_never_diverge() {
        let mut registry = sample();
        let ops = [
            ("Chess", 1),
            ("Art", 2),
            ("Chess", 3),
            ("Art", 1),
            ("Chess", 1),
            ("Art", 3),
        ];
        for (club, student) in ops {
            registry.add_membership(club, student).unwrap();
            assert_eq!(
                registry.memberships().pairs_by_club(),
                registry.memberships().pairs_by_student()
            );
        }

        for (club, student) in ops {
            assert!(ids(&registry.members_of(club).unwrap()).contains(&student));
            assert!(registry
                .clubs_of(student)
                .unwrap()
                .iter()
                .any(|c| c.name == club));
        }
    }

    #[test]
    fn test_failed_membership_leaves_views_untouched() {
        let mut registry = sample();
        registry.add_membership("Chess", 1).unwrap();
        let before = registry.memberships().pairs_by_club();

        let _ = registry.add_membership("Chess", 77);
        let _ = registry.add_membership("Nope", 1);

        assert_eq!(registry.memberships().pairs_by_club(), before);
        assert_eq!(registry.memberships().pairs_by_student(), before);
    }

    #[test]
    fn test_readd_student_keeps_memberships_and_renames() {
        let mut registry = sample();
        registry.add_membership("Chess", 1).unwrap();
        registry.add_student(1, "Anne", "Leigh");

        assert_eq!(registry.clubs_of(1).unwrap().len(), 1);
        let members = registry.members_of("Chess").unwrap();
        assert_eq!(members[0].last_name, "Leigh");
    }

    #[test]
    fn test_eleventh_club_rejected() {
        let mut registry = Registry::new(10);
        for i in 0..10 {
            registry.create_club(&format!("club{}", i)).unwrap();
        }
        assert!(matches!(
            registry.create_club("extra"),
            Err(Error::CapacityExceeded(10))
        ));
        assert_eq!(registry.store().club_count(), 10);
    }

    #[test]
    fn test_students_by_last_name() {
        let mut registry = Registry::default();
        registry.add_student(3, "Zoe", "Adams");
        registry.add_student(1, "Al", "Zinn");

        let sorted = registry.students_by_last_name();
        assert_eq!(sorted[0], &Student::new(3, "Zoe", "Adams"));
        assert_eq!(sorted[1], &Student::new(1, "Al", "Zinn"));
    }
}
