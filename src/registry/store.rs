//! Entity store - canonical student and club records.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// Caller-assigned student identifier.
pub type StudentId = u32;

/// System-assigned club identifier.
pub type ClubId = u32;

/// Student record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
}

impl Student {
    /// Create a new student record.
    pub fn new(id: StudentId, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Club record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
}

impl Club {
    pub fn new(id: ClubId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// Students keyed by id, clubs keyed by id, and the club-name index.
///
/// Students live in a `BTreeMap` so that enumeration (and therefore the
/// saved file and the tie order of the sorted listing) is deterministic.
/// `club_count` is positional: it counts clubs created or loaded, and is the
/// id the next `create_club` call hands out.
#[derive(Clone, Debug)]
pub struct EntityStore {
    students: BTreeMap<StudentId, Student>,
    clubs: BTreeMap<ClubId, Club>,
    club_names: HashMap<String, ClubId>,
    club_count: usize,
    max_clubs: usize,
}

impl EntityStore {
    /// Create an empty store that accepts up to `max_clubs` clubs.
    pub fn new(max_clubs: usize) -> Self {
        Self {
            students: BTreeMap::new(),
            clubs: BTreeMap::new(),
            club_names: HashMap::new(),
            club_count: 0,
            max_clubs,
        }
    }

    /// Insert or overwrite a student. Returns the previous record, if any.
    pub fn upsert_student(&mut self, student: Student) -> Option<Student> {
        self.students.insert(student.id, student)
    }

    /// Create a club with the next sequential id.
    pub fn create_club(&mut self, name: &str) -> Result<ClubId> {
        if self.club_count >= self.max_clubs {
            return Err(Error::CapacityExceeded(self.max_clubs));
        }

        let id = self.club_count as ClubId;
        if self.clubs.contains_key(&id) {
            // Only reachable after loading a file with non-sequential ids.
            return Err(Error::ClubIdInUse(id));
        }

        self.insert_club(Club::new(id, name));
        Ok(id)
    }

    /// Store a club whose id was read from a file. The id is trusted; the
    /// counter still advances by one, exactly as if the club were created.
    pub fn restore_club(&mut self, club: Club) -> Result<()> {
        if self.club_count >= self.max_clubs {
            return Err(Error::CapacityExceeded(self.max_clubs));
        }
        if self.clubs.contains_key(&club.id) {
            return Err(Error::ClubIdInUse(club.id));
        }

        self.insert_club(club);
        Ok(())
    }

    fn insert_club(&mut self, club: Club) {
        // Latest club wins the name; uniqueness is not enforced.
        self.club_names.insert(club.name.clone(), club.id);
        self.clubs.insert(club.id, club);
        self.club_count += 1;
    }

    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.get(&id)
    }

    pub fn contains_student(&self, id: StudentId) -> bool {
        self.students.contains_key(&id)
    }

    pub fn club(&self, id: ClubId) -> Option<&Club> {
        self.clubs.get(&id)
    }

    /// Resolve a club name to its id.
    pub fn club_id(&self, name: &str) -> Option<ClubId> {
        self.club_names.get(name).copied()
    }

    /// Students in ascending id order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.values()
    }

    /// Clubs in ascending id order.
    pub fn clubs(&self) -> impl Iterator<Item = &Club> {
        self.clubs.values()
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn club_count(&self) -> usize {
        self.club_count
    }

    pub fn max_clubs(&self) -> usize {
        self.max_clubs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_overwrites() {
        let mut store = EntityStore::new(10);
        assert!(store.upsert_student(Student::new(1, "Ann", "Lee")).is_none());

        let previous = store.upsert_student(Student::new(1, "Anne", "Leigh"));
        assert_eq!(previous, Some(Student::new(1, "Ann", "Lee")));
        assert_eq!(store.student(1).unwrap().last_name, "Leigh");
        assert_eq!(store.student_count(), 1);
    }

    #[test]
    fn test_create_club_sequential_ids() {
        let mut store = EntityStore::new(10);
        assert_eq!(store.create_club("Chess").unwrap(), 0);
        assert_eq!(store.create_club("Art").unwrap(), 1);
        assert_eq!(store.club_id("Art"), Some(1));
        assert_eq!(store.club_id("Drama"), None);
        assert_eq!(store.club_count(), 2);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut store = EntityStore::new(10);
        for i in 0..10 {
            store.create_club(&format!("club{}", i)).unwrap();
        }

        let err = store.create_club("one-too-many").unwrap_err();
        assert!(matches!(err, Error::CapacityExceeded(10)));
        assert_eq!(store.club_count(), 10);
        assert_eq!(store.club_id("one-too-many"), None);
    }

    #[test]
    fn test_duplicate_name_points_at_latest() {
        let mut store = EntityStore::new(10);
        store.create_club("Chess").unwrap();
        store.create_club("Chess").unwrap();
        assert_eq!(store.club_id("Chess"), Some(1));
        assert_eq!(store.clubs().count(), 2);
    }

    #[test]
    fn test_positional_counter_collision() {
        let mut store = EntityStore::new(10);
        store.restore_club(Club::new(1, "Art")).unwrap();

        // Counter is 1 after one restored club, and id 1 is taken.
        let err = store.create_club("Chess").unwrap_err();
        assert!(matches!(err, Error::ClubIdInUse(1)));
        assert_eq!(store.club_count(), 1);
    }

    #[test]
    fn test_restore_rejects_duplicate_id() {
        let mut store = EntityStore::new(10);
        store.restore_club(Club::new(0, "Art")).unwrap();
        assert!(matches!(
            store.restore_club(Club::new(0, "Chess")),
            Err(Error::ClubIdInUse(0))
        ));
    }
}
