//! Membership index - the student/club relation kept as two views.

use std::collections::{HashMap, VecDeque};

use super::store::{ClubId, StudentId};

/// Both views of the many-to-many relation.
///
/// Every mutation touches both maps before returning, so a pair present in
/// `members` is always present in `clubs_of` and vice versa. Ids only; names
/// are resolved through the entity store.
#[derive(Clone, Debug, Default)]
pub struct MembershipIndex {
    /// Club -> members, most recently added first.
    members: HashMap<ClubId, VecDeque<StudentId>>,
    /// Student -> clubs, in insertion order.
    clubs_of: HashMap<StudentId, Vec<ClubId>>,
}

impl MembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a student has a (possibly empty) club list. An existing
    /// list is left alone.
    pub fn register_student(&mut self, student: StudentId) {
        self.clubs_of.entry(student).or_default();
    }

    /// Record a membership added through the API: the student goes to the
    /// head of the club's list.
    pub fn link(&mut self, club: ClubId, student: StudentId) {
        self.members.entry(club).or_default().push_front(student);
        self.clubs_of.entry(student).or_default().push(club);
    }

    /// Record a membership read back from a file: the student goes to the
    /// tail, so a list written head-to-tail is rebuilt in the same order.
    pub fn restore(&mut self, club: ClubId, student: StudentId) {
        self.members.entry(club).or_default().push_back(student);
        self.clubs_of.entry(student).or_default().push(club);
    }

    /// Members of a club in list order. Unknown clubs yield nothing.
    pub fn members(&self, club: ClubId) -> impl Iterator<Item = StudentId> + '_ {
        self.members.get(&club).into_iter().flatten().copied()
    }

    /// Clubs a student belongs to, or `None` if the student was never
    /// registered.
    pub fn clubs_of(&self, student: StudentId) -> Option<&[ClubId]> {
        self.clubs_of.get(&student).map(Vec::as_slice)
    }

    /// Total number of (club, student) entries, duplicates included.
    pub fn len(&self) -> usize {
        self.members.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every pair as seen from the club view, sorted.
    pub fn pairs_by_club(&self) -> Vec<(StudentId, ClubId)> {
        let mut pairs: Vec<_> = self
            .members
            .iter()
            .flat_map(|(club, students)| students.iter().map(move |s| (*s, *club)))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Every pair as seen from the student view, sorted.
    pub fn pairs_by_student(&self) -> Vec<(StudentId, ClubId)> {
        let mut pairs: Vec<_> = self
            .clubs_of
            .iter()
            .flat_map(|(student, clubs)| clubs.iter().map(move |c| (*student, *c)))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}
