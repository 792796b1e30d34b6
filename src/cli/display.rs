//! Plain-text rendering shared by the menu and the one-shot commands.

use std::io::{self, Write};

use crate::registry::{Club, Registry, Student};

pub fn write_members<W: Write>(out: &mut W, club: &str, members: &[&Student]) -> io::Result<()> {
    writeln!(out, "Students in club \"{}\":", club)?;
    for student in members {
        writeln!(out, "ID: {}, Name: {}", student.id, student)?;
    }
    writeln!(out)
}

pub fn write_clubs<W: Write>(out: &mut W, student: &Student, clubs: &[&Club]) -> io::Result<()> {
    writeln!(out, "Student {} ({}) is in clubs:", student.id, student)?;
    if clubs.is_empty() {
        return writeln!(out, "No clubs.");
    }
    for club in clubs {
        writeln!(out, "{}", club.name)?;
    }
    writeln!(out)
}

pub fn write_sorted<W: Write>(out: &mut W, students: &[&Student]) -> io::Result<()> {
    writeln!(out, "Students sorted by last name:")?;
    for student in students {
        writeln!(out, "{}: {}", student.id, student)?;
    }
    Ok(())
}

/// Full dump: sorted students, then each club with its members.
pub fn write_registry<W: Write>(out: &mut W, registry: &Registry) -> io::Result<()> {
    write_sorted(out, &registry.students_by_last_name())?;
    writeln!(out)?;
    writeln!(out, "Clubs ({}/{}):", registry.store().club_count(), registry.store().max_clubs())?;
    for club in registry.store().clubs() {
        let members: Vec<&Student> = registry.members_by_id(club.id).collect();
        let noun = if members.len() == 1 { "member" } else { "members" };
        writeln!(out, "  {} {} ({} {})", club.id, club.name, members.len(), noun)?;
        for student in members {
            writeln!(out, "    ID: {}, Name: {}", student.id, student)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_clubs_empty_message() {
        let student = Student::new(4, "Di", "Ng");
        let text = render(|out| write_clubs(out, &student, &[]));
        assert_eq!(text, "Student 4 (Di Ng) is in clubs:\nNo clubs.\n");
    }

    #[test]
    fn test_registry_dump() {
        let mut registry = Registry::default();
        registry.add_student(1, "Al", "Zinn");
        registry.add_student(3, "Zoe", "Adams");
        registry.create_club("Chess").unwrap();
        registry.add_membership("Chess", 1).unwrap();

        let text = render(|out| write_registry(out, &registry));
        assert_eq!(
            text,
            "Students sorted by last name:\n\
             3: Zoe Adams\n\
             1: Al Zinn\n\
             \n\
             Clubs (1/10):\n  \
             0 Chess (1 member)\n    \
             ID: 1, Name: Al Zinn\n"
        );
    }
}
