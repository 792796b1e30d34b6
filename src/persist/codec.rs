//! Section-delimited text format for registry snapshots.
//!
//! ```text
//! [STUDENTS]
//! 1 Ann Lee
//! 2 Bo Kim
//! [CLUBS]
//! 0 Art
//! [MEMBERSHIPS]
//! 0: 2 1 -1
//! ```
//!
//! Fields are separated by single spaces and there is no escaping, so names
//! must be non-empty and free of whitespace. Membership lines list a club's
//! members head-to-tail and end with the `-1` sentinel.

use std::collections::HashSet;
use std::io::{BufRead, Write};

use crate::config::OrphanPolicy;
use crate::error::{Error, Result};
use crate::registry::{Club, ClubId, Registry, Student, StudentId};

pub const STUDENTS_HEADER: &str = "[STUDENTS]";
pub const CLUBS_HEADER: &str = "[CLUBS]";
pub const MEMBERSHIPS_HEADER: &str = "[MEMBERSHIPS]";

/// Terminates every membership line.
pub const END_OF_MEMBERS: &str = "-1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Students,
    Clubs,
    Memberships,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            STUDENTS_HEADER => Some(Section::Students),
            CLUBS_HEADER => Some(Section::Clubs),
            MEMBERSHIPS_HEADER => Some(Section::Memberships),
            _ => None,
        }
    }

    fn header(self) -> &'static str {
        match self {
            Section::Students => STUDENTS_HEADER,
            Section::Clubs => CLUBS_HEADER,
            Section::Memberships => MEMBERSHIPS_HEADER,
        }
    }

    /// The section that must follow `current`.
    fn after(current: Option<Section>) -> Option<Section> {
        match current {
            None => Some(Section::Students),
            Some(Section::Students) => Some(Section::Clubs),
            Some(Section::Clubs) => Some(Section::Memberships),
            Some(Section::Memberships) => None,
        }
    }
}

/// Counts from a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub students: usize,
    pub clubs: usize,
    pub memberships: usize,
    /// Student references dropped under [`OrphanPolicy::Skip`]. A dropped
    /// line for an undeclared club counts each student it listed.
    pub skipped: usize,
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            plural(self.students, "student"),
            plural(self.clubs, "club"),
            plural(self.memberships, "membership")
        )?;
        if self.skipped > 0 {
            write!(f, " ({} skipped)", self.skipped)?;
        }
        Ok(())
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn malformed(line_no: usize, message: impl std::fmt::Display) -> Error {
    Error::MalformedFile(format!("line {}: {}", line_no, message))
}

/// Check that every name survives a write/read cycle.
pub fn check_encodable(registry: &Registry) -> Result<()> {
    let store = registry.store();
    let student_names = store
        .students()
        .flat_map(|s| [s.first_name.as_str(), s.last_name.as_str()]);
    let club_names = store.clubs().map(|c| c.name.as_str());

    for name in student_names.chain(club_names) {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(Error::InvalidName(name.to_string()));
        }
    }
    Ok(())
}

/// Write a registry snapshot.
pub fn encode<W: Write>(registry: &Registry, mut out: W) -> Result<()> {
    check_encodable(registry)?;
    let store = registry.store();

    writeln!(out, "{}", STUDENTS_HEADER)?;
    for student in store.students() {
        writeln!(
            out,
            "{} {} {}",
            student.id, student.first_name, student.last_name
        )?;
    }

    writeln!(out, "{}", CLUBS_HEADER)?;
    for club in store.clubs() {
        writeln!(out, "{} {}", club.id, club.name)?;
    }

    writeln!(out, "{}", MEMBERSHIPS_HEADER)?;
    for club in store.clubs() {
        write!(out, "{}: ", club.id)?;
        for student_id in registry.memberships().members(club.id) {
            write!(out, "{} ", student_id)?;
        }
        writeln!(out, "{}", END_OF_MEMBERS)?;
    }

    Ok(())
}

/// Read a registry snapshot into a fresh registry.
pub fn decode<R: BufRead>(
    reader: R,
    max_clubs: usize,
    orphans: OrphanPolicy,
) -> Result<(Registry, LoadReport)> {
    let mut decoder = Decoder {
        registry: Registry::new(max_clubs),
        orphans,
        skipped: 0,
        membership_lines: HashSet::new(),
    };
    let mut section: Option<Section> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let line = line.trim_end();

        if let Some(found) = Section::from_header(line) {
            match Section::after(section) {
                Some(expected) if expected == found => {}
                Some(expected) => {
                    return Err(malformed(
                        line_no,
                        format!("expected {} but found {}", expected.header(), found.header()),
                    ))
                }
                None => return Err(malformed(line_no, format!("unexpected {}", found.header()))),
            }
            tracing::debug!("Loading section {}", found.header());
            section = Some(found);
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        match section {
            None => {
                return Err(malformed(
                    line_no,
                    format!("content before {} header", STUDENTS_HEADER),
                ))
            }
            Some(Section::Students) => decoder.student_line(line, line_no)?,
            Some(Section::Clubs) => decoder.club_line(line, line_no)?,
            Some(Section::Memberships) => decoder.membership_line(line, line_no)?,
        }
    }

    if let Some(missing) = Section::after(section) {
        return Err(Error::MalformedFile(format!(
            "missing {} section",
            missing.header()
        )));
    }

    let registry = decoder.registry;
    let report = LoadReport {
        students: registry.store().student_count(),
        clubs: registry.store().club_count(),
        memberships: registry.memberships().len(),
        skipped: decoder.skipped,
    };
    Ok((registry, report))
}

struct Decoder {
    registry: Registry,
    orphans: OrphanPolicy,
    skipped: usize,
    membership_lines: HashSet<ClubId>,
}

impl Decoder {
    fn student_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [id, first, last] = fields[..] else {
            return Err(malformed(
                line_no,
                format!("expected `<id> <first> <last>`, got {} fields", fields.len()),
            ));
        };
        let id: StudentId = parse_id(id, line_no)?;

        tracing::debug!("Student ID: {}, First Name: {}, Last Name: {}", id, first, last);
        self.registry.restore_student(Student::new(id, first, last));
        Ok(())
    }

    fn club_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [id, name] = fields[..] else {
            return Err(malformed(
                line_no,
                format!("expected `<id> <name>`, got {} fields", fields.len()),
            ));
        };
        let id: ClubId = parse_id(id, line_no)?;

        tracing::debug!("Club ID: {}, Club Name: {}", id, name);
        self.registry
            .restore_club(Club::new(id, name))
            .map_err(|e| malformed(line_no, e))
    }

    fn membership_line(&mut self, line: &str, line_no: usize) -> Result<()> {
        let (club, members) = line
            .split_once(':')
            .ok_or_else(|| malformed(line_no, "expected `<clubId>: <studentId>... -1`"))?;
        let club_id: ClubId = parse_id(club.trim(), line_no)?;

        if !self.membership_lines.insert(club_id) {
            return Err(malformed(
                line_no,
                format!("second membership line for club {}", club_id),
            ));
        }

        let student_ids = parse_members(members, line_no)?;

        if self.registry.store().club(club_id).is_none() {
            return self.orphan(
                line_no,
                format!("club {} is not declared in {}", club_id, CLUBS_HEADER),
                student_ids.len(),
            );
        }

        tracing::debug!("Club ID {} Memberships: {:?}", club_id, student_ids);
        for student_id in student_ids {
            if !self.registry.store().contains_student(student_id) {
                self.orphan(
                    line_no,
                    format!(
                        "student {} is not declared in {}",
                        student_id, STUDENTS_HEADER
                    ),
                    1,
                )?;
                continue;
            }
            self.registry.restore_membership(club_id, student_id);
        }
        Ok(())
    }

    fn orphan(&mut self, line_no: usize, message: String, count: usize) -> Result<()> {
        match self.orphans {
            OrphanPolicy::Reject => Err(malformed(line_no, message)),
            OrphanPolicy::Skip => {
                tracing::warn!("Skipping reference at line {}: {}", line_no, message);
                self.skipped += count;
                Ok(())
            }
        }
    }
}

fn parse_id(token: &str, line_no: usize) -> Result<u32> {
    token
        .parse()
        .map_err(|_| malformed(line_no, format!("invalid id {:?}", token)))
}

/// Student ids up to the sentinel. The sentinel must be the last token.
fn parse_members(members: &str, line_no: usize) -> Result<Vec<StudentId>> {
    let mut ids = Vec::new();
    let mut tokens = members.split_whitespace();

    loop {
        match tokens.next() {
            Some(END_OF_MEMBERS) => break,
            Some(token) => ids.push(parse_id(token, line_no)?),
            None => {
                return Err(malformed(
                    line_no,
                    format!("missing {} terminator", END_OF_MEMBERS),
                ))
            }
        }
    }

    if let Some(extra) = tokens.next() {
        return Err(malformed(
            line_no,
            format!("unexpected {:?} after {}", extra, END_OF_MEMBERS),
        ));
    }
    Ok(ids)
}
