//! Interactive nine-option menu.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::display;
use crate::config::Settings;
use crate::persist;
use crate::registry::{Registry, StudentId};

const MENU: &str = "\
Welcome to ClubHub!
Choose an option:
1. Add a new student
2. Create a new club
3. Add a student to a club
4. List the clubs of a student
5. List all the students in a club
6. Save the current state of the system
7. Load the data from a file to the system
8. List students in alphabetical order
9. Exit";

enum Flow {
    Continue,
    Exit,
}

/// Blocking request/response loop over a registry.
///
/// Each prompt reads one line and keeps its first whitespace-delimited
/// token. End of input ends the session.
pub struct Menu<'a, R, W> {
    registry: &'a mut Registry,
    settings: &'a Settings,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(registry: &'a mut Registry, settings: &'a Settings, input: R, output: W) -> Self {
        Self {
            registry,
            settings,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.add_student()?,
                "2" => self.create_club()?,
                "3" => self.add_membership()?,
                "4" => self.list_clubs()?,
                "5" => self.list_members()?,
                "6" => self.save()?,
                "7" => self.load()?,
                "8" => self.list_sorted()?,
                "9" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid option. Try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Print a label and read one token. `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(
            line.split_whitespace().next().unwrap_or_default().to_string(),
        ))
    }

    /// Read a name. A blank answer is reported and yields `Some(None)`.
    fn prompt_name(&mut self, label: &str) -> Result<Option<Option<String>>> {
        let Some(name) = self.prompt(label)? else {
            return Ok(None);
        };
        if name.is_empty() {
            writeln!(self.output, "Name cannot be blank.")?;
            return Ok(Some(None));
        }
        Ok(Some(Some(name)))
    }

    fn parse_student_id(&mut self, raw: &str) -> Result<Option<StudentId>> {
        match raw.parse() {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                writeln!(self.output, "Invalid student ID: {:?}", raw)?;
                Ok(None)
            }
        }
    }

    /// Print a registry error and carry on.
    fn report<T>(&mut self, result: crate::Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::debug!("Menu operation failed: {}", e);
                writeln!(self.output, "Error: {}", e)?;
                Ok(None)
            }
        }
    }

    fn add_student(&mut self) -> Result<Flow> {
        let Some(raw) = self.prompt("Enter the student's ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = self.parse_student_id(&raw)? else {
            return Ok(Flow::Continue);
        };
        let Some(first) = self.prompt_name("Enter the student's first name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(first) = first else {
            return Ok(Flow::Continue);
        };
        let Some(last) = self.prompt_name("Enter the student's last name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(last) = last else {
            return Ok(Flow::Continue);
        };

        self.registry.add_student(id, &first, &last);
        writeln!(self.output, "Student {} added.", id)?;
        Ok(Flow::Continue)
    }

    fn create_club(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt_name("Enter the new club's name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = name else {
            return Ok(Flow::Continue);
        };

        let result = self.registry.create_club(&name);
        if let Some(id) = self.report(result)? {
            writeln!(self.output, "Club \"{}\" created with ID {}.", name, id)?;
        }
        Ok(Flow::Continue)
    }

    fn add_membership(&mut self) -> Result<Flow> {
        let Some(club) = self.prompt_name("Enter club name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(club) = club else {
            return Ok(Flow::Continue);
        };
        let Some(raw) = self.prompt("Enter the student's ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = self.parse_student_id(&raw)? else {
            return Ok(Flow::Continue);
        };

        let result = self.registry.add_membership(&club, id);
        if self.report(result)?.is_some() {
            writeln!(self.output, "Student {} added to club \"{}\".", id, club)?;
        }
        Ok(Flow::Continue)
    }

    fn list_clubs(&mut self) -> Result<Flow> {
        let Some(raw) = self.prompt("Enter the student's ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = self.parse_student_id(&raw)? else {
            return Ok(Flow::Continue);
        };

        match self.registry.clubs_of(id) {
            Ok(clubs) => {
                if let Some(student) = self.registry.store().student(id) {
                    display::write_clubs(&mut self.output, student, &clubs)?;
                }
            }
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn list_members(&mut self) -> Result<Flow> {
        let Some(club) = self.prompt_name("Enter club name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(club) = club else {
            return Ok(Flow::Continue);
        };

        match self.registry.members_of(&club) {
            Ok(members) => display::write_members(&mut self.output, &club, &members)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn list_sorted(&mut self) -> Result<Flow> {
        let students = self.registry.students_by_last_name();
        display::write_sorted(&mut self.output, &students)?;
        Ok(Flow::Continue)
    }

    /// An empty answer falls back to the configured data file.
    fn prompt_file(&mut self, label: &str) -> Result<Option<Option<PathBuf>>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        let path = if raw.is_empty() {
            self.settings.data_file.clone()
        } else {
            Some(PathBuf::from(raw))
        };
        if path.is_none() {
            writeln!(self.output, "No filename given and no data_file configured.")?;
        }
        Ok(Some(path))
    }

    fn save(&mut self) -> Result<Flow> {
        let Some(path) = self.prompt_file("Enter the filename to save the data on: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(path) = path else {
            return Ok(Flow::Continue);
        };

        let result = persist::save_system_state(&*self.registry, &path);
        if self.report(result)?.is_some() {
            writeln!(self.output, "Saved to {}.", path.display())?;
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self) -> Result<Flow> {
        let Some(path) = self.prompt_file("Enter the name of a file to load data from: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(path) = path else {
            return Ok(Flow::Continue);
        };

        let result = persist::load_system_state(&mut *self.registry, &path, self.settings.load.orphans);
        if let Some(report) = self.report(result)? {
            writeln!(self.output, "Data loading complete: {}.", report)?;
        }
        Ok(Flow::Continue)
    }
}
