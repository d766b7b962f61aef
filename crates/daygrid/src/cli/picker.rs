use console::{style, Term};
use daygridapp::store::directory::DirectoryPicker;
use std::io;
use std::path::PathBuf;

/// Asks for a directory on the terminal. An empty answer cancels.
pub struct PromptPicker;

impl DirectoryPicker for PromptPicker {
    fn pick_directory(&self) -> io::Result<Option<PathBuf>> {
        let term = Term::stderr();
        term.write_str(&format!(
            "{} {} ",
            style("Journal directory").bold(),
            style("(empty to cancel):").dim()
        ))?;
        term.flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        Ok(parse_answer(&answer))
    }
}

fn parse_answer(answer: &str) -> Option<PathBuf> {
    let answer = answer.trim();
    if answer.is_empty() {
        None
    } else {
        Some(PathBuf::from(answer))
    }
}
