use crate::{parse_key, BulkLoader, Error, Key, Tree};
use log::info;
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

const MENU: &str = "Enter Character For Command - A(dd), R(ead), P(rint), E(xists), D(elete), Q(uit): ";

/// Line-oriented command loop driving a tree from a single leading character.
pub struct Console<I, O, R> {
    input: I,
    output: O,
    numbers: PathBuf,
    loader: BulkLoader<R>,
}

impl<I: BufRead, O: Write, R: Rng> Console<I, O, R> {
    /// # Arguments
    ///
    /// * `numbers` - The file the `R` command bulk loads from
    ///
    pub fn new(input: I, output: O, numbers: PathBuf, loader: BulkLoader<R>) -> Self {
        Console {
            input,
            output,
            numbers,
            loader,
        }
    }

    /// Runs commands against `tree` until `Q` or the end of input.
    pub fn run(&mut self, tree: &mut Tree) -> Result<(), Error> {
        loop {
            let line = match self.prompt(MENU)? {
                Some(line) => line,
                None => return Ok(()),
            };
            let command = match line.trim().chars().next() {
                Some(command) => command.to_ascii_uppercase(),
                None => continue,
            };
            if !self.execute(tree, command)? {
                return Ok(());
            }
        }
    }

    // Returns false once the loop should stop
    fn execute(&mut self, tree: &mut Tree, command: char) -> Result<bool, Error> {
        match command {
            'A' => match self.prompt_key("What number should I add: ")? {
                Some(Some(key)) => tree.insert(key),
                Some(None) => {}
                None => return Ok(false),
            },
            'R' => return self.bulk_load(tree),
            'P' => write!(self.output, "{}", tree)?,
            'E' => match self.prompt_key("What number would you like to check the presence of: ")? {
                Some(Some(key)) => {
                    let answer = if tree.contains(key) { "Exists" } else { "Doesn't Exist" };
                    writeln!(self.output, "{}", answer)?;
                }
                Some(None) => {}
                None => return Ok(false),
            },
            'D' => {
                if tree.is_empty() {
                    writeln!(self.output, "Tree is empty")?;
                    return Ok(true);
                }
                match self.prompt_key("What do you want to delete: ")? {
                    Some(Some(key)) => {
                        if !tree.delete(key) {
                            writeln!(self.output, "Node Doesn't Exist!")?;
                        }
                    }
                    Some(None) => {}
                    None => return Ok(false),
                }
            }
            'Q' => return Ok(false),
            other => writeln!(self.output, "Unknown command `{}`", other)?,
        }
        Ok(true)
    }

    fn bulk_load(&mut self, tree: &mut Tree) -> Result<bool, Error> {
        let line = match self.prompt("How many numbers: ")? {
            Some(line) => line,
            None => return Ok(false),
        };
        let count: usize = match line.trim().parse() {
            Ok(count) => count,
            Err(_) => {
                writeln!(self.output, "{}", Error::NotANumber(line.trim().to_string()))?;
                return Ok(true);
            }
        };
        let file = match File::open(&self.numbers) {
            Ok(file) => file,
            Err(err) => {
                writeln!(self.output, "Cannot open {}: {}", self.numbers.display(), err)?;
                return Ok(true);
            }
        };
        let loaded = self.loader.load(tree, BufReader::new(file), count)?;
        info!("Loaded {} numbers from {}", loaded, self.numbers.display());
        writeln!(self.output, "Loaded {} numbers", loaded)?;
        Ok(true)
    }

    // None at the end of input, Some(None) when the reply was not a key
    fn prompt_key(&mut self, message: &str) -> Result<Option<Option<Key>>, Error> {
        let line = match self.prompt(message)? {
            Some(line) => line,
            None => return Ok(None),
        };
        match parse_key(&line) {
            Ok(key) => Ok(Some(Some(key))),
            Err(err) => {
                writeln!(self.output, "{}", err)?;
                Ok(Some(None))
            }
        }
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
