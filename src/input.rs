use crate::{Result, WhoissError};
use std::fs::File;
use std::io::{self, BufRead, BufReader};

/// The sites to look up: the positional arguments, followed by any read from an input file.
#[derive(Debug)]
pub struct Input {
    sites: Vec<String>,
}

impl Input {
    /// `path` of `-` reads from stdin.
    pub fn new(args: Vec<String>, path: Option<&str>) -> Result<Self> {
        let mut sites = args;
        if let Some(path) = path {
            sites.extend(Self::read(path)?);
        }
        Ok(Self { sites })
    }

    fn read(path: &str) -> Result<Vec<String>> {
        let reader: Box<dyn BufRead> = match path {
            "-" => Box::new(BufReader::new(io::stdin())),
            filepath => Box::new(BufReader::new(File::open(filepath).map_err(|source| {
                WhoissError::ReadFile {
                    path: filepath.to_string(),
                    source,
                }
            })?)),
        };
        Self::collect(reader)
    }

    fn collect<R: BufRead>(reader: R) -> Result<Vec<String>> {
        let mut contents = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                contents.push(line.to_string());
            }
        }
        Ok(contents)
    }

    pub fn sites(self) -> Vec<String> {
        self.sites
    }
}
