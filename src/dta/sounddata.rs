use serde::Serialize;
use crate::dta::NO_NAME;


/// Sound file names by id, in SNDS order.
#[derive(Debug, Default, Serialize)]
pub struct SoundNames {
    /// count field of the SNDS header
    pub declared: u16,
    names: Vec<String>,
}

impl SoundNames {
    pub fn new(declared: u16) -> Self {
        Self { declared, names: Vec::with_capacity(declared as usize) }
    }

    pub fn push(&mut self, name: String) {
        self.names.push(name);
    }

    /// `NO_NAME` for ids past the table
    pub fn get(&self, id: u16) -> &str {
        self.names.get(id as usize).map(String::as_str).unwrap_or(NO_NAME)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
