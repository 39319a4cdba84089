#[derive(Debug, Clone)]
pub struct CsvSettings {
    pub delimiter: char,
    /// Accept RFC 4180 double-quoted fields. With quoting off, a `"` is an
    /// ordinary character.
    pub quoting: bool,
}

impl Default for CsvSettings {
    fn default() -> Self {
        CsvSettings {
            delimiter: ',',
            quoting: true,
        }
    }
}
