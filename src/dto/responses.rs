use std::fmt;

/// Text returned to the editor after a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub records: usize,
    pub bytes: usize,
    pub backed_up: bool,
}

impl fmt::Display for SaveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kb = self.bytes / 1000;
        if self.backed_up {
            write!(f, "Success: {} records saved (~{} kB)", self.records, kb)
        } else {
            write!(
                f,
                "Warning: {} records saved (~{} kB), but failed to backup.",
                self.records, kb
            )
        }
    }
}
