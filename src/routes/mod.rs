mod access;
mod programs;

pub use access::probe_access;
pub use programs::{get_programs, save_programs};
