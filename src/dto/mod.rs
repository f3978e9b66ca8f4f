mod requests;
mod responses;

pub use requests::{FormError, ProgramForm};
pub use responses::SaveSummary;
