mod program;

pub use program::{Catalog, DuplicateKey, DuplicateKeyPolicy, Program};
