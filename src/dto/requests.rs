use crate::models::{Catalog, DuplicateKey, DuplicateKeyPolicy, Program};
use std::iter;
use thiserror::Error;

const KEY_FIELD: &str = "records[][key]";
const NAME_FIELD: &str = "records[][name]";
const RSS_FIELD: &str = "records[][rss]";
const IMAGE_FIELD: &str = "records[][image]";
const CATEGORY_FIELD: &str = "records[][category]";
const DESCRIPTION_FIELD: &str = "records[][description]";

#[derive(Debug, Error)]
pub enum FormError {
    #[error("malformed form data: {0}")]
    Encoding(#[from] serde_urlencoded::de::Error),
    #[error("no records submitted")]
    Empty,
    #[error("field '{field}' has {found} values but there are {expected} keys")]
    Misaligned {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("program key '{0}' appears more than once")]
    DuplicateKey(String),
}

impl From<DuplicateKey> for FormError {
    fn from(DuplicateKey(key): DuplicateKey) -> Self {
        FormError::DuplicateKey(key)
    }
}

/// The save form: one array per field, the i-th entries of each array
/// describing the same program.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgramForm {
    pub keys: Vec<String>,
    pub names: Vec<String>,
    pub rss: Vec<String>,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub descriptions: Vec<String>,
}

impl ProgramForm {
    /// Decode an urlencoded body. Unknown fields are ignored.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;

        let mut form = ProgramForm::default();
        for (field, value) in pairs {
            let column = match field.as_str() {
                KEY_FIELD => &mut form.keys,
                NAME_FIELD => &mut form.names,
                RSS_FIELD => &mut form.rss,
                IMAGE_FIELD => &mut form.images,
                CATEGORY_FIELD => &mut form.categories,
                DESCRIPTION_FIELD => &mut form.descriptions,
                _ => continue,
            };
            column.push(value);
        }

        Ok(form)
    }

    /// Zip the columns into a catalog. A column that was not sent at all
    /// counts as empty strings; a column of the wrong length is rejected.
    pub fn into_catalog(self, policy: DuplicateKeyPolicy) -> Result<Catalog, FormError> {
        if self.keys.is_empty() {
            return Err(FormError::Empty);
        }

        let expected = self.keys.len();
        for (field, column) in [
            (NAME_FIELD, &self.names),
            (RSS_FIELD, &self.rss),
            (IMAGE_FIELD, &self.images),
            (CATEGORY_FIELD, &self.categories),
            (DESCRIPTION_FIELD, &self.descriptions),
        ] {
            if !column.is_empty() && column.len() != expected {
                return Err(FormError::Misaligned {
                    field,
                    expected,
                    found: column.len(),
                });
            }
        }

        let mut names = padded(self.names);
        let mut rss = padded(self.rss);
        let mut images = padded(self.images);
        let mut categories = padded(self.categories);
        let mut descriptions = padded(self.descriptions);

        let mut catalog = Catalog::new();
        for key in self.keys {
            let program = Program {
                name: names.next().unwrap_or_default(),
                rss: rss.next().unwrap_or_default(),
                image: images.next().unwrap_or_default(),
                description: descriptions.next().unwrap_or_default(),
                category: categories.next().unwrap_or_default(),
            };
            catalog.insert(key, program, policy)?;
        }

        Ok(catalog)
    }
}

fn padded(column: Vec<String>) -> impl Iterator<Item = String> {
    column.into_iter().chain(iter::repeat_with(String::new))
}
