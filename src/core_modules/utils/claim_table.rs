// THEORY:
// The claim table is a small comma-separated file with one claim per row:
//
//     name, red, blue, green, class
//
// Note the column order: blue comes before green. The labels are honored as
// written, so column 2 feeds the blue channel and column 3 the green channel.
// Claim colors are always fully opaque.
//
// Every row becomes an explicit `Result<Claim, RecordError>`. What happens to a
// bad row is the caller's decision, expressed as a `MalformedRowPolicy`: drop it,
// keep an all-zero placeholder in its slot, or abort the run.

pub mod claim_table {
    use crate::core_modules::claim::claim::{Claim, ClaimClass};
    use crate::core_modules::color::color::{Channel, Color};
    use crate::error::{RecordError, RecordErrorKind, Result, SizerError};
    use serde::{Deserialize, Serialize};
    use std::path::Path;

    const NAME_FIELD: usize = 0;
    const RED_FIELD: usize = 1;
    const BLUE_FIELD: usize = 2;
    const GREEN_FIELD: usize = 3;
    const CLASS_FIELD: usize = 4;

    /// What to do with a row whose numeric fields do not parse.
    #[derive(
        Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
    )]
    #[serde(rename_all = "lowercase")]
    pub enum MalformedRowPolicy {
        /// Log it and leave it out.
        #[default]
        Skip,
        /// Log it and keep an all-zero claim in its place.
        Placeholder,
        /// Stop loading with an error.
        Abort,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TableOptions {
        /// Treat the first row as column labels.
        pub has_header: bool,
        pub malformed_rows: MalformedRowPolicy,
    }

    impl Default for TableOptions {
        fn default() -> Self {
            Self {
                has_header: true,
                malformed_rows: MalformedRowPolicy::Skip,
            }
        }
    }

    /// The claims that made it through parsing, plus every row that did not.
    #[derive(Debug, Clone, PartialEq, Default)]
    pub struct ClaimTable {
        pub claims: Vec<Claim>,
        pub rejected: Vec<RecordError>,
    }

    /// Splits one line into fields. Double-quoted fields may contain commas, and
    /// `""` inside quotes is a literal quote. Unquoted fields are trimmed.
    pub fn split_record(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut quoted = false;
        let mut was_quoted = false;
        let mut chars = line.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, quoted) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                ('"', true) => quoted = false,
                ('"', false) if field.trim().is_empty() => {
                    field.clear();
                    quoted = true;
                    was_quoted = true;
                }
                (c, false) if was_quoted && c.is_whitespace() => {}
                (',', false) => {
                    fields.push(finish_field(&mut field, was_quoted));
                    was_quoted = false;
                }
                _ => field.push(c),
            }
        }
        fields.push(finish_field(&mut field, was_quoted));
        fields
    }

    fn finish_field(field: &mut String, was_quoted: bool) -> String {
        let value = std::mem::take(field);
        if was_quoted {
            value
        } else {
            value.trim().to_string()
        }
    }

    fn field<'a>(
        row: usize,
        fields: &'a [String],
        index: usize,
        name: &'static str,
    ) -> Result<&'a str, RecordError> {
        fields.get(index).map(|f| f.trim()).ok_or(RecordError {
            row,
            kind: RecordErrorKind::MissingField { field: name },
        })
    }

    fn number(
        row: usize,
        fields: &[String],
        index: usize,
        name: &'static str,
    ) -> Result<i32, RecordError> {
        let value = field(row, fields, index, name)?;
        value.parse().map_err(|_| RecordError {
            row,
            kind: RecordErrorKind::InvalidNumber {
                field: name,
                value: value.to_string(),
            },
        })
    }

    /// Turns one split row into a claim with a zero count.
    pub fn parse_record(row: usize, fields: &[String]) -> Result<Claim, RecordError> {
        let name = field(row, fields, NAME_FIELD, "name")?;
        let red: Channel = number(row, fields, RED_FIELD, "red")?;
        let blue: Channel = number(row, fields, BLUE_FIELD, "blue")?;
        let green: Channel = number(row, fields, GREEN_FIELD, "green")?;
        let class: ClaimClass = number(row, fields, CLASS_FIELD, "class")?;

        Ok(Claim::new(name, Color::opaque(red, green, blue), class))
    }

    /// Parses a whole table. Blank lines are not rows and do not advance the
    /// row index.
    pub fn parse_table(text: &str, options: &TableOptions) -> Result<ClaimTable> {
        let mut table = ClaimTable::default();
        let rows = text.lines().filter(|line| !line.trim().is_empty()).enumerate();

        for (row, line) in rows {
            // The header is never parsed, so it cannot turn into a placeholder.
            if row == 0 && options.has_header {
                continue;
            }
            match parse_record(row, &split_record(line)) {
                Ok(claim) => table.claims.push(claim),
                Err(error) => match options.malformed_rows {
                    MalformedRowPolicy::Abort => return Err(SizerError::MalformedRecord(error)),
                    MalformedRowPolicy::Skip => {
                        tracing::warn!(row, %error, "Could not parse row, skipping");
                        table.rejected.push(error);
                    }
                    MalformedRowPolicy::Placeholder => {
                        tracing::warn!(row, %error, "Could not parse row, keeping placeholder");
                        table.claims.push(Claim::placeholder());
                        table.rejected.push(error);
                    }
                },
            }
        }

        Ok(table)
    }

    /// Reads and parses the claim table at `path`.
    pub fn load_table(path: &Path, options: &TableOptions) -> Result<ClaimTable> {
        let text = std::fs::read_to_string(path).map_err(|source| SizerError::ResourceOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let table = parse_table(&text, options)?;
        tracing::info!(
            path = %path.display(),
            claims = table.claims.len(),
            rejected = table.rejected.len(),
            "Loaded claim table"
        );
        Ok(table)
    }
}
