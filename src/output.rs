use std::io::Write;

use crate::curve::FillCurve;
use crate::error::Result;

/// One output record: a tank label followed by its curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillRow {
    pub name: String,
    pub curve: FillCurve,
}

/// The rows of one batch run, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillTable {
    pub rows: Vec<FillRow>,
}

impl FillTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, curve: FillCurve) {
        self.rows.push(FillRow {
            name: name.into(),
            curve,
        });
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FillCurve> {
        self.rows.iter().find(|r| r.name == name).map(|r| &r.curve)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes one comma-separated line per row: the name, then the samples
    /// in height order. Names holding a comma, quote or line break are quoted.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        for row in &self.rows {
            write!(writer, "{}", quote(&row.name))?;
            for sample in row.curve.samples() {
                write!(writer, ",{sample}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn quote(field: &str) -> String {
    if field.chars().any(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_name_then_samples() {
        let mut table = FillTable::new();
        table.push("Cistern1500", FillCurve::new(vec![0, 4, 9]));
        table.push("CisternXL10000", FillCurve::new(vec![1, 2]));

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cistern1500,0,4,9\nCisternXL10000,1,2\n"
        );
    }

    #[test]
    fn awkward_names_are_quoted() {
        let mut table = FillTable::new();
        table.push("a,\"b\"", FillCurve::new(vec![1]));
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\"a,\"\"b\"\"\",1\n");
    }

    #[test]
    fn lookup_by_name() {
        let mut table = FillTable::new();
        table.push("x", FillCurve::new(vec![3]));
        assert_eq!(table.get("x").unwrap().last(), Some(3));
        assert!(table.get("y").is_none());
    }
}
