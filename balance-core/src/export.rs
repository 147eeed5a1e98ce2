//! Shell export rendering for credential bundles
//!
//! Bootstrap commands print their credentials as `export NAME=value`
//! lines so the output can be fed straight to `eval`.

use std::fmt;
use std::io::{self, Write};

/// A single `export NAME=value` assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvExport {
    pub name: String,
    pub value: String,
    /// Wrap the value in double quotes
    pub quoted: bool,
}

impl EnvExport {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quoted: false,
        }
    }

    pub fn quoted(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quoted: true,
        }
    }
}

impl fmt::Display for EnvExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "export {}=\"{}\"", self.name, self.value)
        } else {
            write!(f, "export {}={}", self.name, self.value)
        }
    }
}

/// A credential bundle that can be printed as shell exports
pub trait ExportVars {
    /// Assignments in the order they should be printed
    fn export_vars(&self) -> Vec<EnvExport>;
}

/// Write every export line of a bundle, one per line
pub fn write_exports<W: Write>(out: &mut W, bundle: &impl ExportVars) -> io::Result<()> {
    for export in bundle.export_vars() {
        writeln!(out, "{}", export)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair;

    impl ExportVars for Pair {
        fn export_vars(&self) -> Vec<EnvExport> {
            vec![EnvExport::new("A", "1"), EnvExport::quoted("B", "two words")]
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(EnvExport::new("KEY", "abc").to_string(), "export KEY=abc");
        assert_eq!(
            EnvExport::quoted("SECRET", "x=y").to_string(),
            "export SECRET=\"x=y\""
        );
    }

    #[test]
    fn test_write_exports_keeps_order() {
        let mut out = Vec::new();
        write_exports(&mut out, &Pair).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "export A=1\nexport B=\"two words\"\n"
        );
    }
}
