//! Text helpers shared by the entity emitters.

use alloc::format;
use alloc::string::String;

use crate::imports::Imports;

/// Library and package clauses every generated entity starts with.
pub const LIBRARY_HEADER: &str = "
library ieee;
library work;
use ieee.numeric_std.all;
use ieee.std_logic_1164.all;
USE ieee.math_real.log2;
USE ieee.math_real.ceil;
use work.fft_types.all;
";

/// Prefix every non-empty line of `text` with `levels` tabs.
pub fn indent(text: &str, levels: usize) -> String {
    let prefix = "\t".repeat(levels);
    let mut out = String::with_capacity(text.len() + levels * 8);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            out.push_str(&prefix);
        }
        out.push_str(line);
    }
    out
}

/// `constant {id}{name}: integer := {value};` lines.
pub fn constants(id: &str, values: &[(&str, String)]) -> String {
    values
        .iter()
        .map(|(name, value)| format!("constant {}{}: integer := {};\n", id, name, value))
        .collect()
}

/// `use work.X;` clauses for each import, in order.
pub fn use_clauses(imports: &Imports) -> String {
    imports.iter().map(|name| format!("use work.{};\n", name)).collect()
}

/// Instantiation of a generated composite sub-core.
pub fn composite_instance(instance: &str, entity: &str) -> String {
    format!(
        "{0}: entity {1} generic map(dataBits=>dataBits, twBits=>twBits)\n\
         \tport map(clk=>clk, din=>{0}din, phase=>{0}phase, dout=>{0}dout);",
        instance, entity
    )
}

/// True if `name` is a basic VHDL identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_with_letter = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic());
    starts_with_letter
        && !name.ends_with('_')
        && !name.contains("__")
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb\n", 1), "\ta\n\n\tb\n");
        assert_eq!(indent("x", 2), "\t\tx");
    }

    #[test]
    fn constants_block() {
        let text = constants("p", &[("N", "64".into()), ("twiddleBits", "twBits".into())]);
        assert_eq!(
            text,
            "constant pN: integer := 64;\nconstant ptwiddleBits: integer := twBits;\n"
        );
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("fft1024"));
        assert!(is_identifier("fft_1024_sub1"));
        assert!(!is_identifier("1024fft"));
        assert!(!is_identifier("fft__x"));
        assert!(!is_identifier("fft_"));
        assert!(!is_identifier("fft-x"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn composite_instance_line() {
        assert_eq!(
            composite_instance("sub2", "fft64"),
            "sub2: entity fft64 generic map(dataBits=>dataBits, twBits=>twBits)\n\
             \tport map(clk=>clk, din=>sub2din, phase=>sub2phase, dout=>sub2dout);"
        );
    }
}
