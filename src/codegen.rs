//! Whole-tree VHDL generation.
//!
//! Every composite node becomes its own entity. The root gets the requested
//! name and composite children are named `{parent}_sub1` / `{parent}_sub2`;
//! leaves are instantiated inline by their parent under their own entity
//! name.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::arch::Fft;
use crate::bit_order::BitOrder;
use crate::error::GenError;
use crate::imports::Imports;
use crate::vhdl;

/// One emitted entity and the metadata needed to drive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedEntity {
    pub name: String,
    pub code: String,
    /// Components referenced through `use work.*;` clauses.
    pub imports: Imports,
    pub delay: usize,
    pub input_order: BitOrder,
    pub output_order: BitOrder,
}

/// Emit every composite of `root`, children before their parents.
///
/// A leaf root produces no entities: its core already exists.
pub fn generate(root: &Fft, name: &str) -> Result<Vec<GeneratedEntity>, GenError> {
    if !vhdl::is_identifier(name) {
        return Err(GenError::InvalidEntityName(String::from(name)));
    }
    let mut out = Vec::new();
    emit(root, name, &mut out);
    #[cfg(feature = "verbose-logging")]
    log::debug!("generated {} entities for {}", out.len(), name);
    Ok(out)
}

/// Name under which `child` is instantiated by its parent `parent`.
pub fn child_entity_name(parent: &str, index: usize, child: &Fft) -> String {
    match child {
        Fft::Base(base) => String::from(base.entity()),
        _ => format!("{}_sub{}", parent, index + 1),
    }
}

fn emit(node: &Fft, name: &str, out: &mut Vec<GeneratedEntity>) {
    let children = node.children();
    let names: Vec<String> = children
        .iter()
        .enumerate()
        .map(|(i, child)| child_entity_name(name, i, child))
        .collect();
    for (child, child_name) in children.iter().zip(&names) {
        emit(child, child_name, out);
    }

    let code = match node {
        Fft::Base(_) => return,
        Fft::FourStep(c) => c.gen_entity(name, &names[0], &names[1]),
        Fft::Spdf(c) => c.gen_entity(name, &names[0]),
    };
    let imports = names
        .iter()
        .fold(node.local_imports(), |acc, n| acc.union(&core::iter::once(n.as_str()).collect()));
    out.push(GeneratedEntity {
        name: String::from(name),
        code,
        imports,
        delay: node.delay(),
        input_order: node.input_bit_order(),
        output_order: node.output_bit_order(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::{Fft4Step, FftBase, FftSpdf};

    fn base(n: usize) -> FftBase {
        FftBase::new(n, format!("fft{}", n), "SCALE_NONE", n + 2).unwrap()
    }

    #[test]
    fn rejects_bad_names() {
        let tree: Fft = FftSpdf::new(16, base(4)).unwrap().into();
        assert_eq!(
            generate(&tree, "16fft"),
            Err(GenError::InvalidEntityName(String::from("16fft")))
        );
    }

    #[test]
    fn leaf_root_emits_nothing() {
        let tree: Fft = base(8).into();
        assert!(generate(&tree, "top").unwrap().is_empty());
    }

    #[test]
    fn names_children_and_orders_dependencies_first() {
        let inner = Fft4Step::new(16, base(4), base(4)).unwrap();
        let spdf = FftSpdf::new(64, base(16)).unwrap();
        let tree: Fft = Fft4Step::new(1024, inner, spdf).unwrap().into();
        let entities = generate(&tree, "fft1024").unwrap();
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, alloc::vec!["fft1024_sub1", "fft1024_sub2", "fft1024"]);

        let top = &entities[2];
        assert_eq!(top.delay, tree.delay());
        assert!(top.imports.contains("fft1024_sub1"));
        assert!(top.imports.contains("fft1024_sub2"));
        assert!(!top.imports.contains("fft4"));
        assert!(top.code.contains("use work.fft1024_sub2;"));
        assert!(top.code.contains("sub2: entity fft1024_sub2 generic map"));
        assert!(top.code.contains(&format!("-- delay is {}", tree.delay())));

        let leafy = &entities[0];
        assert!(leafy.imports.contains("fft4"));
        assert!(leafy.code.contains("sub1inst: entity fft4"));
    }

    #[test]
    fn manifest_matches_use_clauses() {
        let tree: Fft = FftSpdf::new(16, base(4)).unwrap().into();
        let entities = generate(&tree, "fft16").unwrap();
        let entity = &entities[0];
        let clauses: Vec<&str> = entity
            .code
            .lines()
            .filter_map(|l| l.strip_prefix("use work."))
            .filter_map(|l| l.strip_suffix(';'))
            .filter(|l| *l != "fft_types.all")
            .collect();
        let manifest: Vec<&str> = entity.imports.iter().collect();
        assert_eq!(clauses, manifest);
    }
}
