use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use yamada::gen;
use yamada::model::{Diagram, NodeSpec};

/// Arc label as written in input files: a number or a name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Name(String),
}

/// Parse a JSON array of node specs, e.g.
/// `[{"kind": "crossing", "arcs": [1, 5, 2, 4]}, {"kind": "vertex", "arcs": ["a", "b", "c"]}]`.
pub fn parse(text: &str) -> Result<Diagram<Label>> {
    let specs: Vec<NodeSpec<Label>> =
        serde_json::from_str(text).context("parsing node specs")?;
    Ok(Diagram::new(specs)?)
}

pub fn load(path: &Path) -> Result<Diagram<Label>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse(&text).with_context(|| format!("in {}", path.display()))
}

pub const FIXTURES: &[&str] = &[
    "unknot",
    "theta",
    "handcuff",
    "trefoil",
    "figure-eight",
    "hopf",
    "oriented-trefoil",
];

/// Built-in diagram by name.
pub fn fixture(name: &str) -> Result<Diagram> {
    Ok(match name {
        "unknot" => gen::unknot()?,
        "theta" => gen::theta()?,
        "handcuff" => gen::handcuff()?,
        "trefoil" => gen::trefoil()?,
        "figure-eight" => gen::figure_eight()?,
        "hopf" => gen::hopf()?,
        "oriented-trefoil" => gen::oriented_knot(&gen::TREFOIL)?,
        other => bail!("unknown fixture {other:?}; known: {}", FIXTURES.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamada::canon::canonical_form;

    #[test]
    fn mixed_labels_and_kinds_parse() {
        let d = parse(
            r#"[
                {"kind": "vertex", "arcs": ["x", 1, 2]},
                {"kind": "vertex", "arcs": [2, 1, "x"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(d.arc_count(), 3);
        assert_eq!(
            canonical_form(&d).unwrap(),
            canonical_form(&gen::theta().unwrap()).unwrap()
        );
    }

    #[test]
    fn oriented_crossings_parse() {
        let d = parse(
            r#"[
                {"kind": "crossing", "arcs": [1, 5, 2, 4], "dirs": ["in", "out", "out", "in"]},
                {"kind": "crossing", "arcs": [3, 1, 4, 6], "dirs": ["in", "out", "out", "in"]},
                {"kind": "crossing", "arcs": [5, 3, 6, 2], "dirs": ["in", "out", "out", "in"]}
            ]"#,
        )
        .unwrap();
        assert_eq!(d.writhe(), Some(3));
    }

    #[test]
    fn malformed_input_is_reported() {
        assert!(parse(r#"[{"kind": "strand", "arcs": [1, 2, 3]}]"#).is_err());
        assert!(parse(r#"[{"kind": "vertex", "arcs": [1]}]"#).is_err());
        assert!(parse("not json").is_err());
        assert!(fixture("granny").is_err());
        for name in FIXTURES {
            assert!(fixture(name).is_ok(), "{name}");
        }
    }
}
