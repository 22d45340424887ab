//! CLI commands for MSBF message flow containers

use std::path::Path;

use crate::converter::convert_msbf_to_json;
use crate::formats::msbf::{MsbfFile, parse_msbf_bytes};
use crate::source::{ByteSource, FileSource};

fn open(path: &Path) -> anyhow::Result<MsbfFile> {
    let source = FileSource::open(path)?;
    Ok(parse_msbf_bytes(&source.contents()?)?)
}

/// List flow nodes
pub fn list(path: &Path, labelled: bool) -> anyhow::Result<()> {
    let file = open(path)?;

    for (index, node) in file.nodes.iter().enumerate() {
        if labelled && node.label.is_none() {
            continue;
        }
        let label = node.label.as_deref().unwrap_or("-");
        let marker = if node.is_empty() { " (empty)" } else { "" };
        println!("{index:>5}  {label:<24} {:?}{marker}", node.fields);
    }
    println!(
        "\n{} nodes, {} labelled, {} branch entries",
        file.nodes.len(),
        file.labels().len(),
        file.branches.len()
    );
    Ok(())
}

/// Print the node an entry label points at
pub fn resolve(path: &Path, label: &str) -> anyhow::Result<()> {
    let file = open(path)?;
    let Some(index) = file.node_index(label) else {
        anyhow::bail!("No flow entry labelled '{label}' in {}", path.display());
    };
    println!("{label} -> node {index} {:?}", file.nodes[index].fields);
    Ok(())
}

/// Export a .msbf file to JSON
pub fn export(source: &Path, destination: &Path) -> anyhow::Result<()> {
    convert_msbf_to_json(source, destination)?;
    println!("Exported {}", destination.display());
    Ok(())
}
