use anyhow::{bail, Result};

use crate::segments::SurfacePercentages;

const SURFACE_TAGS: [&str; 6] = [
    "surface_paved",
    "surface_unpaved",
    "surface_street",
    "surface_trail",
    "surface_sidewalk",
    "stairs",
];

/// Rewrite a route file's surface shares in place, leaving the rest of the text untouched. Old
/// share tags are dropped and fresh ones go at the end of the metadata extensions, which are
/// created if missing.
pub fn add_surface_tags(gpx: &str, percentages: &SurfacePercentages) -> Result<String> {
    let shares = percentages.to_shares();
    let values = [
        shares.paved,
        shares.unpaved,
        shares.street,
        shares.trail,
        shares.sidewalk,
        shares.stairs,
    ];
    let tags: Vec<String> = SURFACE_TAGS
        .iter()
        .zip(values)
        .map(|(tag, value)| format!("      <rcr:{tag}>{value:.3}</rcr:{tag}>"))
        .collect();

    let mut lines: Vec<String> = gpx
        .lines()
        .filter(|line| !is_surface_tag(line))
        .map(|line| line.to_string())
        .collect();

    let Some(metadata_end) = lines.iter().position(|line| line.trim() == "</metadata>") else {
        bail!("no </metadata> to put surface tags in");
    };
    match lines[..metadata_end]
        .iter()
        .position(|line| line.trim() == "</extensions>")
    {
        Some(extensions_end) => {
            lines.splice(extensions_end..extensions_end, tags);
        }
        None => {
            let mut block = vec!["    <extensions>".to_string()];
            block.extend(tags);
            block.push("    </extensions>".to_string());
            lines.splice(metadata_end..metadata_end, block);
        }
    }

    let mut out = lines.join("\n");
    if gpx.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}

fn is_surface_tag(line: &str) -> bool {
    let line = line.trim_start();
    SURFACE_TAGS.iter().any(|tag| {
        line.strip_prefix("<rcr:")
            .and_then(|rest| rest.strip_prefix(tag))
            .map_or(false, |rest| rest.starts_with('>'))
    })
}
