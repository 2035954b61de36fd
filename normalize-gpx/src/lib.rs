//! Writes routes back out as canonical GPX, so every route file in the repository has the same
//! layout no matter which tool last touched it.


use quick_xml::escape::escape;

use route_model::Route;

const CLUB: &str = "Race Condition Running";
const CLUB_URL: &str = "https://raceconditionrunning.com";

/// The canonical GPX 1.1 text for a route. Optional metadata is only written when set.
pub fn route_gpx(route: &Route) -> String {
    let id = escape(&route.id);
    let name = escape(&route.name);
    let desc = format!("{name} ({:.1} mi)", route.distance_mi);

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    out.push_str(&format!(
        "<gpx xmlns=\"http://www.topografix.com/GPX/1/1\" version=\"1.1\" creator=\"{CLUB}\" xmlns:rcr=\"http://raceconditionrunning.com/extensions\">\n"
    ));
    out.push_str("  <metadata>\n");
    out.push_str(&format!("    <name>{id}</name>\n"));
    out.push_str(&format!("    <desc>{desc}</desc>\n"));
    out.push_str(&format!("    <link href=\"{CLUB_URL}/routes/{id}\">\n"));
    out.push_str(&format!("      <text>{CLUB}: {name}</text>\n"));
    out.push_str("    </link>\n");
    out.push_str("    <author>\n");
    out.push_str(&format!("      <name>{CLUB}</name>\n"));
    out.push_str(&format!("      <link href=\"{CLUB_URL}\">\n"));
    out.push_str(&format!("        <text>{CLUB}</text>\n"));
    out.push_str("      </link>\n");
    out.push_str("    </author>\n");
    out.push_str("    <extensions>\n");
    for line in extension_lines(route) {
        out.push_str("      ");
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("    </extensions>\n");
    out.push_str("  </metadata>\n");
    out.push_str("  <trk>\n");
    out.push_str(&format!("    <name>{id}</name>\n"));
    out.push_str(&format!("    <desc>{desc}</desc>\n"));
    out.push_str("    <trkseg>\n");
    for pt in &route.points {
        match pt.recorded_elevation() {
            Some(ele) => out.push_str(&format!(
                "      <trkpt lat=\"{}\" lon=\"{}\"><ele>{ele:.2}</ele></trkpt>\n",
                pt.lat, pt.lon
            )),
            None => out.push_str(&format!(
                "      <trkpt lat=\"{}\" lon=\"{}\"/>\n",
                pt.lat, pt.lon
            )),
        }
    }
    out.push_str("    </trkseg>\n");
    out.push_str("  </trk>\n");
    out.push_str("</gpx>\n");
    out
}

/// The `rcr:` extension elements, unindented, in canonical order.
fn extension_lines(route: &Route) -> Vec<String> {
    let mut lines = Vec::new();
    let mut tag = |name: &str, value: String| {
        lines.push(format!("<rcr:{name}>{value}</rcr:{name}>"));
    };

    if let Some(ascent) = route.ascent_m.filter(|x| *x != 0.0) {
        tag("ascent", format!("{ascent:.0}"));
    }
    if let Some(descent) = route.descent_m.filter(|x| *x != 0.0) {
        tag("descent", format!("{descent:.0}"));
    }
    if let Some(surface) = &route.surface {
        tag("surface", escape(surface).into_owned());
    }
    if let Some(shares) = &route.surface_shares {
        for (name, value) in [
            ("surface_paved", shares.paved),
            ("surface_unpaved", shares.unpaved),
            ("surface_street", shares.street),
            ("surface_sidewalk", shares.sidewalk),
            ("surface_trail", shares.trail),
            ("stairs", shares.stairs),
        ] {
            if value != 0.0 {
                tag(name, value.to_string());
            }
        }
    }
    if let Some(start) = &route.start {
        tag("start", escape(start).into_owned());
    }
    if let Some(end) = &route.end {
        tag("end", escape(end).into_owned());
    }
    if route.deprecated {
        tag("deprecated", "true".to_string());
    }
    if let Some(map) = &route.map {
        tag("map", escape(map).into_owned());
    }
    if let Some(notes) = &route.notes {
        tag("notes", escape(notes).into_owned());
    }
    if let Some(last_updated) = &route.last_updated {
        tag("last_updated", escape(last_updated).into_owned());
    }

    if !route.changelog.is_empty() {
        lines.push("<rcr:changelog>".to_string());
        for change in &route.changelog {
            lines.push("  <rcr:change>".to_string());
            lines.push(format!("    <rcr:date>{}</rcr:date>", escape(&change.date)));
            lines.push(format!("    <rcr:note>{}</rcr:note>", escape(&change.note)));
            lines.push("  </rcr:change>".to_string());
        }
        lines.push("</rcr:changelog>".to_string());
    }
    lines
}
