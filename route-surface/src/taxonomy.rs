use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Paved,
    Unpaved,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Infrastructure {
    Street,
    Trail,
    Sidewalk,
    Unknown,
}

impl Material {
    pub fn as_str(self) -> &'static str {
        match self {
            Material::Paved => "paved",
            Material::Unpaved => "unpaved",
            Material::Unknown => "unknown",
        }
    }
}

impl Infrastructure {
    pub fn as_str(self) -> &'static str {
        match self {
            Infrastructure::Street => "street",
            Infrastructure::Trail => "trail",
            Infrastructure::Sidewalk => "sidewalk",
            Infrastructure::Unknown => "unknown",
        }
    }
}

/// How one OSM way counts toward a route's surface breakdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WayClass {
    pub material: Material,
    pub infrastructure: Infrastructure,
    pub stairs: bool,
}

impl WayClass {
    pub const UNKNOWN: WayClass = WayClass {
        material: Material::Unknown,
        infrastructure: Infrastructure::Unknown,
        stairs: false,
    };
}

const PAVED_SURFACES: [&str; 11] = [
    "asphalt",
    "concrete",
    "paved",
    "paving_stones",
    "sett",
    "cobblestone",
    "brick",
    "metal",
    "cement",
    "rubber",
    "artificial_turf",
];

const UNPAVED_SURFACES: [&str; 19] = [
    "dirt",
    "earth",
    "grass",
    "gravel",
    "ground",
    "mud",
    "sand",
    "soil",
    "unpaved",
    "compacted",
    "fine_gravel",
    "pebblestone",
    "rock",
    "stone",
    "crushed_limestone",
    "woodchips",
    "bark",
    "mulch",
    "wood",
];

const USUALLY_PAVED_HIGHWAYS: [&str; 13] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "living_street",
    "footway",
    "pedestrian",
    "steps",
    "corridor",
    "cycleway",
];

// Service roads could go either way
const USUALLY_UNPAVED_HIGHWAYS: [&str; 3] = ["path", "track", "bridleway"];

const STREET_HIGHWAYS: [&str; 14] = [
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
    "residential",
    "service",
    "motorway_link",
    "trunk_link",
    "primary_link",
    "secondary_link",
    "tertiary_link",
    "living_street",
];

const TRAIL_HIGHWAYS: [&str; 4] = ["path", "track", "bridleway", "cycleway"];

const SIDEWALK_HIGHWAYS: [&str; 4] = ["footway", "pedestrian", "steps", "corridor"];

/// Paved or unpaved according to the OSM `surface` tag alone.
pub fn surface_material(surface: Option<&str>) -> Material {
    let Some(surface) = surface.map(|x| x.to_lowercase()) else {
        return Material::Unknown;
    };
    if PAVED_SURFACES.contains(&surface.as_str()) {
        Material::Paved
    } else if UNPAVED_SURFACES.contains(&surface.as_str()) {
        Material::Unpaved
    } else {
        Material::Unknown
    }
}

/// The likely material of a way with no useful `surface` tag.
pub fn material_from_highway(highway: &str) -> Material {
    let highway = highway.to_lowercase();
    if USUALLY_PAVED_HIGHWAYS.contains(&highway.as_str()) {
        Material::Paved
    } else if USUALLY_UNPAVED_HIGHWAYS.contains(&highway.as_str()) {
        Material::Unpaved
    } else {
        Material::Unknown
    }
}

pub fn infrastructure(highway: &str, surface: Option<&str>) -> Infrastructure {
    let highway = highway.to_lowercase();
    let surface = surface.map(|x| x.to_lowercase());

    // Gravel footways and natural steps are really trails
    match (highway.as_str(), surface.as_deref()) {
        ("footway", Some("gravel")) => return Infrastructure::Trail,
        ("steps", Some("wood" | "ground" | "gravel")) => return Infrastructure::Trail,
        _ => {}
    }

    if STREET_HIGHWAYS.contains(&highway.as_str()) {
        Infrastructure::Street
    } else if TRAIL_HIGHWAYS.contains(&highway.as_str()) {
        Infrastructure::Trail
    } else if SIDEWALK_HIGHWAYS.contains(&highway.as_str()) {
        Infrastructure::Sidewalk
    } else {
        Infrastructure::Unknown
    }
}

pub fn is_stairs(highway: &str) -> bool {
    highway.eq_ignore_ascii_case("steps")
}

pub fn classify_way(highway: &str, surface: Option<&str>) -> WayClass {
    let material = match surface_material(surface) {
        Material::Unknown => material_from_highway(highway),
        material => material,
    };
    WayClass {
        material,
        infrastructure: infrastructure(highway, surface),
        stairs: is_stairs(highway),
    }
}

/// Stroke color for drawing a segment, keyed on material first.
pub fn stroke_color(material: Material, infrastructure: Infrastructure) -> &'static str {
    match (material, infrastructure) {
        (Material::Paved, Infrastructure::Street) => "#1f77b4",
        (Material::Paved, Infrastructure::Sidewalk) => "#ff7f0e",
        (Material::Paved, Infrastructure::Trail) => "#2ca02c",
        (Material::Paved, Infrastructure::Unknown) => "#d62728",
        (Material::Unpaved, Infrastructure::Street) => "#9467bd",
        (Material::Unpaved, Infrastructure::Sidewalk) => "#8c564b",
        (Material::Unpaved, Infrastructure::Trail) => "#e377c2",
        (Material::Unpaved, Infrastructure::Unknown) => "#7f7f7f",
        (Material::Unknown, _) => "#bcbd22",
    }
}
