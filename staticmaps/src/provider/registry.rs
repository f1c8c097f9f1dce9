//! Built-in tile providers.

use std::collections::BTreeMap;

use super::types::TileProvider;

const OSM_DATA: &str = "Data (c) OSM and contributors";

pub(crate) fn open_street_maps() -> TileProvider {
    TileProvider::new(
        "osm",
        "Maps and Data (c) openstreetmap.org and contributors, ODbL",
        "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    )
    .with_shards(["a", "b", "c"])
}

fn thunderforest(style: &str) -> TileProvider {
    TileProvider::new(
        format!("thunderforest-{}", style),
        format!("Maps (c) Thundeforest; {}, ODbL", OSM_DATA),
        format!(
            "https://{{s}}.tile.thunderforest.com/{}/{{z}}/{{x}}/{{y}}.png?apikey={{k}}",
            style
        ),
    )
    .with_shards(["a", "b", "c"])
}

fn stamen_toner() -> TileProvider {
    TileProvider::new(
        "stamen-toner",
        format!("Maps (c) Stamen; {}, ODbL", OSM_DATA),
        "http://{s}.tile.stamen.com/toner/{z}/{x}/{y}.png",
    )
    .with_shards(["a", "b", "c", "d"])
}

fn open_topo_map() -> TileProvider {
    TileProvider::new(
        "opentopomap",
        format!(
            "Maps (c) OpenTopoMap [CC-BY-SA]; {} [ODbL]; Data (c) SRTM",
            OSM_DATA
        ),
        "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    )
    .with_shards(["a", "b", "c"])
}

fn wikimedia() -> TileProvider {
    TileProvider::new(
        "wikimedia",
        format!("Map (c) Wikimedia; {}, ODbL.", OSM_DATA),
        "https://maps.wikimedia.org/osm-intl/{z}/{x}/{y}.png",
    )
}

fn carto(name: &str, style: &str) -> TileProvider {
    TileProvider::new(
        format!("carto-{}", name),
        format!("Map (c) Carto [CC BY 3.0] {}, ODbL.", OSM_DATA),
        format!(
            "https://cartodb-basemaps-{{s}}.global.ssl.fastly.net/{}/{{z}}/{{x}}/{{y}}.png",
            style
        ),
    )
    .with_shards(["a", "b", "c", "d"])
}

fn arcgis_world_imagery() -> TileProvider {
    TileProvider::new(
        "arcgis-worldimagery",
        "Source: Esri, Maxar, GeoEye, Earthstar Geographics, CNES/Airbus DS, USDA, USGS, \
         AeroGRID, IGN, and the GIS User Community",
        "https://server.arcgisonline.com/arcgis/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
    )
    .with_ignore_not_found(true)
}

impl TileProvider {
    /// All built-in providers keyed by name.
    pub fn builtin() -> BTreeMap<String, TileProvider> {
        [
            open_street_maps(),
            thunderforest("landscape"),
            thunderforest("outdoors"),
            thunderforest("transport"),
            stamen_toner(),
            open_topo_map(),
            wikimedia(),
            carto("light", "light_all"),
            carto("dark", "dark_all"),
            arcgis_world_imagery(),
            TileProvider::none(),
        ]
        .into_iter()
        .map(|p| (p.name.clone(), p))
        .collect()
    }

    /// Looks up a built-in provider by name.
    pub fn lookup(name: &str) -> Option<TileProvider> {
        Self::builtin().remove(name)
    }
}
