//! Material definitions embedded in the model header xml.
//!
//! The blob holds `<Material Name="..." AlbedoMap="..." Blending="alpha" ... />`
//! elements. Texture map values are editor paths that the game archive stores
//! flattened, see [`texture_file_name`].
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;
use walkdir::WalkDir;

use super::types::ModelDocument;
use crate::error::{Error, Result};

/// One `<Material>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MaterialDefinition {
    pub name: String,
    /// Attributes whose key ends in `Map`, in document order.
    pub texture_maps: IndexMap<String, String>,
    pub blending: Option<String>,
    pub alpha_kill: bool,
    /// Every attribute of the element, including the ones above.
    pub attributes: IndexMap<String, String>,
}

impl MaterialDefinition {
    /// Whether the albedo alpha should drive transparency.
    pub fn needs_alpha_blend(&self) -> bool {
        self.blending.as_deref() == Some("alpha") || self.alpha_kill
    }

    /// Texture maps with their flattened archive file names.
    pub fn texture_files(&self) -> impl Iterator<Item = (&str, String)> {
        self.texture_maps
            .iter()
            .map(|(key, value)| (key.as_str(), texture_file_name(value)))
    }
}

/// Maps that hold non-colour data (normals, shading masks).
pub fn is_non_color_map(key: &str) -> bool {
    key.contains("NormalMap") || key.contains("ShadingMap")
}

fn material_from_element(e: &BytesStart<'_>) -> Result<Option<MaterialDefinition>> {
    let mut material = MaterialDefinition::default();

    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();

        match key.as_str() {
            "Name" => material.name.clone_from(&value),
            "Blending" => material.blending = Some(value.clone()),
            "AlphaKill" => material.alpha_kill = value == "True",
            k if k.ends_with("Map") => {
                material.texture_maps.insert(key.clone(), value.clone());
            }
            _ => {}
        }
        material.attributes.insert(key, value);
    }

    if material.name.is_empty() {
        tracing::debug!("Skipping <Material> without a Name");
        return Ok(None);
    }
    Ok(Some(material))
}

/// Parse every named `<Material>` element of an xml fragment.
///
/// # Errors
/// Returns an error if the xml is malformed.
pub fn parse_material_definitions(xml: &str) -> Result<Vec<MaterialDefinition>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut materials = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) => {
                if e.name().as_ref() == b"Material"
                    && let Some(material) = material_from_element(&e)?
                {
                    materials.push(material);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(materials)
}

impl ModelDocument {
    /// Material definitions from the header xml.
    ///
    /// # Errors
    /// Returns an error if the header xml is malformed.
    pub fn material_definitions(&self) -> Result<Vec<MaterialDefinition>> {
        parse_material_definitions(&self.header.xml)
    }
}

/// The archive file name of a texture map value.
///
/// ```
/// use snowmesh::formats::meshes::texture_file_name;
///
/// assert_eq!(
///     texture_file_name("trucks/textures\\cab_d.tga"),
///     "trucks_textures_cab_d.dds"
/// );
/// ```
pub fn texture_file_name(map_value: &str) -> String {
    map_value.replace(['/', '\\'], "_").replace(".tga", ".dds")
}

/// Search `base_dir` recursively for the file a texture map value refers to.
///
/// The first file (in file name order) whose name ends with the flattened
/// name wins.
///
/// # Errors
/// Returns an error if the directory cannot be walked.
pub fn find_texture<P: AsRef<Path>>(base_dir: P, map_value: &str) -> Result<Option<PathBuf>> {
    let wanted = texture_file_name(map_value);

    for entry in WalkDir::new(base_dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(&wanted) {
            return Ok(Some(entry.into_path()));
        }
    }

    tracing::debug!("No file found for texture {}", wanted);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const XML: &str = r#"
        <_templates>
            <Material Name="cab_paint" AlbedoMap="trucks/cab_d.tga" NormalMap="trucks/cab_n.tga" Blending="alpha"/>
            <Material AlbedoMap="orphan.tga"/>
            <Material Name="glass" AlphaKill="True" ShadingMap="glass_sh.tga">
                <Extra/>
            </Material>
            <Material Name="tyre" AlbedoMap="tyre_d.tga" AlphaKill="False"/>
        </_templates>
    "#;

    #[test]
    fn test_parse_material_definitions() {
        let materials = parse_material_definitions(XML).unwrap();
        let names: Vec<_> = materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["cab_paint", "glass", "tyre"]);

        let cab = &materials[0];
        assert_eq!(cab.blending.as_deref(), Some("alpha"));
        assert_eq!(
            cab.texture_maps.keys().collect::<Vec<_>>(),
            vec!["AlbedoMap", "NormalMap"]
        );
        assert_eq!(cab.attributes.len(), 4);
        assert!(cab.needs_alpha_blend());

        assert!(materials[1].alpha_kill);
        assert!(materials[1].needs_alpha_blend());
        assert!(!materials[2].needs_alpha_blend());
    }

    #[test]
    fn test_texture_files() {
        let materials = parse_material_definitions(XML).unwrap();
        let files: Vec<_> = materials[0].texture_files().collect();
        assert_eq!(
            files,
            vec![
                ("AlbedoMap", "trucks_cab_d.dds".to_string()),
                ("NormalMap", "trucks_cab_n.dds".to_string()),
            ]
        );
        assert!(is_non_color_map("NormalMap"));
        assert!(is_non_color_map("ShadingMap"));
        assert!(!is_non_color_map("AlbedoMap"));
    }

    #[test]
    fn test_malformed_xml() {
        let err = parse_material_definitions("<Material Name=\"a\"></Other>").unwrap_err();
        assert!(matches!(err, Error::XmlError(_)));
    }

    #[test]
    fn test_find_texture() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("pak_trucks_cab_d.dds"), b"dds").unwrap();
        std::fs::write(dir.path().join("trucks_cab_n.png"), b"png").unwrap();

        let found = find_texture(dir.path(), "trucks/cab_d.tga").unwrap();
        assert_eq!(found, Some(nested.join("pak_trucks_cab_d.dds")));

        assert_eq!(find_texture(dir.path(), "trucks/cab_n.tga").unwrap(), None);
    }
}
