//! Model CLI commands
//!
//! Commands for inspecting, dumping and tracing `[meshes]` model files.

use std::path::Path;

use crate::formats::meshes::{
    DecodeOptions, DecodeOutcome, find_texture, model_info, read_model_with, render_transcript,
    texture_file_name,
};

/// Turn a partial decode into an error after its output was written.
fn check_complete(outcome: &DecodeOutcome) -> anyhow::Result<()> {
    if let Some(failure) = &outcome.failure {
        eprintln!(
            "Decode stopped at node {} (offset {}): {}",
            failure.node_index, failure.offset, failure.error
        );
        anyhow::bail!("model decoded only partially ({:?} error)", failure.error.kind());
    }
    Ok(())
}

/// Inspect a model file and display its structure.
pub fn inspect(path: &Path, output: Option<&Path>, options: &DecodeOptions) -> anyhow::Result<()> {
    println!("Inspecting model file: {}", path.display());
    println!();

    let outcome = read_model_with(path, options)?;
    let info = model_info(&path.display().to_string(), &outcome);

    if let Some(output) = output {
        let json = serde_json::to_string_pretty(&info)?;
        std::fs::write(output, json)?;
        println!("Written to: {}", output.display());
        return check_complete(&outcome);
    }

    println!("Model Information");
    println!("=================");
    println!("Nodes:       {} ({} decoded)", info.node_count, info.decoded_node_count);
    println!("Meshes:      {} ({} decoded)", info.declared_mesh_count, info.meshes.len());
    println!("Materials:   {}", info.materials.len());
    println!();

    println!("Meshes:");
    println!("-------");
    for mesh in &info.meshes {
        println!(
            "  - {} on '{}' [{}] {} vertices, {} triangles, {} submeshes, end flag {}",
            mesh.name,
            mesh.node_name,
            mesh.layout,
            mesh.vertex_count,
            mesh.triangle_count,
            mesh.submesh_count,
            mesh.trailer_flag
        );
    }

    if !info.materials.is_empty() {
        println!();
        println!("Materials:");
        println!("----------");
        for name in &info.materials {
            println!("  - {name}");
        }
    }

    check_complete(&outcome)
}

/// Dump the decoded document as JSON.
pub fn dump(path: &Path, output: Option<&Path>, options: &DecodeOptions) -> anyhow::Result<()> {
    let outcome = read_model_with(path, options)?;
    let json = serde_json::to_string_pretty(&outcome.document)?;

    match output {
        Some(output) => {
            std::fs::write(output, json)?;
            println!("Written to: {}", output.display());
        }
        None => println!("{json}"),
    }

    check_complete(&outcome)
}

/// Print the field-by-field decode trace.
pub fn trace(path: &Path, output: Option<&Path>, options: &DecodeOptions) -> anyhow::Result<()> {
    let options = options.clone().with_trace(true);
    let outcome = read_model_with(path, &options)?;
    let transcript = render_transcript(&outcome.trace);

    match output {
        Some(output) => {
            std::fs::write(output, transcript)?;
            println!("Written {} entries to: {}", outcome.trace.len(), output.display());
        }
        None => print!("{transcript}"),
    }

    check_complete(&outcome)
}

/// List header material definitions, optionally resolving their textures.
pub fn materials(
    path: &Path,
    textures: Option<&Path>,
    options: &DecodeOptions,
) -> anyhow::Result<()> {
    let outcome = read_model_with(path, options)?;
    let definitions = outcome.document.material_definitions()?;

    println!("Materials ({}):", definitions.len());
    for material in &definitions {
        let alpha = if material.needs_alpha_blend() { " [alpha]" } else { "" };
        println!("  {}{}", material.name, alpha);

        for (key, value) in &material.texture_maps {
            let file = texture_file_name(value);
            match textures {
                Some(dir) => match find_texture(dir, value)? {
                    Some(found) => println!("    {key}: {file} -> {}", found.display()),
                    None => println!("    {key}: {file} (not found)"),
                },
                None => println!("    {key}: {file}"),
            }
        }
    }

    let undefined: Vec<_> = outcome
        .document
        .materials()
        .iter()
        .filter(|name| !definitions.iter().any(|d| &d.name == *name))
        .collect();
    if !undefined.is_empty() {
        println!();
        println!("Mesh materials without a definition:");
        for name in undefined {
            println!("  - {name}");
        }
    }

    check_complete(&outcome)
}
