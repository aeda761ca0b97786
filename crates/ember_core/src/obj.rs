//! Face/vertex mesh loading on top of `tobj`.
//!
//! # Supported Syntax
//!
//! - `v x y z` - vertex position
//! - `vn x y z` - vertex normal
//! - `f a b c` - face from 1-based vertex indices
//! - `f a/na b/nb c/nc` - face with a normal index per corner (files without `vt`)
//! - `f a/ta/na ...` and `f a//na ...` - texture indices are accepted and ignored
//! - faces with more than three corners are fan-triangulated
//! - negative indices count back from the most recent vertex/normal
//!
//! Objects and groups are merged into one mesh. Materials are not loaded.

use std::borrow::Cow;
use std::path::Path;

use ember_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur while loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] tobj::LoadError),

    #[error("Mesh contains no faces")]
    Empty,
}

/// Result type for mesh loading.
pub type MeshResult<T> = Result<T, MeshError>;

/// Load a mesh from a file on disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_obj(&content)?;

    log::info!(
        "Loaded mesh {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse mesh text already in memory.
pub fn parse_obj(content: &str) -> MeshResult<Mesh> {
    let source = two_slot_corners_as_normals(content);
    let mut reader = source.as_bytes();

    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
        |_| Err(tobj::LoadError::OpenFileFailed),
    )?;

    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut normal_indices: Vec<u32> = Vec::new();
    let mut faces_missing_normals = 0usize;
    let mut faces_with_normals = 0usize;

    for model in &models {
        let m = &model.mesh;
        let base = positions.len() as u32;
        let normal_base = normals.len() as u32;

        positions.extend(m.positions.chunks_exact(3).map(|p| Vec3::new(p[0], p[1], p[2])));
        normals.extend(m.normals.chunks_exact(3).map(|n| Vec3::new(n[0], n[1], n[2])));
        indices.extend(m.indices.iter().map(|i| i + base));

        let faces = m.indices.len() / 3;
        if !m.normal_indices.is_empty() && m.normal_indices.len() == m.indices.len() {
            normal_indices.extend(m.normal_indices.iter().map(|n| n + normal_base));
            faces_with_normals += faces;
        } else {
            faces_missing_normals += faces;
        }
    }

    if indices.is_empty() {
        return Err(MeshError::Empty);
    }
    log::debug!("Merged {} objects into one mesh", models.len());

    let mesh = if faces_missing_normals == 0 {
        Mesh::with_normals(positions, indices, normals, normal_indices)
    } else {
        if faces_with_normals > 0 {
            log::warn!(
                "{} faces lack normals, using geometric normals for the whole mesh",
                faces_missing_normals
            );
        }
        Mesh::new(positions, indices)
    };
    Ok(mesh)
}

/// Read `f a/na` corners as vertex/normal pairs.
///
/// Standard OBJ puts a texture index in the second slot; files that declare
/// no `vt` entries use it for the normal instead, so those corners are
/// rewritten to `a//na` before parsing.
fn two_slot_corners_as_normals(content: &str) -> Cow<'_, str> {
    let has_texcoords = content
        .lines()
        .any(|l| l.split_whitespace().next() == Some("vt"));
    if has_texcoords {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len() + content.len() / 8);
    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some("f") {
            out.push('f');
            for corner in tokens {
                out.push(' ');
                match corner.split_once('/') {
                    Some((v, n)) if !n.contains('/') => {
                        out.push_str(v);
                        out.push_str("//");
                        out.push_str(n);
                    }
                    _ => out.push_str(corner),
                }
            }
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    Cow::Owned(out)
}
