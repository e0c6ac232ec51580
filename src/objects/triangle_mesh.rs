use crate::objects::Point;
use crate::objects::model3d::{Material, Triangle};
use std::num::{ParseFloatError, ParseIntError};

#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    #[error("invalid coordinate on line {line}: {source}")]
    Coordinate {
        line: usize,
        #[source]
        source: ParseFloatError,
    },
    #[error("missing coordinate on line {line}")]
    MissingCoordinate { line: usize },
    #[error("invalid face index on line {line}: {source}")]
    Index {
        line: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid vertex index {index} on line {line}")]
    VertexOutOfRange { index: i64, line: usize },
    #[error("face must have at least 3 vertices (line {line})")]
    DegenerateFace { line: usize },
    #[error("asset contains no faces")]
    Empty,
}

/// A named group of faces sharing one material.
#[derive(Clone, Debug, Default)]
pub struct SubMesh {
    pub name: String,
    pub triangles: Vec<Triangle>,
    pub material: Material,
}

/// Parsed mesh asset. Vertices are shared, faces are split into submeshes
/// by `o`/`g` statements in file order.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    vertices: Vec<Point>,
    submeshes: Vec<SubMesh>,
}

impl TriangleMesh {
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    pub fn submeshes_mut(&mut self) -> &mut [SubMesh] {
        &mut self.submeshes
    }

    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.triangles.len()).sum()
    }

    /// Vertices referenced by at least one face, in no particular order.
    pub fn used_vertices(&self) -> impl Iterator<Item = &Point> {
        self.submeshes
            .iter()
            .flat_map(|s| s.triangles.iter())
            .flat_map(|&(a, b, c)| [a, b, c])
            .map(|idx| &self.vertices[idx])
    }

    fn start_group(&mut self, name: &str) {
        match self.submeshes.last_mut() {
            Some(current) if current.triangles.is_empty() => current.name = name.to_string(),
            _ => self.submeshes.push(SubMesh {
                name: name.to_string(),
                ..Default::default()
            }),
        }
    }

    fn current_group(&mut self) -> &mut SubMesh {
        if self.submeshes.is_empty() {
            self.submeshes.push(SubMesh::default());
        }
        let last = self.submeshes.len() - 1;
        &mut self.submeshes[last]
    }

    fn parse_coordinate(part: Option<&str>, line_number: usize) -> Result<f64, ObjError> {
        part.ok_or(ObjError::MissingCoordinate { line: line_number })?
            .parse::<f64>()
            .map_err(|source| ObjError::Coordinate {
                line: line_number,
                source,
            })
    }

    /// Parses a single component of a face line (`v`, `v/vt`, `v//vn`, `v/vt/vn`)
    /// and resolves the vertex index. Negative indices count back from the
    /// most recently declared vertex. Texture and normal indices are ignored.
    fn parse_face_vertex(
        part: &str,
        total_vertices: usize,
        line_number: usize,
    ) -> Result<usize, ObjError> {
        let raw = part.split('/').next().unwrap_or_default();
        let index = raw.parse::<i64>().map_err(|source| ObjError::Index {
            line: line_number,
            source,
        })?;

        let resolved = match index {
            i if i > 0 => i - 1,
            i if i < 0 => total_vertices as i64 + i,
            _ => -1,
        };

        if resolved < 0 || resolved as usize >= total_vertices {
            return Err(ObjError::VertexOutOfRange {
                index,
                line: line_number,
            });
        }

        Ok(resolved as usize)
    }

    /// Parse a Wavefront OBJ body. Polygons are triangulated as fans.
    pub fn from_obj_str(source: &str) -> Result<Self, ObjError> {
        let mut mesh = TriangleMesh::default();

        for (i, line) in source.lines().enumerate() {
            let line_number = i + 1;
            let mut parts = line.split_whitespace();

            let Some(keyword) = parts.next() else {
                continue;
            };

            match keyword {
                "v" => {
                    let x = Self::parse_coordinate(parts.next(), line_number)?;
                    let y = Self::parse_coordinate(parts.next(), line_number)?;
                    let z = Self::parse_coordinate(parts.next(), line_number)?;
                    mesh.vertices.push(Point::new(x, y, z));
                }
                "f" => {
                    let total_vertices = mesh.vertices.len();
                    let indices = parts
                        .map(|part| Self::parse_face_vertex(part, total_vertices, line_number))
                        .collect::<Result<Vec<_>, _>>()?;

                    if indices.len() < 3 {
                        return Err(ObjError::DegenerateFace { line: line_number });
                    }

                    let group = mesh.current_group();
                    for k in 1..indices.len() - 1 {
                        group
                            .triangles
                            .push((indices[0], indices[k], indices[k + 1]));
                    }
                }
                "o" | "g" => {
                    let name = parts.collect::<Vec<_>>().join(" ");
                    mesh.start_group(&name);
                }
                // vt, vn, usemtl, mtllib, s, comments
                _ => {}
            }
        }

        mesh.submeshes.retain(|s| !s.triangles.is_empty());
        if mesh.submeshes.is_empty() {
            return Err(ObjError::Empty);
        }

        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GROUPS: &str = "\
# two quads
o front
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
o back
v 0 0 -1
v 1 0 -1
v 1 1 -1
f 5/1/1 6/2/1 7/3/1
";

    #[test]
    fn test_groups_split_into_submeshes() {
        let mesh = TriangleMesh::from_obj_str(TWO_GROUPS).unwrap();
        let names: Vec<_> = mesh.submeshes().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["front", "back"]);
        assert_eq!(mesh.submeshes()[0].triangles, vec![(0, 1, 2), (0, 2, 3)]);
        assert_eq!(mesh.submeshes()[1].triangles, vec![(4, 5, 6)]);
        assert_eq!(mesh.triangle_count(), 3);
    }

    #[test]
    fn test_faces_without_group_use_default_submesh() {
        let mesh = TriangleMesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.submeshes().len(), 1);
        assert_eq!(mesh.submeshes()[0].name, "");
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let source = "g unused\ng body\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\ng trailing\n";
        let mesh = TriangleMesh::from_obj_str(source).unwrap();
        assert_eq!(mesh.submeshes().len(), 1);
        assert_eq!(mesh.submeshes()[0].name, "body");
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let mesh = TriangleMesh::from_obj_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.submeshes()[0].triangles, vec![(0, 1, 2)]);
    }

    #[test]
    fn test_out_of_range_index() {
        let err = TriangleMesh::from_obj_str("v 0 0 0\nv 1 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, ObjError::VertexOutOfRange { index: 3, line: 3 }));
    }

    #[test]
    fn test_malformed_coordinate() {
        let err = TriangleMesh::from_obj_str("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, ObjError::Coordinate { line: 1, .. }));

        let err = TriangleMesh::from_obj_str("v 0 0\n").unwrap_err();
        assert!(matches!(err, ObjError::MissingCoordinate { line: 1 }));
    }

    #[test]
    fn test_body_without_faces_is_rejected() {
        assert!(matches!(
            TriangleMesh::from_obj_str("<html>not found</html>"),
            Err(ObjError::Empty)
        ));
        assert!(matches!(TriangleMesh::from_obj_str(""), Err(ObjError::Empty)));
    }

    #[test]
    fn test_used_vertices_skip_unreferenced() {
        let mesh =
            TriangleMesh::from_obj_str("v 9 9 9\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 2 3 4\n").unwrap();
        assert!(mesh.used_vertices().all(|v| v.x < 9.0));
        assert_eq!(mesh.used_vertices().count(), 3);
    }
}
