/// Integration tests for meshing correctness
/// These tests validate that the face-culling mesher emits exactly the exposed faces
use cgmath::{InnerSpace, Vector3};
use voxel_world::{build_mesh, BlockGrid, BlockType, Mesh, Vertex};

fn position(vertex: &Vertex) -> Vector3<f32> {
    Vector3::from(vertex.position)
}

fn triangles(mesh: &Mesh) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
    mesh.indices.chunks_exact(3).map(move |triangle| {
        [
            &mesh.vertices[triangle[0] as usize],
            &mesh.vertices[triangle[1] as usize],
            &mesh.vertices[triangle[2] as usize],
        ]
    })
}

#[test]
fn test_single_voxel_generates_six_faces() {
    // A single solid voxel surrounded by air should generate 6 faces (one per side)
    let grid = BlockGrid::from_fn(3, 3, |x, y, z| {
        if (x, y, z) == (1, 1, 1) {
            BlockType::STONE
        } else {
            BlockType::AIR
        }
    });
    let mesh = build_mesh(&grid);

    assert_eq!(mesh.quad_count(), 6);
    assert_eq!(mesh.vertices.len(), 24);
    assert_eq!(mesh.indices.len(), 36);

    // Every vertex lies on the voxel's unit cube
    for vertex in &mesh.vertices {
        for axis in vertex.position {
            assert!(axis == 1.0 || axis == 2.0);
        }
    }
}

#[test]
fn test_full_chunk_only_emits_boundary_faces() {
    let grid = BlockGrid::filled(16, 64, BlockType::DIRT);
    let mesh = build_mesh(&grid);

    // Surface area: four 16x64 walls and two 16x16 caps
    assert_eq!(mesh.quad_count(), 4 * 16 * 64 + 2 * 16 * 16);
    assert_eq!(mesh.quad_count(), 4608);

    // Every face lies on the chunk boundary, facing out
    for quad in mesh.vertices.chunks_exact(4) {
        let normal = Vector3::from(quad[0].normal);
        for vertex in quad {
            let p = position(vertex);
            let on_boundary = match normal {
                n if n.x > 0.5 => p.x == 16.0,
                n if n.x < -0.5 => p.x == 0.0,
                n if n.y > 0.5 => p.y == 64.0,
                n if n.y < -0.5 => p.y == 0.0,
                n if n.z > 0.5 => p.z == 16.0,
                _ => p.z == 0.0,
            };
            assert!(on_boundary, "interior face at {p:?} facing {normal:?}");
        }
    }
}

#[test]
fn test_empty_grid_gives_empty_mesh() {
    let mesh = build_mesh(&BlockGrid::filled(16, 64, BlockType::AIR));
    assert!(mesh.is_empty());
    assert_eq!(mesh.quad_count(), 0);
    assert!(mesh.vertex_floats().is_empty());
}

#[test]
fn test_triangles_wind_counter_clockwise_around_their_normal() {
    let mut rng = fastrand::Rng::with_seed(1234);
    let grid = BlockGrid::from_fn(8, 8, |_, _, _| {
        if rng.bool() {
            BlockType::random_solid(&mut rng)
        } else {
            BlockType::AIR
        }
    });
    let mesh = build_mesh(&grid);
    assert!(!mesh.is_empty());

    for [a, b, c] in triangles(&mesh) {
        let normal = Vector3::from(a.normal);
        assert_eq!(normal.magnitude(), 1.0);
        assert_eq!(Vector3::from(b.normal), normal);
        assert_eq!(Vector3::from(c.normal), normal);

        let cross = (position(b) - position(a)).cross(position(c) - position(a));
        assert!(cross.dot(normal) > 0.0, "clockwise triangle facing {normal:?}");
    }
}

#[test]
fn test_tex_coords_span_the_unit_square() {
    let grid = BlockGrid::from_fn(4, 4, |x, _, z| {
        if x == z {
            BlockType::GRASS
        } else {
            BlockType::AIR
        }
    });
    let mesh = build_mesh(&grid);

    for quad in mesh.vertices.chunks_exact(4) {
        let uvs: Vec<[f32; 2]> = quad.iter().map(|vertex| vertex.tex_coords).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    }
}

#[test]
fn test_side_faces_have_v_pointing_up() {
    let mesh = build_mesh(&BlockGrid::filled(1, 1, BlockType::WOOD));
    for quad in mesh.vertices.chunks_exact(4) {
        if quad[0].normal[1] != 0.0 {
            continue;
        }
        // Corner 3 (v = 1) sits above corner 0 (v = 0)
        assert!(quad[3].position[1] > quad[0].position[1]);
    }
}

#[test]
fn test_vertex_floats_are_interleaved_in_stride_eight() {
    let mesh = build_mesh(&BlockGrid::filled(1, 1, BlockType::STONE));
    let floats = mesh.vertex_floats();
    assert_eq!(floats.len(), 24 * 8);
    for (vertex, chunk) in mesh.vertices.iter().zip(floats.chunks_exact(8)) {
        assert_eq!(&chunk[0..3], &vertex.position);
        assert_eq!(&chunk[3..6], &vertex.normal);
        assert_eq!(&chunk[6..8], &vertex.tex_coords);
    }
    assert_eq!(mesh.byte_size(), (24 * 32 + 36 * 4) as u64);
}

#[test]
fn test_ids_round_trip_into_the_same_mesh() {
    let ids: Vec<u8> = (0..2 * 3 * 2).map(|i| (i % 5) as u8).collect();
    let grid = BlockGrid::from_ids(2, 3, &ids).unwrap();
    assert_eq!(grid.solid_count(), ids.iter().filter(|id| **id != 0).count());
    assert_eq!(build_mesh(&grid), build_mesh(&grid.clone()));
}
