//! 3D visualization of packed lattices using kiss3d.

use std::collections::HashMap;

use kiss3d::prelude::*;

use tetracube::{Board, PieceId};

/// Base palette; identifiers cycle through it with varying brightness.
const PALETTE: [(f32, f32, f32); 7] = [
    (1.0, 0.2, 0.2), // red
    (0.2, 1.0, 0.2), // green
    (0.2, 0.2, 1.0), // blue
    (1.0, 1.0, 0.2), // yellow
    (1.0, 0.2, 1.0), // magenta
    (0.2, 1.0, 1.0), // cyan
    (1.0, 0.6, 0.2), // orange
];

/// Returns the display color for a piece identifier.
///
/// The mapping is stable to keep colors consistent across renders.
fn piece_color(id: PieceId) -> Color {
    let index = usize::from(id) % PALETTE.len();
    let shade = 1.0 - 0.25 * ((usize::from(id) / PALETTE.len()) % 3) as f32;
    let (r, g, b) = PALETTE[index];
    Color::new(r * shade, g * shade, b * shade, 1.0)
}

/// Represents a rendered cube in the 3D scene.
struct RenderedCube {
    node: SceneNode3d,
    /// The cube's position when not exploded.
    base_position: Vec3,
    id: PieceId,
}

/// Builds the 3D scene for a board.
///
/// Lattice x, y, z map to world X, Y, Z; the lattice is centered at the
/// origin. Returns the rendered cubes and each piece's centroid (in lattice
/// coordinates) for the explosion animation.
fn build_scene(
    scene: &mut SceneNode3d,
    board: &Board,
) -> (Vec<RenderedCube>, HashMap<PieceId, Vec3>) {
    /// Size of each rendered cube (slightly smaller than 1.0 for visible gaps).
    const CUBE_SIZE: f32 = 0.9;
    const CELL_SPACING: f32 = 1.0;

    let center_offset = -(board.size().saturating_sub(1) as f32) / 2.0;

    let piece_centroids: HashMap<PieceId, Vec3> = board
        .pieces()
        .into_iter()
        .map(|(id, cells)| {
            let position_sum: Vec3 = cells
                .iter()
                .map(|&(x, y, z)| Vec3::new(x as f32, y as f32, z as f32))
                .fold(Vec3::ZERO, |acc, pos| acc + pos);
            (id, position_sum / cells.len() as f32)
        })
        .collect();

    let mut rendered_cubes = Vec::new();
    for ((x, y, z), id) in board.iter() {
        let Some(id) = id else {
            continue;
        };
        let base_position = Vec3::new(
            x as f32 * CELL_SPACING + center_offset,
            y as f32 * CELL_SPACING + center_offset,
            z as f32 * CELL_SPACING + center_offset,
        );
        let node = scene
            .add_cube(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE)
            .set_color(piece_color(id))
            .set_position(base_position);
        rendered_cubes.push(RenderedCube {
            node,
            base_position,
            id,
        });
    }

    (rendered_cubes, piece_centroids)
}

/// Displays all boards in an interactive 3D viewer.
pub fn display(boards: Vec<Board>) {
    pollster::block_on(display_async(boards));
}

async fn display_async(boards: Vec<Board>) {
    if boards.is_empty() {
        println!("No solutions to display");
        return;
    }

    let num_boards = boards.len();
    let mut current_index = 0;

    let mut window = Window::new(&format!(
        "Solution 1/{} - [Left/Right] navigate, [Up/Down] explode, [R] reset",
        num_boards
    ))
    .await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(boards[0].size() as f32 * 2.5 + 1.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(10.0, 10.0, 10.0));

    let (mut rendered_cubes, mut piece_centroids) = build_scene(&mut scene, &boards[current_index]);
    let mut grid_center = lattice_center(&boards[current_index]);

    // how much to expand pieces outward (0.0 = compact)
    let mut explosion_amount: f32 = 0.0;
    const EXPLOSION_SPEED: f32 = 0.05;
    let mut needs_rebuild = false;

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                if action == Action::Press {
                    match key {
                        Key::Up => explosion_amount += EXPLOSION_SPEED,
                        Key::Down => {
                            explosion_amount = (explosion_amount - EXPLOSION_SPEED).max(0.0)
                        }
                        Key::R => explosion_amount = 0.0,
                        Key::Right => {
                            current_index = (current_index + 1) % num_boards;
                            needs_rebuild = true;
                        }
                        Key::Left => {
                            current_index = current_index.checked_sub(1).unwrap_or(num_boards - 1);
                            needs_rebuild = true;
                        }
                        _ => {}
                    }
                }
            }
        }

        if needs_rebuild {
            for mut cube in rendered_cubes.drain(..) {
                cube.node.remove();
            }
            let (new_cubes, new_centroids) = build_scene(&mut scene, &boards[current_index]);
            rendered_cubes = new_cubes;
            piece_centroids = new_centroids;
            grid_center = lattice_center(&boards[current_index]);
            window.set_title(&format!(
                "Solution {}/{} - [Left/Right] navigate, [Up/Down] explode, [R] reset",
                current_index + 1,
                num_boards
            ));
            needs_rebuild = false;
        }

        for cube in &mut rendered_cubes {
            let centroid = piece_centroids
                .get(&cube.id)
                .copied()
                .unwrap_or(grid_center);
            let explosion_direction = (centroid - grid_center).normalize_or_zero();
            cube.node
                .set_position(cube.base_position + explosion_direction * explosion_amount * 2.0);
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}

/// Center of the lattice in lattice coordinates.
fn lattice_center(board: &Board) -> Vec3 {
    let half = board.size().saturating_sub(1) as f32 / 2.0;
    Vec3::new(half, half, half)
}
