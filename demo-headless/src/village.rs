//! Builds the demo map: a stone plaza with a row of wooden houses.

use fire_spread_core::{BlockBox, BlockPos, BlockType, ChunkedGrid, GridError, RegionDefinition};

/// Ground level; houses stand on `GROUND_Y + 1`
pub const GROUND_Y: i32 = 64;

/// Footprint edge of a house
const HOUSE_SIZE: i32 = 7;

/// Wall height below the roof
const WALL_HEIGHT: i32 = 4;

const NAMES: [&str; 6] = ["Bakery", "Smithy", "Chapel", "Granary", "Tavern", "Stables"];

/// Bounding box of house `index`
pub fn house_bounds(index: usize, spacing: i32) -> BlockBox {
    let x = index as i32 * (HOUSE_SIZE + spacing);
    BlockBox::new(
        BlockPos::new(x, GROUND_Y + 1, 0),
        BlockPos::new(x + HOUSE_SIZE - 1, GROUND_Y + WALL_HEIGHT + 1, HOUSE_SIZE - 1),
    )
}

/// Build `houses` houses `spacing` blocks apart and return their region definitions.
///
/// # Errors
/// Fails only if a block lands outside the chunks loaded for the plaza.
pub fn build(
    grid: &mut ChunkedGrid,
    houses: usize,
    spacing: i32,
) -> Result<Vec<RegionDefinition>, GridError> {
    let last = house_bounds(houses.saturating_sub(1), spacing);
    let plaza = BlockBox::new(
        BlockPos::new(-4, GROUND_Y, -4),
        BlockPos::new(last.maximum().x + 4, GROUND_Y, HOUSE_SIZE + 3),
    );
    let sky = BlockBox::new(
        plaza.minimum(),
        BlockPos::new(plaza.maximum().x, GROUND_Y + WALL_HEIGHT + 4, plaza.maximum().z),
    );
    grid.load_box(&sky);
    grid.fill_box(&plaza, BlockType::Stone)?;

    let mut regions = Vec::with_capacity(houses);
    for index in 0..houses {
        let bounds = house_bounds(index, spacing);
        build_house(grid, &bounds)?;
        regions.push(RegionDefinition {
            name: NAMES[index % NAMES.len()].to_string(),
            start: bounds.minimum(),
            end: bounds.maximum(),
        });
    }
    Ok(regions)
}

fn build_house(grid: &mut ChunkedGrid, bounds: &BlockBox) -> Result<(), GridError> {
    let (min, max) = (bounds.minimum(), bounds.maximum());
    let roof_y = max.y;

    // Plank shell with a hollow inside
    grid.fill_box(bounds, BlockType::OakPlanks)?;
    let inside = BlockBox::new(
        BlockPos::new(min.x + 1, min.y, min.z + 1),
        BlockPos::new(max.x - 1, roof_y - 1, max.z - 1),
    );
    grid.fill_box(&inside, BlockType::Air)?;

    // Log pillars on the corners
    for (x, z) in [(min.x, min.z), (min.x, max.z), (max.x, min.z), (max.x, max.z)] {
        let pillar = BlockBox::new(BlockPos::new(x, min.y, z), BlockPos::new(x, roof_y - 1, z));
        grid.fill_box(&pillar, BlockType::OakLog)?;
    }

    // Door and windows
    let mid_x = (min.x + max.x) / 2;
    let door = BlockBox::new(BlockPos::new(mid_x, min.y, min.z), BlockPos::new(mid_x, min.y + 1, min.z));
    grid.fill_box(&door, BlockType::Air)?;
    let window = BlockBox::new(
        BlockPos::new(mid_x - 1, min.y + 2, max.z),
        BlockPos::new(mid_x + 1, min.y + 2, max.z),
    );
    grid.fill_box(&window, BlockType::Glass)?;

    // Furnishing
    let rug = BlockBox::new(
        BlockPos::new(min.x + 2, min.y, min.z + 2),
        BlockPos::new(max.x - 2, min.y, max.z - 2),
    );
    grid.fill_box(&rug, BlockType::Carpet)?;
    let shelf = BlockBox::new(
        BlockPos::new(min.x + 1, min.y, max.z - 1),
        BlockPos::new(min.x + 1, min.y + 1, max.z - 1),
    );
    grid.fill_box(&shelf, BlockType::Bookshelf)?;
    Ok(())
}

/// Spot just inside the door of house `index`, where the arsonist starts
pub fn ignition_point(index: usize, spacing: i32) -> BlockPos {
    let bounds = house_bounds(index, spacing);
    let mid_x = (bounds.minimum().x + bounds.maximum().x) / 2;
    BlockPos::new(mid_x, GROUND_Y + 1, bounds.minimum().z + 1)
}
