/// グリッドの生成パラメータ。
pub mod config;
/// タイルの空間インデックス（近傍列挙、座標変換）の実装。
pub mod grid;
/// タイルと、それを所有する置き場の実装。
pub mod tile;
pub mod types;

pub type Grid = grid::Grid;
pub type GridConfig = config::GridConfig;
pub type GridError = grid::GridError;
pub type GridPosition = types::GridPosition;
pub type Point = types::Point;
pub type Tile = tile::Tile;
pub type TileArena = tile::TileArena;
pub type TileId = types::TileId;
pub type TileState = types::TileState;
pub use tile::TileStore;
