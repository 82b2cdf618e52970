use core::error::Error;
use core::fmt;
use std::collections::HashSet;

use crate::board::config::GridConfig;
use crate::board::grid::{Grid, GridError};
use crate::board::tile::{Tile, TileArena};
use crate::board::types::{GridPosition, TileId};
use crate::reveal::Revealer;

/// 64-bit 線形合同法 (LCG) の簡易 RNG。
/// - rand クレート不使用
/// - `seed` で決定的に再現可能
#[derive(Debug, Clone, Copy)]
struct Lcg64 {
    /// 内部状態。
    state: u64,
}

impl Lcg64 {
    /// LCG の内部状態を `seed` から初期化する。
    #[inline]
    const fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    /// `0..bound` の一様な値を返す（`bound == 0` なら 0）。
    fn next_below(&mut self, bound: usize) -> usize {
        let bound_u64 = u64::try_from(bound).unwrap_or(u64::MAX);
        let product = u64::from(self.next_u32()).wrapping_mul(bound_u64);
        usize::try_from(product.wrapping_shr(32)).unwrap_or(usize::MIN)
    }

    /// 次の u32 を生成する（上位 32bit を返す）。
    #[inline]
    fn next_u32(&mut self) -> u32 {
        const LCG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
        const LCG_INCREMENT: u64 = 1_442_695_040_888_963_407;

        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);

        u32::try_from(self.state >> 32).unwrap_or(u32::MAX)
    }
}

/// 盤面の生成に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LayoutError {
    /// タイル置き場のハンドルが枯渇した。
    ArenaFull,
    /// グリッドの生成または配置に失敗した。
    Grid(GridError),
    /// 爆弾数がマスの総数を超えている。
    TooManyBombs {
        /// 要求された爆弾数。
        bombs: u32,
        /// マスの総数。
        cells: usize,
    },
}

impl fmt::Display for LayoutError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ArenaFull => f.write_str("tile arena has no free handles"),
            Self::Grid(err) => write!(f, "grid error: {err}"),
            Self::TooManyBombs { bombs, cells } => {
                write!(f, "{bombs} bombs do not fit into {cells} cells")
            }
        }
    }
}

impl Error for LayoutError {
    #[inline]
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Self::Grid(ref err) => Some(err),
            Self::ArenaFull | Self::TooManyBombs { .. } => None,
        }
    }
}

impl From<GridError> for LayoutError {
    #[inline]
    fn from(err: GridError) -> Self {
        Self::Grid(err)
    }
}

/// 全マスにタイルを配置済みのグリッドと、そのタイル置き場。
#[derive(Clone, Debug)]
pub struct Layout {
    /// 空間インデックス。
    grid: Grid,
    /// タイル本体。
    tiles: TileArena,
}

impl Layout {
    /// 爆弾の数を返す。
    #[inline]
    #[must_use]
    pub fn bomb_count(&self) -> usize {
        self.tiles.iter().filter(|(_id, tile)| tile.is_bomb()).count()
    }

    /// 指定座標に爆弾を置いた盤面を生成する。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す：
    /// - `LayoutError::Grid`: 設定が不正、または爆弾の座標が範囲外
    /// - `LayoutError::ArenaFull`: タイルのハンドルが枯渇した
    ///
    #[inline]
    pub fn from_bombs(config: GridConfig, bombs: &[GridPosition]) -> Result<Self, LayoutError> {
        let grid = config.build()?;

        if let Some(outside) = bombs
            .iter()
            .find(|position| !grid.is_valid_position(position.x, position.y))
        {
            return Err(LayoutError::Grid(GridError::OutOfRange {
                x: outside.x,
                y: outside.y,
            }));
        }

        let bomb_set: HashSet<GridPosition> = bombs.iter().copied().collect();
        Self::fill(grid, |position, _index| bomb_set.contains(&position))
    }

    /// グリッドの全マスにタイルを生成して配置する。
    fn fill<F>(mut grid: Grid, is_bomb: F) -> Result<Self, LayoutError>
    where
        F: Fn(GridPosition, usize) -> bool,
    {
        let mut tiles = TileArena::new();

        for (index, position) in grid.positions().enumerate() {
            let id = tiles
                .insert(Tile::new(is_bomb(position, index)))
                .ok_or(LayoutError::ArenaFull)?;
            grid.set_tile(position.x, position.y, id)?;
        }

        Ok(Self { grid, tiles })
    }

    /// `seed` から決定的に爆弾を `bombs` 個配置した盤面を生成する。
    ///
    /// 爆弾のマスは重複なしの一様抽出で選ぶ。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す：
    /// - `LayoutError::Grid`: 設定が不正
    /// - `LayoutError::TooManyBombs`: 爆弾数がマスの総数を超えている
    /// - `LayoutError::ArenaFull`: タイルのハンドルが枯渇した
    ///
    #[inline]
    pub fn generate(config: GridConfig, bombs: u32, seed: u64) -> Result<Self, LayoutError> {
        let grid = config.build()?;
        let cells = grid.len();
        let bomb_total = usize::try_from(bombs).unwrap_or(usize::MAX);

        if bomb_total > cells {
            return Err(LayoutError::TooManyBombs { bombs, cells });
        }

        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            bombs,
            seed,
            "generating layout"
        );

        let bomb_cells = choose_cells(cells, bomb_total, seed);
        Self::fill(grid, |_position, index| bomb_cells.contains(&index))
    }

    /// グリッドを返す。
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// グリッドとタイル置き場に分解する。
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Grid, TileArena) {
        (self.grid, self.tiles)
    }

    /// グリッドへの参照とタイル置き場への可変参照を同時に返す。
    #[inline]
    #[must_use]
    pub const fn parts_mut(&mut self) -> (&Grid, &mut TileArena) {
        (&self.grid, &mut self.tiles)
    }

    /// `start` を公開する（`Revealer::reveal` の簡易版）。
    #[inline]
    pub fn reveal(&mut self, start: TileId) -> Vec<TileId> {
        Revealer::new(&self.grid).reveal(&mut self.tiles, start)
    }

    /// 座標のタイルを返す。
    #[inline]
    #[must_use]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<TileId> {
        self.grid.try_get_tile(x, y)
    }

    /// タイル置き場を返す。
    #[inline]
    #[must_use]
    pub const fn tiles(&self) -> &TileArena {
        &self.tiles
    }

    /// タイル置き場への可変参照を返す。
    #[inline]
    #[must_use]
    pub const fn tiles_mut(&mut self) -> &mut TileArena {
        &mut self.tiles
    }
}

/// `0..cells` から `count` 個を重複なしで選ぶ（部分 Fisher-Yates）。
fn choose_cells(cells: usize, count: usize, seed: u64) -> HashSet<usize> {
    let mut rng = Lcg64::new(seed);
    let mut order: Vec<usize> = (0..cells).collect();

    for i in 0..count.min(cells) {
        let remaining = cells.saturating_sub(i);
        let pick = i.saturating_add(rng.next_below(remaining));
        if pick < cells {
            order.swap(i, pick);
        }
    }

    order.into_iter().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::{Layout, LayoutError, choose_cells};
    use crate::board::config::GridConfig;
    use crate::board::grid::GridError;
    use crate::board::types::{GridPosition, TileState};

    #[test]
    fn generate_places_exact_bomb_count_on_every_cell() {
        let config = GridConfig::new(9, 9, 1.0);
        let layout = Layout::generate(config, 10, 42).unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(layout.bomb_count(), 10);
        assert_eq!(layout.tiles().len(), 81);
        assert_eq!(layout.tiles().count_in_state(TileState::Hidden), 81);
        assert!(layout.grid().positions().all(|position| layout.grid().tile_at(position).is_some()));
    }

    #[test]
    fn generate_is_deterministic_per_seed() {
        let config = GridConfig::new(16, 16, 1.0);
        let bombs_of = |seed: u64| -> Vec<GridPosition> {
            let layout = Layout::generate(config, 40, seed).unwrap_or_else(|err| panic!("{err}"));
            layout
                .grid()
                .positions()
                .filter(|&position| {
                    layout
                        .grid()
                        .tile_at(position)
                        .and_then(|id| layout.tiles().get(id))
                        .is_some_and(|tile| tile.is_bomb())
                })
                .collect()
        };

        assert_eq!(bombs_of(7), bombs_of(7));
        assert_ne!(bombs_of(7), bombs_of(8));
    }

    #[test]
    fn generate_rejects_too_many_bombs() {
        let config = GridConfig::new(2, 2, 1.0);
        assert!(matches!(
            Layout::generate(config, 5, 0),
            Err(LayoutError::TooManyBombs { bombs: 5, cells: 4 })
        ));

        let full = Layout::generate(config, 4, 0).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(full.bomb_count(), 4);
    }

    #[test]
    fn generate_propagates_config_errors() {
        assert!(matches!(
            Layout::generate(GridConfig::new(0, 2, 1.0), 0, 0),
            Err(LayoutError::Grid(GridError::ZeroWidth))
        ));
    }

    #[test]
    fn from_bombs_uses_exact_positions() {
        let bombs = [GridPosition::new(0, 0), GridPosition::new(2, 1)];
        let layout = Layout::from_bombs(GridConfig::new(3, 2, 1.0), &bombs)
            .unwrap_or_else(|err| panic!("{err}"));

        assert_eq!(layout.bomb_count(), 2);
        let bomb_at = |x: i32, y: i32| {
            layout
                .tile_at(x, y)
                .and_then(|id| layout.tiles().get(id))
                .is_some_and(|tile| tile.is_bomb())
        };
        assert!(bomb_at(0, 0));
        assert!(bomb_at(2, 1));
        assert!(!bomb_at(1, 0));
    }

    #[test]
    fn from_bombs_rejects_positions_outside_grid() {
        let bombs = [GridPosition::new(3, 0)];
        assert!(matches!(
            Layout::from_bombs(GridConfig::new(3, 3, 1.0), &bombs),
            Err(LayoutError::Grid(GridError::OutOfRange { x: 3, y: 0 }))
        ));
    }

    #[test]
    fn choose_cells_never_repeats() {
        for seed in 0_u64..32 {
            let chosen = choose_cells(20, 20, seed);
            assert_eq!(chosen.len(), 20);
            assert!(chosen.iter().all(|&cell| cell < 20));
        }
    }

    #[test]
    fn reveal_through_layout_borrows_both_parts() {
        let mut layout = Layout::from_bombs(GridConfig::new(3, 3, 1.0), &[])
            .unwrap_or_else(|err| panic!("{err}"));
        let Some(center) = layout.tile_at(1, 1) else {
            panic!("center missing");
        };

        assert_eq!(layout.reveal(center).len(), 9);
        assert!(layout.reveal(center).is_empty());

        let (grid, tiles) = layout.parts_mut();
        assert_eq!(grid.len(), tiles.len());
    }
}
