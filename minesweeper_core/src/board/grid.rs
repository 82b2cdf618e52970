use core::error::Error;
use core::fmt;

use crate::board::config::GridConfig;
use crate::board::tile::TileStore;
use crate::board::types::{GridPosition, Point, TileId};

/// ムーア近傍のオフセット（y: -1..=1 の外側ループ、x: -1..=1 の内側ループ、中心を除く）。
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// グリッドの生成・更新に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum GridError {
    /// セルの大きさが正の有限値ではない。
    InvalidCellSize,
    /// 指定座標がグリッドの範囲外。
    OutOfRange {
        /// 列。
        x: i32,
        /// 行。
        y: i32,
    },
    /// 高さが 0。
    ZeroHeight,
    /// 幅が 0。
    ZeroWidth,
}

impl fmt::Display for GridError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidCellSize => f.write_str("cell size must be a positive finite number"),
            Self::OutOfRange { x, y } => write!(f, "grid position ({x}, {y}) is out of range"),
            Self::ZeroHeight => f.write_str("grid height must be positive"),
            Self::ZeroWidth => f.write_str("grid width must be positive"),
        }
    }
}

impl Error for GridError {}

/// 固定サイズの矩形領域に置かれたタイルの空間インデックス。
///
/// 各マスはタイルのハンドル（`TileId`）を高々 1 つ保持する。タイル本体は
/// 外部の `TileStore` が所有する。
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    /// グリッド中心のワールド座標。
    anchor: Point,
    /// セル 1 つ分のワールド上の大きさ。
    cell_size: f64,
    /// 行数。
    height: u16,
    /// 行優先（`y * width + x`）のスロット。
    slots: Vec<Option<TileId>>,
    /// 列数。
    width: u16,
}

impl Grid {
    /// グリッド中心のワールド座標を返す。
    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Point {
        self.anchor
    }

    /// セルの大きさを返す。
    #[inline]
    #[must_use]
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// 設定からグリッドを生成する。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す：
    /// - `GridError::ZeroWidth` / `GridError::ZeroHeight`: 幅または高さが 0
    /// - `GridError::InvalidCellSize`: セルの大きさが正の有限値でない
    ///
    #[inline]
    pub fn from_config(config: GridConfig) -> Result<Self, GridError> {
        if config.width == u16::MIN {
            return Err(GridError::ZeroWidth);
        }

        if config.height == u16::MIN {
            return Err(GridError::ZeroHeight);
        }

        validate_cell_size(config.cell_size)?;

        let len = usize::from(config.width)
            .checked_mul(usize::from(config.height))
            .unwrap_or(usize::MIN);

        Ok(Self {
            anchor: config.anchor,
            cell_size: config.cell_size,
            height: config.height,
            slots: vec![None; len],
            width: config.width,
        })
    }

    /// 行数を返す。
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// 座標がグリッドの範囲内（`0 <= x < width` かつ `0 <= y < height`）かを返す。
    #[inline]
    #[must_use]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < i32::from(self.width) && y >= 0 && y < i32::from(self.height)
    }

    /// マスの総数（`width * height`）を返す。
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 常に `false`（幅・高さは正）。
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// タイルのムーア近傍にあるタイルを返す。
    ///
    /// タイルがグリッドに無い場合は空を返す。順序は `NEIGHBOR_OFFSETS` の走査順。
    #[inline]
    #[must_use]
    pub fn neighbors(&self, tile: TileId) -> Vec<TileId> {
        match self.try_get_grid_position(tile) {
            Some(position) => self.neighbors_at(position),
            None => Vec::new(),
        }
    }

    /// 座標のムーア近傍にあるタイルを返す（範囲内かつ配置済みのマスのみ）。
    #[inline]
    #[must_use]
    pub fn neighbors_at(&self, position: GridPosition) -> Vec<TileId> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| position.offset(dx, dy))
            .filter_map(|neighbor| self.tile_at(neighbor))
            .collect()
    }

    /// 幅・高さ・セルの大きさを指定してグリッドを生成する（中心はワールド原点）。
    ///
    /// # Errors
    ///
    /// `Grid::from_config` と同じ。
    ///
    #[inline]
    pub fn new(width: u16, height: u16, cell_size: f64) -> Result<Self, GridError> {
        Self::from_config(GridConfig::new(width, height, cell_size))
    }

    /// 左下のマス `(0, 0)` のワールド座標を返す。
    ///
    /// グリッドが `anchor` を中心に配置されるよう `(width - 1, height - 1) / 2` セル分ずらす。
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Point {
        let half_w = f64::from(self.width.saturating_sub(1)) / 2.0;
        let half_h = f64::from(self.height.saturating_sub(1)) / 2.0;

        Point::new(
            half_w.mul_add(-self.cell_size, self.anchor.x),
            half_h.mul_add(-self.cell_size, self.anchor.y),
        )
    }

    /// 全マスの座標を行優先（y が外側、x が内側）で列挙する。
    #[inline]
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + use<> {
        let width = i32::from(self.width);
        let height = i32::from(self.height);

        (0..height).flat_map(move |y| (0..width).map(move |x| GridPosition::new(x, y)))
    }

    /// セルの大きさを変更する。
    ///
    /// # Errors
    ///
    /// 正の有限値でない場合、`GridError::InvalidCellSize` を返す。
    ///
    #[inline]
    pub fn set_cell_size(&mut self, cell_size: f64) -> Result<(), GridError> {
        validate_cell_size(cell_size)?;
        self.cell_size = cell_size;
        Ok(())
    }

    /// マスにタイルを割り当てる。既存の割り当ては上書きされる。
    ///
    /// # Errors
    ///
    /// 座標が範囲外の場合、`GridError::OutOfRange` を返す。
    ///
    #[inline]
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileId) -> Result<(), GridError> {
        let slot = self
            .slot_index(x, y)
            .and_then(|index| self.slots.get_mut(index));

        match slot {
            Some(value) => {
                *value = Some(tile);
                Ok(())
            }
            None => {
                tracing::warn!(x, y, tile = tile.raw(), "rejected out-of-range tile placement");
                Err(GridError::OutOfRange { x, y })
            }
        }
    }

    /// 座標からスロットのインデックスを求める。範囲外なら `None`。
    fn slot_index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.is_valid_position(x, y) {
            return None;
        }

        let col = usize::try_from(x).ok()?;
        let row = usize::try_from(y).ok()?;

        row.checked_mul(usize::from(self.width))?.checked_add(col)
    }

    /// 近傍にある爆弾の数を返す。
    ///
    /// 呼び出しのたびに近傍を数え直す（キャッシュしない）。
    #[inline]
    #[must_use]
    pub fn surrounding_bombs<S: TileStore + ?Sized>(&self, tiles: &S, tile: TileId) -> u8 {
        let count = self
            .neighbors(tile)
            .into_iter()
            .filter(|&neighbor| tiles.is_bomb(neighbor))
            .count();

        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// 座標のタイルを返す（`try_get_tile` の座標版）。
    #[inline]
    #[must_use]
    pub fn tile_at(&self, position: GridPosition) -> Option<TileId> {
        self.try_get_tile(position.x, position.y)
    }

    /// タイルの座標を返す。
    ///
    /// 行優先で全マスを走査し、最初に一致した座標を返す。
    #[inline]
    #[must_use]
    pub fn try_get_grid_position(&self, tile: TileId) -> Option<GridPosition> {
        self.positions()
            .find(|&position| self.tile_at(position) == Some(tile))
    }

    /// 座標のタイルを返す。範囲外または未配置なら `None`。
    #[inline]
    #[must_use]
    pub fn try_get_tile(&self, x: i32, y: i32) -> Option<TileId> {
        let index = self.slot_index(x, y)?;
        self.slots.get(index).copied().flatten()
    }

    /// 列数を返す。
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// マス `(x, y)` の中心のワールド座標を返す（`origin + (x, y) * cell_size`）。
    ///
    /// 範囲外の座標にもそのまま外挿した値を返す。
    #[inline]
    #[must_use]
    pub fn world_position(&self, x: i32, y: i32) -> Point {
        let origin = self.origin();

        Point::new(
            f64::from(x).mul_add(self.cell_size, origin.x),
            f64::from(y).mul_add(self.cell_size, origin.y),
        )
    }
}

/// セルの大きさが正の有限値かを検証する。
fn validate_cell_size(cell_size: f64) -> Result<(), GridError> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidCellSize)
    }
}
