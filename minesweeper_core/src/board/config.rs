use crate::board::grid::{Grid, GridError};
use crate::board::types::Point;

/// 既定の列数。
const DEFAULT_WIDTH: u16 = 5;

/// 既定の行数。
const DEFAULT_HEIGHT: u16 = 5;

/// 既定のセルの大きさ。
const DEFAULT_CELL_SIZE: f64 = 1.0;

/// グリッドの生成パラメータ。
///
/// 値の検証は `build`（`Grid::from_config`）で行う。
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// グリッド中心のワールド座標。
    pub anchor: Point,
    /// セルの大きさ（正の有限値）。
    pub cell_size: f64,
    /// 行数（正）。
    pub height: u16,
    /// 列数（正）。
    pub width: u16,
}

impl GridConfig {
    /// 設定を検証してグリッドを生成する。
    ///
    /// # Errors
    ///
    /// `Grid::from_config` と同じ。
    ///
    #[inline]
    pub fn build(self) -> Result<Grid, GridError> {
        Grid::from_config(self)
    }

    /// マスの総数を返す。
    #[inline]
    #[must_use]
    pub fn cells(self) -> usize {
        usize::from(self.width)
            .checked_mul(usize::from(self.height))
            .unwrap_or(usize::MAX)
    }

    /// 幅・高さ・セルの大きさを指定して生成する（中心はワールド原点）。
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16, cell_size: f64) -> Self {
        Self {
            anchor: Point::ORIGIN,
            cell_size,
            height,
            width,
        }
    }

    /// 中心座標を差し替える。
    #[inline]
    #[must_use]
    pub const fn with_anchor(self, anchor: Point) -> Self {
        Self {
            anchor,
            cell_size: self.cell_size,
            height: self.height,
            width: self.width,
        }
    }
}

impl Default for GridConfig {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_CELL_SIZE)
    }
}
