/// タイルの公開状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum TileState {
    /// 旗が立てられている（公開処理の対象外）。
    Flagged,
    /// 未公開。
    Hidden,
    /// 公開済み。
    Revealed,
}

impl TileState {
    /// 公開済みかどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

/// タイル置き場（アリーナ）内のタイルを指すハンドル。
///
/// グリッドはタイルを所有せず、このハンドルだけを保持する。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TileId(
    /// アリーナ内のインデックス。
    u32,
);

impl TileId {
    /// インデックスから `TileId` を生成する。`u32` に収まらない場合は `None`。
    #[inline]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// アリーナ内のインデックスを返す。
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// 生の値を返す。
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// グリッド上の座標（x: 列、y: 行）。
///
/// 範囲外の値も表現できる。妥当性は `Grid::is_valid_position` で判定する。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GridPosition {
    /// 列。
    pub x: i32,
    /// 行。
    pub y: i32,
}

impl GridPosition {
    /// 座標を生成する。
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// `(dx, dy)` だけずらした座標を返す。オーバーフローする場合は `None`。
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = match self.x.checked_add(dx) {
            Some(value) => value,
            None => return None,
        };
        let y = match self.y.checked_add(dy) {
            Some(value) => value,
            None => return None,
        };

        Some(Self { x, y })
    }
}

/// ワールド座標上の点。
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point {
    /// x 成分。
    pub x: f64,
    /// y 成分。
    pub y: f64,
}

impl Point {
    /// ワールド原点。
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// 点を生成する。
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
