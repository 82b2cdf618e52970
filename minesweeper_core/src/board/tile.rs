use crate::board::types::{TileId, TileState};

/// 盤面の 1 マスに置かれるタイル。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Tile {
    /// 爆弾かどうか。
    bomb: bool,
    /// 公開状態。
    state: TileState,
}

impl Tile {
    /// 爆弾でない未公開タイル。
    pub const SAFE: Self = Self::new(false);

    /// 爆弾かどうかを返す。
    #[inline]
    #[must_use]
    pub const fn is_bomb(self) -> bool {
        self.bomb
    }

    /// 未公開のタイルを生成する。
    #[inline]
    #[must_use]
    pub const fn new(bomb: bool) -> Self {
        Self {
            bomb,
            state: TileState::Hidden,
        }
    }

    /// タイルを公開する。
    ///
    /// `Hidden` からのみ遷移し、遷移した場合に `true` を返す。
    #[inline]
    pub const fn reveal(&mut self) -> bool {
        if matches!(self.state, TileState::Hidden) {
            self.state = TileState::Revealed;
            return true;
        }

        false
    }

    /// 公開状態を返す。
    #[inline]
    #[must_use]
    pub const fn state(self) -> TileState {
        self.state
    }

    /// 旗の有無を切り替える（`Hidden` ⇄ `Flagged`）。
    ///
    /// 公開済みのタイルは変化しない。切り替えた場合に `true` を返す。
    #[inline]
    pub const fn toggle_flag(&mut self) -> bool {
        match self.state {
            TileState::Hidden => {
                self.state = TileState::Flagged;
                true
            }
            TileState::Flagged => {
                self.state = TileState::Hidden;
                true
            }
            TileState::Revealed => false,
        }
    }
}

/// 公開処理がタイルに要求する操作。
pub trait TileStore {
    /// 爆弾かどうかを返す。未知のハンドルは `false`。
    fn is_bomb(&self, id: TileId) -> bool;

    /// タイルを公開する。`Hidden` から `Revealed` へ遷移した場合のみ `true`。
    fn reveal(&mut self, id: TileId) -> bool;

    /// 公開状態を返す。未知のハンドルは `None`。
    fn state(&self, id: TileId) -> Option<TileState>;
}

/// タイルを所有する置き場。グリッドは `TileId` で参照する。
#[derive(Clone, Debug, Default)]
pub struct TileArena {
    /// タイル本体。`TileId` の値がインデックス。
    tiles: Vec<Tile>,
}

impl TileArena {
    /// タイルを参照する。
    #[inline]
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// タイルを可変参照する。
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.index())
    }

    /// タイルを追加し、そのハンドルを返す。
    ///
    /// ハンドルが `u32` に収まらなくなった場合は追加せずに `None` を返す。
    #[inline]
    pub fn insert(&mut self, tile: Tile) -> Option<TileId> {
        let id = TileId::from_index(self.tiles.len())?;
        self.tiles.push(tile);
        Some(id)
    }

    /// 空かどうかを返す。
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// 全タイルをハンドル付きで列挙する。
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(index, tile)| TileId::from_index(index).map(|id| (id, tile)))
    }

    /// タイル数を返す。
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// 空の置き場を生成する。
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    /// 指定状態のタイル数を返す。
    #[inline]
    #[must_use]
    pub fn count_in_state(&self, state: TileState) -> usize {
        self.tiles
            .iter()
            .filter(|tile| tile.state() == state)
            .count()
    }
}

impl TileStore for TileArena {
    #[inline]
    fn is_bomb(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|tile| tile.is_bomb())
    }

    #[inline]
    fn reveal(&mut self, id: TileId) -> bool {
        self.get_mut(id).is_some_and(Tile::reveal)
    }

    #[inline]
    fn state(&self, id: TileId) -> Option<TileState> {
        self.get(id).map(|tile| tile.state())
    }
}
