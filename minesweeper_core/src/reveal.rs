use std::collections::{HashSet, VecDeque};

use crate::board::grid::Grid;
use crate::board::tile::TileStore;
use crate::board::types::TileId;

/// クリック 1 回分の公開処理と、爆弾 0 の領域への連鎖公開を行う。
///
/// 状態を持たず、対象のグリッドを参照するだけ。
#[derive(Copy, Clone, Debug)]
pub struct Revealer<'grid> {
    /// 近傍と爆弾数を問い合わせるグリッド。
    grid: &'grid Grid,
}

impl<'grid> Revealer<'grid> {
    /// 参照しているグリッドを返す。
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &'grid Grid {
        self.grid
    }

    /// `grid` を対象に生成する。
    #[inline]
    #[must_use]
    pub const fn new(grid: &'grid Grid) -> Self {
        Self { grid }
    }

    /// `start` を公開し、爆弾 0 のマスから幅優先で連鎖公開する。
    ///
    /// 今回の呼び出しで公開したタイルを公開順（`start`、以降は BFS 順）で返す。
    /// `start` が未公開（`Hidden`）でない場合は何もせず空を返す。
    ///
    /// 旗付きのタイルは連鎖の対象外で、その先へも広がらない。
    #[inline]
    pub fn reveal<S: TileStore + ?Sized>(&self, tiles: &mut S, start: TileId) -> Vec<TileId> {
        let span = tracing::debug_span!("reveal", tile = start.raw());
        let _entered = span.enter();

        if !tiles.reveal(start) {
            tracing::trace!("start tile is not hidden, skipping");
            return Vec::new();
        }

        let mut revealed = vec![start];
        if self.should_reveal_neighbors(tiles, start) {
            self.reveal_neighbors_bfs(tiles, start, &mut revealed);
        }

        tracing::debug!(revealed = revealed.len(), "reveal finished");
        revealed
    }

    /// `start` から幅優先で近傍を公開する。
    ///
    /// 訪問済み集合により各タイルのキュー投入は高々 1 回。
    fn reveal_neighbors_bfs<S: TileStore + ?Sized>(
        &self,
        tiles: &mut S,
        start: TileId,
        revealed: &mut Vec<TileId>,
    ) {
        let mut queue = VecDeque::from([start]);
        let mut visited = HashSet::from([start]);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.grid.neighbors(current) {
                if visited.contains(&neighbor) {
                    continue;
                }

                // Hidden 以外（公開済み・旗付き）は触らない。
                if !tiles.reveal(neighbor) {
                    continue;
                }

                tracing::trace!(tile = neighbor.raw(), "revealed by cascade");
                visited.insert(neighbor);
                revealed.push(neighbor);

                if self.should_reveal_neighbors(tiles, neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
    }

    /// 近傍に爆弾が無いか（連鎖を続けるか）を返す。
    fn should_reveal_neighbors<S: TileStore + ?Sized>(&self, tiles: &S, tile: TileId) -> bool {
        self.grid.surrounding_bombs(tiles, tile) == u8::MIN
    }
}

#[cfg(test)]
mod tests {
    use super::Revealer;
    use crate::board::grid::Grid;
    use crate::board::tile::{Tile, TileArena, TileStore as _};
    use crate::board::types::{TileId, TileState};

    /// 全マスにタイルを置く。`bombs` の座標は爆弾。
    fn board(width: u16, height: u16, bombs: &[(i32, i32)]) -> (Grid, TileArena) {
        let mut grid = Grid::new(width, height, 1.0).unwrap_or_else(|err| panic!("{err}"));
        let mut arena = TileArena::new();

        for position in grid.positions().collect::<Vec<_>>() {
            let bomb = bombs.contains(&(position.x, position.y));
            let Some(id) = arena.insert(Tile::new(bomb)) else {
                panic!("arena full");
            };
            assert_eq!(grid.set_tile(position.x, position.y, id), Ok(()));
        }

        (grid, arena)
    }

    fn id_at(grid: &Grid, x: i32, y: i32) -> TileId {
        grid.try_get_tile(x, y)
            .unwrap_or_else(|| panic!("no tile at ({x}, {y})"))
    }

    #[test]
    fn cascade_order_is_breadth_first() {
        let (grid, mut arena) = board(5, 1, &[]);
        let revealed = Revealer::new(&grid).reveal(&mut arena, id_at(&grid, 2, 0));

        let expected: Vec<TileId> = [2, 1, 3, 0, 4]
            .iter()
            .map(|&x| id_at(&grid, x, 0))
            .collect();
        assert_eq!(revealed, expected);
    }

    #[test]
    fn flagged_tiles_block_the_cascade() {
        // 3 列目を旗で塞ぐ。
        let (grid, mut arena) = board(5, 3, &[]);
        for y in 0..3 {
            let id = id_at(&grid, 2, y);
            assert!(arena.get_mut(id).is_some_and(Tile::toggle_flag));
        }

        let revealed = Revealer::new(&grid).reveal(&mut arena, id_at(&grid, 0, 1));
        assert_eq!(revealed.len(), 6);

        for y in 0..3 {
            assert_eq!(arena.state(id_at(&grid, 2, y)), Some(TileState::Flagged));
            assert_eq!(arena.state(id_at(&grid, 3, y)), Some(TileState::Hidden));
            assert_eq!(arena.state(id_at(&grid, 4, y)), Some(TileState::Hidden));
        }
    }

    #[test]
    fn flagged_start_tile_is_a_no_op() {
        let (grid, mut arena) = board(2, 2, &[]);
        let start = id_at(&grid, 0, 0);
        assert!(arena.get_mut(start).is_some_and(Tile::toggle_flag));

        assert!(Revealer::new(&grid).reveal(&mut arena, start).is_empty());
        assert_eq!(arena.count_in_state(TileState::Revealed), 0);
    }

    #[test]
    fn cascade_reveals_border_numbers_but_not_bombs() {
        // 右端の列が爆弾。
        let (grid, mut arena) = board(4, 3, &[(3, 0), (3, 1), (3, 2)]);
        let revealed = Revealer::new(&grid).reveal(&mut arena, id_at(&grid, 0, 0));

        assert_eq!(revealed.len(), 9);
        for y in 0..3 {
            assert_eq!(arena.state(id_at(&grid, 2, y)), Some(TileState::Revealed));
            assert_eq!(arena.state(id_at(&grid, 3, y)), Some(TileState::Hidden));
        }
    }

    #[test]
    fn tile_outside_grid_reveals_only_itself() {
        let (grid, mut arena) = board(3, 3, &[]);
        let Some(stray) = arena.insert(Tile::SAFE) else {
            return;
        };

        assert_eq!(Revealer::new(&grid).reveal(&mut arena, stray), vec![stray]);
        assert_eq!(arena.count_in_state(TileState::Revealed), 1);
    }

    #[test]
    fn empty_grid_terminates_immediately() {
        let grid = Grid::new(4, 4, 1.0).unwrap_or_else(|err| panic!("{err}"));
        let mut arena = TileArena::new();
        let Some(id) = arena.insert(Tile::SAFE) else {
            return;
        };

        let revealer = Revealer::new(&grid);
        assert_eq!(revealer.reveal(&mut arena, id), vec![id]);
        assert!(core::ptr::eq(revealer.grid(), &grid));
    }
}
