//! Minesweeper board core logic.
//!
//! このクレートはタイルの空間インデックス `board` と、爆弾 0 の領域を連鎖的に開く
//! `reveal` を提供します。描画・入力処理はホスト側（ゲームエンジン等）の責務です。

#![forbid(unsafe_code)]

/// グリッド・タイル・座標型を提供するモジュール。
pub mod board;

/// 乱数シードから盤面（爆弾配置）を生成するモジュール。
pub mod layout;

/// 公開処理（幅優先の連鎖公開）を提供するモジュール。
pub mod reveal;

/// `tracing` の出力先を設定するモジュール。
pub mod telemetry;
