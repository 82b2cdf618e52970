use core::error::Error;
use core::fmt;

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// ログ出力の初期化に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TelemetryError {
    /// グローバルなサブスクライバが既に設定されている。
    AlreadyInitialized,
}

impl fmt::Display for TelemetryError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AlreadyInitialized => f.write_str("a global tracing subscriber is already set"),
        }
    }
}

impl Error for TelemetryError {}

/// JSON 形式のログを標準エラー出力へ書き出すサブスクライバを設定する。
///
/// # Errors
///
/// 既に設定済みの場合、`TelemetryError::AlreadyInitialized` を返す。
///
#[inline]
pub fn init_json(max_level: Level) -> Result<(), TelemetryError> {
    init_json_with_writer(max_level, std::io::stderr)
}

/// JSON 形式のログを `writer` へ書き出すサブスクライバを設定する。
///
/// # Errors
///
/// 既に設定済みの場合、`TelemetryError::AlreadyInitialized` を返す。
///
#[inline]
pub fn init_json_with_writer<W>(max_level: Level, writer: W) -> Result<(), TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_max_level(max_level)
        .with_writer(writer)
        .try_init()
        .map_err(|_err| TelemetryError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::{TelemetryError, init_json_with_writer};
    use crate::board::config::GridConfig;
    use crate::layout::Layout;
    use tracing::Level;

    #[test]
    fn second_initialization_is_rejected() {
        assert_eq!(init_json_with_writer(Level::TRACE, std::io::sink), Ok(()));
        assert_eq!(
            init_json_with_writer(Level::TRACE, std::io::sink),
            Err(TelemetryError::AlreadyInitialized)
        );

        // サブスクライバ設定後も公開処理がそのまま動く。
        let mut layout = Layout::generate(GridConfig::new(4, 4, 1.0), 0, 1)
            .unwrap_or_else(|err| panic!("{err}"));
        let Some(corner) = layout.tile_at(0, 0) else {
            panic!("corner missing");
        };
        assert_eq!(layout.reveal(corner).len(), 16);
    }
}
