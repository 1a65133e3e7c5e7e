// 特定の警告を無効化
#![allow(clippy::needless_return)]
#![allow(clippy::too_many_arguments)]

pub mod column;
pub mod compute;
pub mod error;
pub mod frame;
pub mod groupby;
pub mod index;
pub mod series;
pub mod temporal;
pub mod window;

// Re-export commonly used types
pub use column::{Column, ColumnType, Float64Column, Int64Column, StringColumn};
pub use compute::{AggOp, AggParams};
pub use error::{Error, Result};
pub use frame::{Frame, FrameIndex};
pub use groupby::Grouping;
pub use index::{IndexLabel, MultiIndex, RowIndex};
pub use series::Series;
pub use temporal::WindowOffset;
pub use window::{Closed, Rolling, RollingGroupBy, RollingOptions, Window, WindowBounds};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
