pub mod models;
pub mod runner;
pub mod storage;
pub mod utils;
pub mod visualizer;

pub use models::datasets::logs::{LogRecord, RawLogEntry};
pub use models::datasets::traces::{DisplayNode, NodeStyle, RawCallTrace};
pub use models::datasets::values::{CallData, TypedValue};
pub use visualizer::transformations::logs::{LogDecoder, decode_logs};
pub use visualizer::transformations::traces::{TraceTransformer, build_node, build_root};
pub use visualizer::transformations::values::{decode, decode_sequence};
