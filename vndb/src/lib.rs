//! VNDB side of the explorer: tool schemas the model can call, the adapter
//! that executes them against the Kana API, and the field sanitizer.

pub mod adapter;
mod catalog;
pub mod errors;
pub mod query;
pub mod record;
pub mod sanitizer;
pub mod schema;
pub mod transport;

pub use adapter::VndbAdapter;
pub use errors::{RandomPickError, VndbError, VndbResult};
pub use query::{QueryArgs, QueryBody, QueryResponse};
pub use record::{EntityKind, Record, ResultItem, ToolResult};
pub use sanitizer::{sanitize_fields, FieldCheck};
pub use schema::{SchemaRegistry, ToolSchema, MAX_PAGE_SIZE};
pub use transport::{HttpTransport, VndbTransport};
