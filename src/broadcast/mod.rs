//! The overlay broadcast core: the per-module state table, the transport
//! seam and the server that ties them together.

pub mod server;
pub mod table;
pub mod transport;

pub use server::{BroadcastServer, ConfigSource};
pub use table::ModuleTable;
pub use transport::{ClientConnection, ClientRegistry, Transport};
