pub mod registry;
pub mod setup;

pub use registry::PieceRegistry;
pub use setup::reset_to_start;
