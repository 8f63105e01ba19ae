mod link_received;
mod quality_received;

pub use link_received::link_received;
pub use quality_received::quality_received;
