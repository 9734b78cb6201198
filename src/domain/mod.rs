pub mod board;
pub mod direction;
pub mod geometry;
pub mod queue;
