pub mod axes;
pub mod figure;
pub mod matplotlib;
pub mod pyplot;

pub use matplotlib::Matplotlib;
