pub mod banner;
pub mod confirm;
pub mod hints;
pub mod tabs;
