pub mod segmenter;
pub mod session;
pub mod work;
