pub mod grouping;
pub mod segmenter;
