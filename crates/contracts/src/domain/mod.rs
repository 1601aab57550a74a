pub mod a001_jockey_message;
pub mod a002_jockey_video;
