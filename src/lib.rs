pub mod audio;
pub mod config;
pub mod playback;
pub mod pronunciation;
pub mod storage;
pub mod types;
