// Model artifacts: where they live on disk and how they get there.

pub mod download;
