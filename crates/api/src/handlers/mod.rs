pub mod find_images;
pub mod image_serving;
pub mod jobs;
pub mod questions;
pub mod suggested_links;
